//! Query and mutation resolvers
//!
//! Transport-independent request handlers: validate input, delegate to the
//! owning registry, and return canonical representations. Resolvers never
//! publish business events themselves; the registry a mutation lands in is
//! the only publisher, so direct registry callers fan out identically.

pub mod mutation;
pub mod query;

pub use mutation::{create_agent, create_group, send_message, DEFAULT_SOURCE};
pub use query::{agents, drivers, groups, history, Driver};
