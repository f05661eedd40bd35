//! HTTP/SSE API surface for agent-mesh
//!
//! Thin transport over the core resolvers: queries and mutations as JSON
//! routes, one server-sent-event stream per bus topic for subscriptions.

pub mod handlers;
pub mod server;
pub mod state;
pub mod subscriptions;

pub use server::{router, run_server};
pub use state::AppState;
