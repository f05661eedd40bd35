//! Per-topic subscription streams
//!
//! One SSE stream per requested topic: subscribe once on the bus, forward
//! each envelope verbatim (event name is the topic wire name, data is the
//! payload JSON), and let the dropped stream cancel the bus-side slot when
//! the client disconnects.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use agent_mesh_core::bus::Topic;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::debug;

use crate::handlers::ApiError;
use crate::state::AppState;

pub async fn subscribe_handler(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let topic: Topic = topic.parse()?;
    debug!(topic = %topic, "Subscription stream opened");

    let stream = state.platform.bus.subscribe(topic).map(|envelope| {
        Ok(Event::default()
            .event(envelope.topic.as_str())
            .data(envelope.payload.to_string()))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
