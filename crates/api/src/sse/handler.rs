use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use vitalwatch_core::types::DbId;

use crate::state::AppState;

/// GET /monitoring/stream/user/{userId}
///
/// Open the real-time channel for a user (patient or caregiver) and stream
/// named events (`vital-sign-update`, `alert`, `update`) as they are
/// emitted. The connection is held open indefinitely; periodic keep-alive
/// comments stop intermediaries from timing it out.
///
/// Subscribing again for the same user replaces this channel and ends this
/// stream. When the client disconnects, axum drops the stream and the
/// subscription deregisters itself from the registry.
pub async fn stream_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!(user_id, "SSE stream opened");
    let subscription = state.registry.clone().subscribe(user_id);

    let stream = subscription.filter_map(|msg| async move {
        match Event::default().event(msg.event).json_data(&msg.data) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(e) => {
                tracing::error!(error = %e, event = msg.event, "Failed to encode SSE event");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
