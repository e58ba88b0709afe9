//! Server-Sent Events (SSE) stream of capability pushes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use minibridge_app::ports::{CapabilitySink, CommandSender};

use crate::state::AppState;

/// `GET /api/updates/stream` — one JSON-encoded
/// [`CharacteristicUpdate`](minibridge_app::event_bus::CharacteristicUpdate)
/// per `data:` frame.
///
/// The stream continues until the client disconnects or the bus is closed.
pub async fn stream<S, C>(
    State(state): State<AppState<S, C>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    let updates = BroadcastStream::new(state.bus.subscribe()).filter_map(|result| match result {
        Ok(update) => match serde_json::to_string(&update) {
            Ok(json) => Some(Ok(Event::default().event("characteristic").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize update for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some updates were dropped");
            None
        }
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}
