use std::time::Duration;

use axum::response::sse::{Event, KeepAlive};
use cookit_core::{RatingChange, RatingListener};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{debug, warn};

pub const RATING_CHANGED_EVENT: &str = "rating.changed";

/// Fans recorded ratings out to SSE subscribers.
#[derive(Clone)]
pub struct RatingHub {
    sender: broadcast::Sender<RatingChange>,
}

impl RatingHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, change: RatingChange) {
        if self.sender.send(change).is_err() {
            debug!(stage = "sse", "no rating subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RatingChange> {
        self.sender.subscribe()
    }
}

impl RatingListener for RatingHub {
    fn on_rating_changed(&self, change: &RatingChange) {
        self.publish(change.clone());
    }
}

pub fn rating_event(change: &RatingChange) -> Result<Event, serde_json::Error> {
    let data = serde_json::to_string(change)?;
    Ok(Event::default().event(RATING_CHANGED_EVENT).data(data))
}

pub fn rating_stream(
    hub: &RatingHub,
) -> impl Stream<Item = Result<Event, serde_json::Error>> + Send + 'static {
    BroadcastStream::new(hub.subscribe()).filter_map(|result| match result {
        Ok(change) => Some(rating_event(&change)),
        Err(err) => {
            warn!(stage = "sse", error = %err, "rating subscriber lagged");
            None
        }
    })
}

pub fn keep_alive(heartbeat_secs: u64) -> KeepAlive {
    KeepAlive::new()
        .interval(Duration::from_secs(heartbeat_secs))
        .text("heartbeat")
}
