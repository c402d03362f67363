//! Video surface adapter
//!
//! Thin observer: when a stream gets bound as an audio source, wait for its
//! decode metadata and hand the handle to the externally owned presentation
//! surface, keyed deterministically by the owning participant. Everything
//! here is best-effort; a video failure never disturbs audio binding.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::BinderEvent;
use crate::media::MediaAdapter;
use crate::types::{MediaStreamHandle, ParticipantId};

/// Externally owned texture/plane that displays decoded video frames
#[async_trait]
pub trait VideoSurface: Send + Sync {
    /// Display `stream` on the surface identified by `surface_key`
    async fn present(&self, surface_key: &str, stream: &MediaStreamHandle) -> Result<()>;
}

/// Deterministic surface key for a participant's video
pub fn surface_key(participant: &ParticipantId) -> String {
    format!("{}-video-source", participant)
}

/// Forwards bound streams to a [`VideoSurface`]
pub struct VideoSurfaceAdapter {
    media: Arc<dyn MediaAdapter>,
    surface: Arc<dyn VideoSurface>,
}

impl VideoSurfaceAdapter {
    /// Create an adapter targeting `surface`
    pub fn new(media: Arc<dyn MediaAdapter>, surface: Arc<dyn VideoSurface>) -> Self {
        Self { media, surface }
    }

    /// Consume binder events until the binder goes away
    ///
    /// Subscribe before spawning: `adapter.run(binder.subscribe())`.
    pub fn spawn(self, events: broadcast::Receiver<BinderEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    /// Event loop body; exposed separately so hosts with their own task
    /// supervision can drive it
    pub async fn run(self, mut events: broadcast::Receiver<BinderEvent>) {
        loop {
            match events.recv().await {
                Ok(BinderEvent::SourceBound {
                    participant: Some(participant),
                    stream,
                    ..
                }) => {
                    if let Err(e) = self.forward(&participant, &stream).await {
                        warn!("Video forwarding for {} failed: {}", participant, e);
                    }
                }
                Ok(BinderEvent::SourceBound {
                    participant: None,
                    entity,
                    ..
                }) => {
                    // No deterministic key without an owner; audio still works.
                    debug!("Skipping video for {}: no owning participant", entity);
                }
                Ok(BinderEvent::StreamRequestFailed { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Video adapter lagged; {} binder events skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("Video adapter stopped: binder event channel closed");
    }

    async fn forward(&self, participant: &ParticipantId, stream: &MediaStreamHandle) -> Result<()> {
        self.media.await_decode_metadata(stream).await?;
        let key = surface_key(participant);
        debug!("Presenting {} on surface {}", stream, key);
        self.surface.present(&key, stream).await
    }
}
