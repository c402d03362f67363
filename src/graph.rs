//! Scene audio graph seam
//!
//! The crate consumes nodes in an externally owned audio graph (listener,
//! sinks, stream sources, device output); it never implements mixing or
//! output itself. [`AudioGraph`] is the full surface the sink manager needs,
//! and [`SceneContext`] wraps one graph per scene together with the lazily
//! created shared listener.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::Result;
use crate::profile::AttenuationProfile;
use crate::types::{ListenerId, MediaStreamHandle, SinkId};

/// Operations the crate performs against the scene's audio graph
///
/// Graph manipulation is synchronous: the only suspension points in the
/// whole attachment flow are owner resolution and stream arrival.
/// Implementations back these calls with whatever device/graph abstraction
/// the host uses.
pub trait AudioGraph: Send + Sync {
    /// Create the scene-wide listener node
    ///
    /// Called at most once per scene by [`SceneContext`]; implementations do
    /// not need their own idempotence guard.
    fn create_listener(&self) -> Result<ListenerId>;

    /// Create a spatial (positional) or plain sink attached to the listener
    fn create_sink(&self, listener: ListenerId, positional: bool) -> Result<SinkId>;

    /// Set distance model, max distance, reference distance, and rolloff on
    /// a sink
    ///
    /// Must be callable whether or not a source is bound; parameters persist
    /// across source rebinds.
    fn apply_profile(&self, sink: SinkId, profile: &AttenuationProfile) -> Result<()>;

    /// Create a source node from `stream` and connect it to `sink`
    fn connect_stream(&self, sink: SinkId, stream: &MediaStreamHandle) -> Result<()>;

    /// Sever `sink`'s current source connection, keeping the sink
    fn disconnect_source(&self, sink: SinkId) -> Result<()>;

    /// Remove `sink` from the graph
    fn remove_sink(&self, sink: SinkId) -> Result<()>;

    /// Attach `stream` to a muted ordinary playback element
    ///
    /// Platform shim only (see [`PlatformCaps`](crate::config::PlatformCaps));
    /// some platforms refuse to push live-stream audio through graph nodes
    /// until the stream also feeds a plain playback element.
    fn attach_muted_playback(&self, stream: &MediaStreamHandle) -> Result<()>;
}

/// Per-scene context owning the graph handle and the shared listener
///
/// The listener is the one intentionally shared, read-mostly resource in the
/// system: every sink in the scene attaches to it. Creation is lazy and
/// idempotent; concurrent first touch by two entities still yields exactly
/// one listener.
pub struct SceneContext {
    graph: Arc<dyn AudioGraph>,
    listener: Mutex<Option<ListenerId>>,
}

impl SceneContext {
    /// Wrap a scene's audio graph
    pub fn new(graph: Arc<dyn AudioGraph>) -> Self {
        Self {
            graph,
            listener: Mutex::new(None),
        }
    }

    /// The underlying graph
    pub fn graph(&self) -> &Arc<dyn AudioGraph> {
        &self.graph
    }

    /// The scene listener, created on first use
    pub fn listener(&self) -> Result<ListenerId> {
        let mut slot = self.listener.lock();
        if let Some(listener) = *slot {
            return Ok(listener);
        }
        let listener = self.graph.create_listener()?;
        *slot = Some(listener);
        Ok(listener)
    }

    /// Whether the listener has been created yet
    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }
}

impl std::fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("listener", &*self.listener.lock())
            .finish_non_exhaustive()
    }
}
