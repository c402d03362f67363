//! Spatial sink lifecycle
//!
//! The sink manager owns every sink the binder creates: it guarantees the
//! shared listener exists before the first sink, applies attenuation
//! profiles, and enforces that a sink never carries more than one active
//! source connection.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::SceneContext;
use crate::profile::AttenuationProfile;
use crate::types::{MediaStreamHandle, SinkId};

/// Per-sink bookkeeping
struct SinkEntry {
    positional: bool,
    /// The stream currently connected as the sink's source, if any
    source: Option<MediaStreamHandle>,
}

/// Owns spatial sinks against an injected [`SceneContext`]
pub struct SinkManager {
    scene: Arc<SceneContext>,
    sinks: Mutex<HashMap<SinkId, SinkEntry>>,
}

impl SinkManager {
    /// Create a manager for one scene
    pub fn new(scene: Arc<SceneContext>) -> Self {
        Self {
            scene,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// The scene this manager creates sinks in
    pub fn scene(&self) -> &Arc<SceneContext> {
        &self.scene
    }

    /// Create a sink and apply `profile` to it
    ///
    /// Ensures the shared listener exists first. `profile.positional`
    /// decides the sink kind and is fixed for the sink's lifetime.
    pub fn create(&self, profile: &AttenuationProfile) -> Result<SinkId> {
        let listener = self.scene.listener()?;
        let graph = self.scene.graph();
        let sink = graph.create_sink(listener, profile.positional)?;
        graph.apply_profile(sink, profile)?;

        self.sinks.lock().insert(
            sink,
            SinkEntry {
                positional: profile.positional,
                source: None,
            },
        );
        debug!("Created {} (positional: {})", sink, profile.positional);
        Ok(sink)
    }

    /// Apply `profile` to an existing sink
    ///
    /// Independent of binding state: valid before any source is bound and
    /// after every rebind; parameters persist on the sink.
    pub fn apply_profile(&self, sink: SinkId, profile: &AttenuationProfile) -> Result<()> {
        if !self.sinks.lock().contains_key(&sink) {
            return Err(Error::UnknownSink { sink });
        }
        self.scene.graph().apply_profile(sink, profile)
    }

    /// Apply `profile` to every live sink
    pub fn apply_profile_all(&self, profile: &AttenuationProfile) -> Result<()> {
        let ids: Vec<SinkId> = self.sinks.lock().keys().copied().collect();
        for sink in ids {
            self.scene.graph().apply_profile(sink, profile)?;
        }
        Ok(())
    }

    /// Connect a source node created from `stream` to `sink`
    ///
    /// The caller must disconnect the previous source first; a second bind
    /// on a connected sink is a contract violation, not a silent replace.
    pub fn bind_source(&self, sink: SinkId, stream: &MediaStreamHandle) -> Result<()> {
        let mut sinks = self.sinks.lock();
        let entry = sinks.get_mut(&sink).ok_or(Error::UnknownSink { sink })?;
        if entry.source.is_some() {
            return Err(Error::SourceAlreadyBound { sink });
        }
        self.scene.graph().connect_stream(sink, stream)?;
        entry.source = Some(stream.clone());
        debug!("Bound {} as source of {}", stream, sink);
        Ok(())
    }

    /// Sever `sink`'s source connection, keeping the sink for reuse
    ///
    /// No-op if nothing is connected.
    pub fn disconnect(&self, sink: SinkId) -> Result<()> {
        let mut sinks = self.sinks.lock();
        let entry = sinks.get_mut(&sink).ok_or(Error::UnknownSink { sink })?;
        if entry.source.take().is_some() {
            self.scene.graph().disconnect_source(sink)?;
            debug!("Disconnected source of {}", sink);
        }
        Ok(())
    }

    /// Disconnect if connected, then remove `sink` from the graph
    pub fn destroy(&self, sink: SinkId) -> Result<()> {
        let entry = self
            .sinks
            .lock()
            .remove(&sink)
            .ok_or(Error::UnknownSink { sink })?;
        if entry.source.is_some() {
            self.scene.graph().disconnect_source(sink)?;
        }
        self.scene.graph().remove_sink(sink)?;
        debug!("Destroyed {}", sink);
        Ok(())
    }

    /// The stream currently connected to `sink`, if any
    pub fn bound_source(&self, sink: SinkId) -> Option<MediaStreamHandle> {
        self.sinks
            .lock()
            .get(&sink)
            .and_then(|entry| entry.source.clone())
    }

    /// Whether `sink` was created positional
    pub fn is_positional(&self, sink: SinkId) -> Option<bool> {
        self.sinks.lock().get(&sink).map(|entry| entry.positional)
    }

    /// Number of live sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }
}

impl std::fmt::Debug for SinkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkManager")
            .field("sink_count", &self.sink_count())
            .finish_non_exhaustive()
    }
}
