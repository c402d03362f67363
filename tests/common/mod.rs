//! Shared mock collaborators for integration tests
//!
//! A recording audio graph (asserts on exact call sequences and on the
//! one-source-per-sink invariant), a scripted ownership directory, a
//! scripted media adapter (immediate, failing, gated, or never-resolving
//! streams), and a recording video surface.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use voxspace::{
    AttenuationProfile, AudioGraph, EntityId, Error, ListenerId, MediaAdapter, MediaStreamHandle,
    OwnerDirectory, ParticipantId, Result, SinkId, VideoSurface,
};

/// One call into the mock audio graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCall {
    CreateListener,
    CreateSink { positional: bool },
    ApplyProfile { sink: SinkId, profile: AttenuationProfile },
    ConnectStream { sink: SinkId, stream: MediaStreamHandle },
    DisconnectSource { sink: SinkId },
    RemoveSink { sink: SinkId },
    AttachMutedPlayback { stream: MediaStreamHandle },
}

/// Audio graph that records every call and watches the source invariant
#[derive(Default)]
pub struct RecordingGraph {
    calls: Mutex<Vec<GraphCall>>,
    connected: Mutex<HashMap<SinkId, bool>>,
    overlap: AtomicBool,
}

impl RecordingGraph {
    pub fn calls(&self) -> Vec<GraphCall> {
        self.calls.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.count(|c| matches!(c, GraphCall::CreateListener))
    }

    pub fn sink_count(&self) -> usize {
        self.count(|c| matches!(c, GraphCall::CreateSink { .. }))
    }

    pub fn connect_count(&self) -> usize {
        self.count(|c| matches!(c, GraphCall::ConnectStream { .. }))
    }

    pub fn disconnect_count(&self) -> usize {
        self.count(|c| matches!(c, GraphCall::DisconnectSource { .. }))
    }

    pub fn shim_count(&self) -> usize {
        self.count(|c| matches!(c, GraphCall::AttachMutedPlayback { .. }))
    }

    pub fn applied_profiles(&self) -> Vec<AttenuationProfile> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                GraphCall::ApplyProfile { profile, .. } => Some(*profile),
                _ => None,
            })
            .collect()
    }

    /// True if any sink ever carried two source connections at once
    pub fn overlap_detected(&self) -> bool {
        self.overlap.load(Ordering::SeqCst)
    }

    fn count(&self, pred: impl Fn(&GraphCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|&c| pred(c)).count()
    }

    fn record(&self, call: GraphCall) {
        self.calls.lock().push(call);
    }
}

impl AudioGraph for RecordingGraph {
    fn create_listener(&self) -> Result<ListenerId> {
        self.record(GraphCall::CreateListener);
        Ok(ListenerId::new())
    }

    fn create_sink(&self, _listener: ListenerId, positional: bool) -> Result<SinkId> {
        self.record(GraphCall::CreateSink { positional });
        let sink = SinkId::new();
        self.connected.lock().insert(sink, false);
        Ok(sink)
    }

    fn apply_profile(&self, sink: SinkId, profile: &AttenuationProfile) -> Result<()> {
        self.record(GraphCall::ApplyProfile {
            sink,
            profile: *profile,
        });
        Ok(())
    }

    fn connect_stream(&self, sink: SinkId, stream: &MediaStreamHandle) -> Result<()> {
        {
            let mut connected = self.connected.lock();
            let slot = connected.entry(sink).or_insert(false);
            if *slot {
                self.overlap.store(true, Ordering::SeqCst);
            }
            *slot = true;
        }
        self.record(GraphCall::ConnectStream {
            sink,
            stream: stream.clone(),
        });
        Ok(())
    }

    fn disconnect_source(&self, sink: SinkId) -> Result<()> {
        self.connected.lock().insert(sink, false);
        self.record(GraphCall::DisconnectSource { sink });
        Ok(())
    }

    fn remove_sink(&self, sink: SinkId) -> Result<()> {
        self.connected.lock().remove(&sink);
        self.record(GraphCall::RemoveSink { sink });
        Ok(())
    }

    fn attach_muted_playback(&self, stream: &MediaStreamHandle) -> Result<()> {
        self.record(GraphCall::AttachMutedPlayback {
            stream: stream.clone(),
        });
        Ok(())
    }
}

/// Directory backed by a fixed entity → participant table
#[derive(Default)]
pub struct ScriptedDirectory {
    owners: Mutex<HashMap<EntityId, ParticipantId>>,
}

impl ScriptedDirectory {
    pub fn with_owner(self, entity: EntityId, participant: impl Into<ParticipantId>) -> Self {
        self.owners.lock().insert(entity, participant.into());
        self
    }
}

#[async_trait]
impl OwnerDirectory for ScriptedDirectory {
    async fn resolve_owner(&self, entity: EntityId) -> Option<ParticipantId> {
        self.owners.lock().get(&entity).cloned()
    }
}

/// How the scripted adapter answers one participant's stream request
#[derive(Clone)]
pub enum StreamScript {
    /// Resolve immediately
    Resolve(MediaStreamHandle),
    /// Reject immediately
    Fail(String),
    /// Resolve with `stream` once the gate is notified
    Gated {
        stream: MediaStreamHandle,
        gate: Arc<Notify>,
    },
    /// Never resolve (drives the timeout path)
    Never,
}

/// Media adapter answering from a per-participant script table
#[derive(Default)]
pub struct ScriptedMediaAdapter {
    scripts: Mutex<HashMap<ParticipantId, StreamScript>>,
    requests: AtomicUsize,
    metadata_waits: AtomicUsize,
}

impl ScriptedMediaAdapter {
    pub fn with_script(self, participant: impl Into<ParticipantId>, script: StreamScript) -> Self {
        self.scripts.lock().insert(participant.into(), script);
        self
    }

    pub fn set_script(&self, participant: impl Into<ParticipantId>, script: StreamScript) {
        self.scripts.lock().insert(participant.into(), script);
    }

    /// How many stream requests were issued
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// How many decode-metadata waits were issued
    pub fn metadata_wait_count(&self) -> usize {
        self.metadata_waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaAdapter for ScriptedMediaAdapter {
    async fn get_media_stream(&self, participant: &ParticipantId) -> Result<MediaStreamHandle> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().get(participant).cloned();
        match script {
            Some(StreamScript::Resolve(stream)) => Ok(stream),
            Some(StreamScript::Fail(message)) => Err(Error::Graph(message)),
            Some(StreamScript::Gated { stream, gate }) => {
                gate.notified().await;
                Ok(stream)
            }
            Some(StreamScript::Never) => std::future::pending().await,
            None => Err(Error::Graph(format!("no script for {}", participant))),
        }
    }

    async fn await_decode_metadata(&self, _stream: &MediaStreamHandle) -> Result<()> {
        self.metadata_waits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Video surface that records every presentation
#[derive(Default)]
pub struct RecordingSurface {
    presented: Mutex<Vec<(String, MediaStreamHandle)>>,
}

impl RecordingSurface {
    pub fn presented(&self) -> Vec<(String, MediaStreamHandle)> {
        self.presented.lock().clone()
    }
}

#[async_trait]
impl VideoSurface for RecordingSurface {
    async fn present(&self, surface_key: &str, stream: &MediaStreamHandle) -> Result<()> {
        self.presented
            .lock()
            .push((surface_key.to_string(), stream.clone()));
        Ok(())
    }
}

/// Let spawned binder tasks run to completion on the current-thread runtime
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

/// Install a test tracing subscriber once, honoring `RUST_LOG`
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
