//! Stream attachment state machine
//!
//! One [`StreamBinder`] serves a scene. Per entity it drives exactly one
//! resolution attempt (owner, then stream), lazily creates the spatial sink
//! on first stream arrival, and mediates every rebind so a sink never
//! carries a stale or duplicate source connection.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::config::BinderConfig;
use crate::directory::OwnerDirectory;
use crate::error::{Error, Result};
use crate::events::BinderEvent;
use crate::graph::SceneContext;
use crate::media::MediaAdapter;
use crate::profile::AttenuationProfile;
use crate::sink::SinkManager;
use crate::types::{EntityId, MediaStreamHandle, ParticipantId, SinkId};

/// Per-entity binding record
///
/// Lives from `initialize` to `teardown`; presence in the binder's map is
/// the liveness check that makes stale async completions a no-op.
#[derive(Default)]
struct BindingState {
    owner: Option<ParticipantId>,
    current_stream: Option<MediaStreamHandle>,
    sink: Option<SinkId>,
    resolve_task: Option<AbortHandle>,
}

/// Read-only view of an entity's binding, for hosts and tests
#[derive(Debug, Clone)]
pub struct BindingSnapshot {
    /// Owning participant, once resolved
    pub owner: Option<ParticipantId>,
    /// Stream currently recorded for the entity
    pub current_stream: Option<MediaStreamHandle>,
    /// The entity's sink, once created
    pub sink: Option<SinkId>,
}

struct BinderInner {
    config: BinderConfig,
    /// Current configured profile; starts as `config.default_profile` and
    /// follows `set_profile`
    profile: Mutex<AttenuationProfile>,
    sinks: SinkManager,
    directory: Arc<dyn OwnerDirectory>,
    media: Arc<dyn MediaAdapter>,
    bindings: Mutex<HashMap<EntityId, BindingState>>,
    events: broadcast::Sender<BinderEvent>,
}

/// Attaches remote participants' media streams to per-entity spatial sinks
pub struct StreamBinder {
    inner: Arc<BinderInner>,
}

impl StreamBinder {
    /// Create a binder for one scene
    ///
    /// Validates `config` up front; an invalid default or override profile
    /// never gets as far as a sink.
    pub fn new(
        config: BinderConfig,
        scene: Arc<SceneContext>,
        directory: Arc<dyn OwnerDirectory>,
        media: Arc<dyn MediaAdapter>,
    ) -> Result<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_capacity);
        let profile = config.default_profile;
        Ok(Self {
            inner: Arc::new(BinderInner {
                config,
                profile: Mutex::new(profile),
                sinks: SinkManager::new(scene),
                directory,
                media,
                bindings: Mutex::new(HashMap::new()),
                events,
            }),
        })
    }

    /// Subscribe to binder events
    pub fn subscribe(&self) -> broadcast::Receiver<BinderEvent> {
        self.inner.events.subscribe()
    }

    /// The sink manager backing this binder
    pub fn sink_manager(&self) -> &SinkManager {
        &self.inner.sinks
    }

    /// The currently configured attenuation profile
    pub fn profile(&self) -> AttenuationProfile {
        *self.inner.profile.lock()
    }

    /// Snapshot an entity's binding, if it is live
    pub fn binding(&self, entity: EntityId) -> Option<BindingSnapshot> {
        self.inner.bindings.lock().get(&entity).map(|b| BindingSnapshot {
            owner: b.owner.clone(),
            current_stream: b.current_stream.clone(),
            sink: b.sink,
        })
    }

    /// Begin stream attachment for `entity`
    ///
    /// Registers the binding and spawns the one-shot resolution task: owner
    /// first, then that participant's stream under the configured timeout.
    /// No owner means the entity stays permanently idle (expected for the
    /// local participant's own entity). Request failure and timeout are
    /// logged, emitted as [`BinderEvent::StreamRequestFailed`], and not
    /// retried; the caller reinitializes if it wants another attempt.
    pub fn initialize(&self, entity: EntityId) -> Result<()> {
        {
            let mut bindings = self.inner.bindings.lock();
            if bindings.contains_key(&entity) {
                return Err(Error::AlreadyInitialized { entity });
            }
            bindings.insert(entity, BindingState::default());
        }
        debug!("Initialized binding for {}", entity);

        // The task holds only a weak reference back to the binder, so
        // dropping the binder (or tearing down the entity) never has to
        // race a cancellation to be safe.
        let weak = Arc::downgrade(&self.inner);
        let directory = Arc::clone(&self.inner.directory);
        let media = Arc::clone(&self.inner.media);
        let timeout = self.inner.config.stream_timeout();
        let timeout_ms = self.inner.config.stream_timeout_ms;

        let task = tokio::spawn(async move {
            let owner = directory.resolve_owner(entity).await;

            let owner = match record_owner(&weak, entity, owner) {
                OwnerOutcome::Proceed(owner) => owner,
                OwnerOutcome::Idle => {
                    debug!(
                        "{} has no owning participant; staying idle (expected for the local entity)",
                        entity
                    );
                    return;
                }
                OwnerOutcome::Gone => return,
            };

            info!("Requesting media stream of {} for {}", owner, entity);
            let outcome = tokio::time::timeout(timeout, media.get_media_stream(&owner)).await;

            let Some(inner) = weak.upgrade() else { return };
            match outcome {
                Ok(Ok(stream)) => {
                    if let Err(e) = inner.deliver_stream(entity, Some(stream)) {
                        warn!("Failed to bind stream of {} for {}: {}", owner, entity, e);
                    }
                }
                Ok(Err(e)) => {
                    let err = Error::StreamRequest {
                        participant: owner.clone(),
                        message: e.to_string(),
                    };
                    inner.report_request_failure(entity, owner, &err);
                }
                Err(_) => {
                    let err = Error::StreamTimeout {
                        participant: owner.clone(),
                        timeout_ms,
                    };
                    inner.report_request_failure(entity, owner, &err);
                }
            }
        });

        // Store the abort handle so teardown can cancel in-flight
        // resolution; if teardown already won the race, cancel now.
        let abort = task.abort_handle();
        let mut bindings = self.inner.bindings.lock();
        match bindings.get_mut(&entity) {
            Some(binding) => binding.resolve_task = Some(abort),
            None => abort.abort(),
        }
        Ok(())
    }

    /// Deliver a (possibly replaced, possibly absent) stream for `entity`
    ///
    /// The rebind contract, in order: create the sink lazily, no-op on an
    /// identical handle, disconnect the old source, bind and announce the
    /// new one, record the handle. Idempotent under repeated delivery of
    /// the same handle. Deliveries for an entity that was already torn down
    /// are discarded silently — never an error, never a graph call.
    pub fn on_stream_received(
        &self,
        entity: EntityId,
        stream: Option<MediaStreamHandle>,
    ) -> Result<()> {
        self.inner.deliver_stream(entity, stream)
    }

    /// Replace the configured attenuation profile
    ///
    /// Invalid profiles are rejected and the last valid profile is kept. A
    /// valid profile is stored and re-applied to every live sink
    /// immediately; application is independent of whether any stream is
    /// bound yet. While `BinderConfig::effective_profile` is set, that
    /// override is what reaches the sinks, but the configured profile is
    /// still retained for the day the override is switched off.
    pub fn set_profile(&self, profile: AttenuationProfile) -> Result<()> {
        profile.validate()?;
        *self.inner.profile.lock() = profile;
        let applied = self
            .inner
            .config
            .effective_profile
            .unwrap_or(profile);
        self.inner.sinks.apply_profile_all(&applied)
    }

    /// Tear down `entity`'s binding
    ///
    /// Aborts any in-flight resolution, disconnects the sink's source if a
    /// stream is bound, then releases the sink. Completions that still
    /// arrive afterwards find no binding and discard themselves.
    pub fn teardown(&self, entity: EntityId) -> Result<()> {
        let state = self
            .inner
            .bindings
            .lock()
            .remove(&entity)
            .ok_or(Error::UnknownEntity { entity })?;

        if let Some(task) = state.resolve_task {
            task.abort();
        }
        if let Some(sink) = state.sink {
            self.inner.sinks.destroy(sink)?;
        }
        debug!("Tore down binding for {}", entity);
        Ok(())
    }

    /// Number of live bindings
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.lock().len()
    }
}

impl std::fmt::Debug for StreamBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBinder")
            .field("bindings", &self.binding_count())
            .field("sinks", &self.inner.sinks.sink_count())
            .finish_non_exhaustive()
    }
}

enum OwnerOutcome {
    Proceed(ParticipantId),
    Idle,
    Gone,
}

/// Record the resolved owner on the binding, if the entity is still live
fn record_owner(
    weak: &Weak<BinderInner>,
    entity: EntityId,
    owner: Option<ParticipantId>,
) -> OwnerOutcome {
    let Some(inner) = weak.upgrade() else {
        return OwnerOutcome::Gone;
    };
    let mut bindings = inner.bindings.lock();
    let Some(binding) = bindings.get_mut(&entity) else {
        debug!("Owner of {} resolved after teardown; discarding", entity);
        return OwnerOutcome::Gone;
    };
    binding.owner = owner.clone();
    match owner {
        Some(owner) => OwnerOutcome::Proceed(owner),
        None => OwnerOutcome::Idle,
    }
}

impl BinderInner {
    /// Core rebind algorithm; serialized per binder by the bindings lock
    fn deliver_stream(&self, entity: EntityId, stream: Option<MediaStreamHandle>) -> Result<()> {
        let mut bindings = self.bindings.lock();
        let Some(binding) = bindings.get_mut(&entity) else {
            debug!("Stream for {} arrived after teardown; discarding", entity);
            return Ok(());
        };

        // 1. Lazily create the sink; configured profile first, then the
        //    bind-time override layer when engaged.
        let sink = match binding.sink {
            Some(sink) => sink,
            None => {
                let profile = *self.profile.lock();
                let sink = self.sinks.create(&profile)?;
                if let Some(ref effective) = self.config.effective_profile {
                    self.sinks.apply_profile(sink, effective)?;
                }
                binding.sink = Some(sink);
                sink
            }
        };

        // 2. Same handle (including none == none): redundant notification.
        if stream == binding.current_stream {
            debug!("Ignoring redundant stream delivery for {}", entity);
            return Ok(());
        }

        // 3. Sever the old connection; the sink itself is reused.
        if binding.current_stream.is_some() {
            self.sinks.disconnect(sink)?;
        }

        // 4. Bind the new source and announce it.
        if let Some(ref new_stream) = stream {
            if self.config.platform.requires_playback_element_shim {
                debug!("Attaching muted playback element for {} (platform shim)", entity);
                self.sinks
                    .scene()
                    .graph()
                    .attach_muted_playback(new_stream)?;
            }
            self.sinks.bind_source(sink, new_stream)?;
            info!("Bound {} to {} for {}", new_stream, sink, entity);
            let _ = self.events.send(BinderEvent::source_bound(
                entity,
                binding.owner.clone(),
                sink,
                new_stream.clone(),
            ));
        }

        // 5. Record unconditionally so the next delivery compares right.
        binding.current_stream = stream;
        Ok(())
    }

    /// Log and emit a non-fatal stream-request diagnostic
    fn report_request_failure(&self, entity: EntityId, participant: ParticipantId, err: &Error) {
        if !self.bindings.lock().contains_key(&entity) {
            debug!("Stream request for {} failed after teardown; discarding", entity);
            return;
        }
        warn!("{} stays silent: {}", entity, err);
        let _ = self.events.send(BinderEvent::stream_request_failed(
            entity,
            participant,
            err.to_string(),
        ));
    }
}
