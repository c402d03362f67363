//! Binder event bridge
//!
//! Events flow from the stream binder to observers (the video surface
//! adapter, diagnostics, host UI) over a broadcast channel, so observers
//! never sit between the binder and the audio graph.

use crate::types::{EntityId, MediaStreamHandle, ParticipantId, SinkId};

/// Events emitted by a [`StreamBinder`](crate::binder::StreamBinder)
#[derive(Debug, Clone)]
pub enum BinderEvent {
    /// A stream was bound as a sink's audio source
    ///
    /// Emitted once per successful (re)bind; duplicate deliveries of the
    /// same stream handle do not re-emit.
    SourceBound {
        /// Entity whose sink was rebound
        entity: EntityId,
        /// Owning participant, when known
        participant: Option<ParticipantId>,
        /// The sink that received the source
        sink: SinkId,
        /// The stream now feeding the sink
        stream: MediaStreamHandle,
    },

    /// A participant's stream request failed or timed out
    ///
    /// Non-fatal diagnostic; the entity stays silent until its caller
    /// reinitializes it.
    StreamRequestFailed {
        /// Entity whose stream was requested
        entity: EntityId,
        /// Participant whose stream was requested
        participant: ParticipantId,
        /// Failure description
        message: String,
    },
}

impl BinderEvent {
    /// Create a source-bound event
    pub fn source_bound(
        entity: EntityId,
        participant: Option<ParticipantId>,
        sink: SinkId,
        stream: MediaStreamHandle,
    ) -> Self {
        Self::SourceBound {
            entity,
            participant,
            sink,
            stream,
        }
    }

    /// Create a stream-request-failed event
    pub fn stream_request_failed(
        entity: EntityId,
        participant: ParticipantId,
        message: impl Into<String>,
    ) -> Self {
        Self::StreamRequestFailed {
            entity,
            participant,
            message: message.into(),
        }
    }
}
