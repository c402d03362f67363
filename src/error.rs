//! Error types for Voxspace

use thiserror::Error;

use crate::types::{EntityId, ParticipantId, SinkId};

/// Result type alias for Voxspace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while attaching streams to spatial sinks
///
/// All of these are scoped to a single entity; none are fatal to the
/// process. An owner that never resolves is not an error at all — that is
/// the expected idle path for local/self entities.
#[derive(Debug, Error)]
pub enum Error {
    /// The media adapter rejected the stream request
    #[error("Stream request failed for participant {participant}: {message}")]
    StreamRequest {
        /// Participant whose stream was requested
        participant: ParticipantId,
        /// Adapter-reported failure
        message: String,
    },

    /// The stream request did not resolve within the configured timeout
    #[error("Stream for participant {participant} did not arrive within {timeout_ms}ms")]
    StreamTimeout {
        /// Participant whose stream was requested
        participant: ParticipantId,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Attenuation parameters violate the profile invariant
    #[error("Invalid attenuation profile: {reason}")]
    InvalidProfile {
        /// Which invariant was violated
        reason: String,
    },

    /// Configuration rejected at construction time
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which field was rejected
        reason: String,
    },

    /// Operation on an entity that was never initialized or already torn down
    #[error("Unknown entity {entity}")]
    UnknownEntity {
        /// The entity that was not found
        entity: EntityId,
    },

    /// The entity already has a live binding
    #[error("Entity {entity} is already initialized; tear it down before reinitializing")]
    AlreadyInitialized {
        /// The entity with the live binding
        entity: EntityId,
    },

    /// Operation on a sink the manager does not own
    #[error("Unknown sink {sink}")]
    UnknownSink {
        /// The sink that was not found
        sink: SinkId,
    },

    /// A second source was bound without disconnecting the first
    #[error("Sink {sink} already has an active source connection")]
    SourceAlreadyBound {
        /// The sink that is still connected
        sink: SinkId,
    },

    /// Scene audio graph failure
    #[error("Audio graph error: {0}")]
    Graph(String),
}
