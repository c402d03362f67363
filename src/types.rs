//! Identifier and handle types shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a scene entity
///
/// Assigned by whatever owns the scene (ECS index, DOM element hash, ...);
/// the binder only compares and hashes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a raw entity id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// Opaque identifier of a remote participant in the shared session
///
/// Local/self entities have no participant id; that absence is modeled as
/// `Option<ParticipantId>` at the resolution seam, never as a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap a participant identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque handle to a live audio+video media stream
///
/// Cheaply clonable and equality-comparable: the binder compares handles to
/// distinguish "same stream, no-op" from "new stream, must rebind". The
/// absence of a stream (none yet, or stream loss) is `Option<MediaStreamHandle>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaStreamHandle(Uuid);

impl MediaStreamHandle {
    /// Create a handle with a fresh identity
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing stream identity
    pub const fn from_id(id: Uuid) -> Self {
        Self(id)
    }

    /// The stream's identity
    pub const fn id(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MediaStreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

/// Handle to a spatial sink node in the scene audio graph
///
/// Owned exclusively by one entity's binding; never shared across entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkId(Uuid);

impl SinkId {
    /// Allocate a fresh sink id (graph implementations call this)
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink-{}", self.0)
    }
}

/// Handle to the scene-wide audio listener node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Allocate a fresh listener id (graph implementations call this)
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
