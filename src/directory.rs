//! Entity/ownership directory seam

use async_trait::async_trait;

use crate::types::{EntityId, ParticipantId};

/// Resolves which remote participant a scene entity represents
///
/// One-shot per entity: the binder calls this exactly once at
/// initialization. `None` means the entity is local/self-owned — the
/// expected answer for the local avatar, not a failure — and the binder
/// stays permanently idle for that entity.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// Resolve the owning participant of `entity`, if any
    async fn resolve_owner(&self, entity: EntityId) -> Option<ParticipantId>;
}
