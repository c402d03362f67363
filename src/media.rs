//! Network media adapter seam

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MediaStreamHandle, ParticipantId};

/// Supplies remote participants' media streams
///
/// `get_media_stream` resolves or fails once per call and may take
/// arbitrarily long; the binder wraps it in the configured timeout. The
/// adapter owns transport, negotiation, and decoding — this crate only sees
/// opaque handles.
#[async_trait]
pub trait MediaAdapter: Send + Sync {
    /// Request `participant`'s live media stream
    async fn get_media_stream(&self, participant: &ParticipantId) -> Result<MediaStreamHandle>;

    /// Wait until `stream`'s decode metadata is available
    ///
    /// The video surface adapter calls this before presenting; audio binding
    /// never waits on it.
    async fn await_decode_metadata(&self, stream: &MediaStreamHandle) -> Result<()>;
}
