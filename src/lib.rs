//! Voxspace
//!
//! Attaches remote participants' live media streams to 3D-positioned audio
//! sinks in a shared virtual space. Sound is attenuated by distance and
//! direction, and late-arriving or replaced streams are rebound
//! transparently without audio glitches or dangling graph connections.
//!
//! The crate owns the stream attachment state machine and nothing else.
//! Who owns an entity, where streams come from, how video is rendered, and
//! how audio physically reaches the device are all collaborator seams:
//! [`OwnerDirectory`], [`MediaAdapter`], [`VideoSurface`], and
//! [`AudioGraph`].
//!
//! # Usage
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use voxspace::{
//! #     AudioGraph, BinderConfig, EntityId, MediaAdapter, OwnerDirectory,
//! #     SceneContext, StreamBinder,
//! # };
//! # fn collaborators() -> (Arc<dyn AudioGraph>, Arc<dyn OwnerDirectory>, Arc<dyn MediaAdapter>) {
//! #     unimplemented!()
//! # }
//! # async fn example() -> voxspace::Result<()> {
//! let (graph, directory, media) = collaborators();
//! let scene = Arc::new(SceneContext::new(graph));
//! let binder = StreamBinder::new(BinderConfig::default(), scene, directory, media)?;
//!
//! // An avatar entity appeared in the scene: resolve its owner and
//! // attach that participant's stream when it arrives.
//! let avatar = EntityId::new(42);
//! binder.initialize(avatar)?;
//!
//! // Later, when the avatar despawns:
//! binder.teardown(avatar)?;
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod graph;
pub mod media;
pub mod profile;
pub mod sink;
pub mod types;
pub mod video;

pub use binder::{BindingSnapshot, StreamBinder};
pub use config::{BinderConfig, PlatformCaps, DEFAULT_EVENT_CAPACITY, DEFAULT_STREAM_TIMEOUT_MS};
pub use directory::OwnerDirectory;
pub use error::{Error, Result};
pub use events::BinderEvent;
pub use graph::{AudioGraph, SceneContext};
pub use media::MediaAdapter;
pub use profile::{AttenuationProfile, DistanceModel};
pub use sink::SinkManager;
pub use types::{EntityId, ListenerId, MediaStreamHandle, ParticipantId, SinkId};
pub use video::{surface_key, VideoSurface, VideoSurfaceAdapter};
