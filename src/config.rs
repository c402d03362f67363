//! Binder configuration
//!
//! The configuration surface mirrors the public schema of the component this
//! crate reproduces (positional / distance model / max / ref / rolloff), plus
//! the pieces the original left implicit: a stream-arrival timeout, an
//! injected platform capability flag instead of user-agent sniffing, and the
//! bind-time override expressed as a named layer instead of hardcoded
//! literals deep in the rebind path.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::profile::AttenuationProfile;

/// Default stream-arrival timeout in milliseconds
pub const DEFAULT_STREAM_TIMEOUT_MS: u64 = 30_000;

/// Default capacity of the binder event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Capability flags for the runtime platform, injected at startup
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformCaps {
    /// Platform only routes live-stream audio through the graph once the
    /// stream is also attached to an ordinary muted playback element
    ///
    /// The shim is requested from the audio graph before binding the spatial
    /// source; on platforms without the quirk it must stay off, since a
    /// playback element that is not actually muted would double the audio.
    pub requires_playback_element_shim: bool,
}

/// Configuration for a [`StreamBinder`](crate::binder::StreamBinder)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Externally configured attenuation profile
    ///
    /// Validated, stored, and applied to every sink at creation; replaceable
    /// at runtime via `StreamBinder::set_profile`.
    pub default_profile: AttenuationProfile,

    /// Override profile applied on top of `default_profile` whenever a sink
    /// comes up
    ///
    /// Defaults to [`AttenuationProfile::bind_time_override`], reproducing
    /// the upstream behavior of overwriting user configuration at bind time.
    /// Set to `None` to make the configured profile authoritative. The
    /// override never changes sink positionality; that is fixed by
    /// `default_profile.positional` at creation.
    pub effective_profile: Option<AttenuationProfile>,

    /// How long to wait for a requested media stream before giving up
    pub stream_timeout_ms: u64,

    /// Platform capability flags
    pub platform: PlatformCaps,

    /// Capacity of the broadcast channel carrying binder events
    pub event_capacity: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            default_profile: AttenuationProfile::default(),
            effective_profile: Some(AttenuationProfile::bind_time_override()),
            stream_timeout_ms: DEFAULT_STREAM_TIMEOUT_MS,
            platform: PlatformCaps::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl BinderConfig {
    /// Validate every configured value
    pub fn validate(&self) -> Result<()> {
        self.default_profile.validate()?;
        if let Some(ref profile) = self.effective_profile {
            profile.validate()?;
        }
        if self.stream_timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                reason: "stream_timeout_ms must be > 0".to_string(),
            });
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "event_capacity must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// The stream-arrival timeout as a [`Duration`]
    pub fn stream_timeout(&self) -> Duration {
        Duration::from_millis(self.stream_timeout_ms)
    }
}
