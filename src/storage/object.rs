//! Object Module
//!
//! Defines stored objects, the client-supplied settings that describe them,
//! and the rules that turn settings into an absolute expiry instant.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::base64_data;

// == Sentinel ==
/// Expiry instant used for objects that never expire (2067-01-01T00:00:00Z).
pub fn never_expires() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2067, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// == Request Settings ==
/// Client description of an object to store.
///
/// Expiry resolution applies the first matching rule:
/// `timeout` > `deadline` > `timeless` > store default TTL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSettings {
    /// Raw payload, base64 on the wire
    #[serde(default, with = "base64_data")]
    pub data: Vec<u8>,
    /// Relative lifetime in seconds, 0 = unset
    #[serde(default)]
    pub timeout: u64,
    /// Absolute expiry instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Keep the object until it is deleted
    #[serde(default)]
    pub timeless: bool,
}

impl RequestSettings {
    /// Settings that fall through to the store default TTL.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn timeless(mut self) -> Self {
        self.timeless = true;
        self
    }

    /// Returns the deadline if one is set.
    ///
    /// The zero timestamp `0001-01-01T00:00:00Z` counts as unset.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        let zero = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single();
        self.deadline.filter(|deadline| Some(*deadline) != zero)
    }
}

// == Object ==
/// Immutable stored payload with an absolute expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    data: Arc<[u8]>,
    expires_at: DateTime<Utc>,
}

impl Object {
    // == Constructor ==
    pub fn new(data: impl Into<Arc<[u8]>>, expires_at: DateTime<Utc>) -> Self {
        Self {
            data: data.into(),
            expires_at,
        }
    }

    // == Resolve ==
    /// Builds an object from client settings, resolving expiry against now.
    pub fn resolve(settings: RequestSettings, default_ttl: Duration) -> Self {
        Self::resolve_at(settings, default_ttl, Utc::now())
    }

    /// Builds an object from client settings, resolving expiry against `now`.
    ///
    /// # Resolution order
    /// 1. `timeout` non-zero: `now + timeout`
    /// 2. `deadline` set: the deadline
    /// 3. `timeless`: [`never_expires`]
    /// 4. otherwise: `now + default_ttl`
    pub fn resolve_at(settings: RequestSettings, default_ttl: Duration, now: DateTime<Utc>) -> Self {
        let expires_at = if settings.timeout != 0 {
            offset(now, Duration::from_secs(settings.timeout))
        } else if let Some(deadline) = settings.deadline() {
            deadline
        } else if settings.timeless {
            never_expires()
        } else {
            offset(now, default_ttl)
        };

        Self::new(settings.data, expires_at)
    }

    /// Returns the stored payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    // == Is Expired ==
    /// True iff the expiry instant is strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Adds a std duration to an instant, saturating at the never-expires sentinel.
fn offset(now: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|by| now.checked_add_signed(by))
        .map(|at| at.min(never_expires()))
        .unwrap_or_else(never_expires)
}
