//! Request DTOs for the store API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::RequestSettings;

/// Resource a request operates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Object,
    Collection,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Request body for the single store endpoint.
///
/// The HTTP method selects the action (POST/PUT create or set, GET reads,
/// DELETE removes); `type` selects the resource.
///
/// # Fields
/// - `type`: `object` or `collection`
/// - `collection`: Collection name, empty for the default collection
/// - `key` / `keys`: Object keys for GET and DELETE
/// - `object` / `objects`: Object settings for POST and PUT
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreRequest {
    #[serde(rename = "type", default)]
    pub kind: RequestType,
    #[serde(default)]
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<RequestSettings>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub objects: BTreeMap<String, RequestSettings>,
}

impl StoreRequest {
    /// All keys named by the request, `key` first.
    pub fn object_keys(&self) -> Vec<String> {
        self.key.iter().chain(self.keys.iter()).cloned().collect()
    }

    /// All key/settings pairs named by the request, `key`/`object` first.
    pub fn object_settings(&self) -> Vec<(String, RequestSettings)> {
        let single = match (&self.key, &self.object) {
            (Some(key), Some(object)) => Some((key.clone(), object.clone())),
            _ => None,
        };
        single
            .into_iter()
            .chain(self.objects.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }
}
