//! VaaS API Wire Types
//!
//! JSON structures exchanged with the VaaS control plane. Collection
//! responses follow the tastypie shape: a `meta` pagination block plus an
//! `objects` array.

use serde::{Deserialize, Serialize};

/// A backend registered under a director.
///
/// The client builds one of these for registration; `id` and `resource_uri`
/// are assigned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Backend {
    /// Server-assigned identifier (absent until created)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Network address of the endpoint
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    /// Resource locator of the owning director
    #[serde(rename = "director", skip_serializing_if = "String::is_empty")]
    pub director_url: String,
    /// Datacenter the endpoint lives in
    pub dc: Dc,
    /// Port of the endpoint service
    pub port: u16,
    /// Whether the backend inherits the director's time profile
    pub inherit_time_profile: bool,
    /// Relative load-balancing weight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// Free-form tags attached to the backend
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Canonical resource locator (assigned by the server)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_uri: String,
}

/// A named traffic-distribution unit owning a set of backends.
///
/// Read-only from this client's perspective: looked up, never created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Director {
    pub id: i64,
    /// Resource locators of the backends routed by this director
    #[serde(rename = "backends")]
    pub backend_urls: Vec<String>,
    pub name: String,
    pub resource_uri: String,
}

/// A datacenter a backend can be tagged with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dc {
    pub id: i64,
    pub name: String,
    pub resource_uri: String,
    /// Symbolic code used for lookup (e.g. "WAW")
    pub symbol: String,
}

/// Pagination block of a collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub limit: i64,
    /// Locator of the next page, if any
    pub next: Option<String>,
    pub offset: i64,
    /// Locator of the previous page, if any
    pub previous: Option<String>,
    pub total_count: i64,
}

/// One page of a collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedList<T> {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

/// An asynchronous task acknowledgement.
///
/// Returned by the server for async deletes; part of the schema surface but
/// not parsed by any client operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub info: String,
    pub resource_uri: String,
}
