//! Trait and types for resolving geostore hashes into geometries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A GeoJSON geometry object, kept as raw JSON since it is only forwarded
/// into SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    /// Compact JSON text, as `ST_GeomFromGeoJSON` expects it.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A stored user polygon, as served by the geostore microservice.
#[derive(Debug, Clone, PartialEq)]
pub struct Geostore {
    pub id: String,
    pub geojson: Option<FeatureCollection>,
}

impl Geostore {
    /// Geometry of the first feature, the only part queries use.
    pub fn first_geometry(self) -> Option<Geometry> {
        self.geojson?.features.into_iter().next()?.geometry
    }
}

/// Abstraction over the geostore microservice.
#[async_trait::async_trait]
pub trait GeostoreApi: Send + Sync {
    /// Fetches the geostore stored under `hash`. `api_key` is forwarded to
    /// the microservice when present.
    async fn geostore(&self, hash: &str, api_key: Option<&str>) -> Result<Geostore>;
}

/// Resolves `hash` to a geometry.
///
/// Lookup failures of any kind are logged and reported as `None`; deciding
/// that a missing geostore is fatal is left to the caller.
#[tracing::instrument(skip(api, api_key))]
pub async fn resolve_geostore(
    api: &dyn GeostoreApi,
    hash: &str,
    api_key: Option<&str>,
) -> Option<Geometry> {
    match api.geostore(hash, api_key).await {
        Ok(geostore) => {
            debug!(id = %geostore.id, "Geostore fetched");
            let geometry = geostore.first_geometry();
            if geometry.is_none() {
                warn!("Geostore has no feature geometry");
            }
            geometry
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Error obtaining geostore");
            None
        }
    }
}
