use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::fetch::auth::ApiKey;
use crate::fetch::{HttpClient, get_json};
use crate::services::geostore_api::{FeatureCollection, Geostore, GeostoreApi};

// JSON:API envelope: {"data":{"id":..,"type":"geoStore","attributes":{..}}}
#[derive(Deserialize)]
struct GeostoreDocument {
    data: GeostoreResource,
}

#[derive(Deserialize)]
struct GeostoreResource {
    id: String,
    #[serde(default)]
    attributes: GeostoreAttributes,
}

#[derive(Deserialize, Default)]
struct GeostoreAttributes {
    #[serde(default)]
    geojson: Option<FeatureCollection>,
}

impl From<GeostoreDocument> for Geostore {
    fn from(doc: GeostoreDocument) -> Self {
        Geostore {
            id: doc.data.id,
            geojson: doc.data.attributes.geojson,
        }
    }
}

/// Reads geostores from `GET <base_url>/v1/geostore/<hash>`.
pub struct GeostoreClient<C> {
    http: Arc<C>,
    base_url: String,
}

impl<C> GeostoreClient<C> {
    pub fn new(http: Arc<C>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, hash: &str) -> Result<reqwest::Url> {
        let raw = format!(
            "{}/v1/geostore/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(hash)
        );
        reqwest::Url::parse(&raw).with_context(|| format!("invalid geostore URL '{raw}'"))
    }
}

#[async_trait]
impl<C: HttpClient> GeostoreApi for GeostoreClient<C> {
    async fn geostore(&self, hash: &str, api_key: Option<&str>) -> Result<Geostore> {
        let url = self.url_for(hash)?;

        let doc: GeostoreDocument = match api_key {
            Some(key) => {
                let keyed = ApiKey::x_api_key(Arc::clone(&self.http), key)?;
                get_json::<_, GeostoreDocument>(&keyed, url).await
            }
            None => get_json::<_, GeostoreDocument>(self.http.as_ref(), url).await,
        }
        .with_context(|| format!("geostore request for '{hash}' failed"))?;

        Ok(doc.into())
    }
}
