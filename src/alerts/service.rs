use std::sync::Arc;
use tracing::{debug, info};

use crate::download::build_download_urls;
use crate::error::AlertsError;
use crate::period::Period;
use crate::services::geostore_api::{GeostoreApi, resolve_geostore};
use crate::services::sql_api::{SqlApi, decode_row, execute};
use crate::sql::queries::{ID1, ISO, LATEST, USE, WDPA, WORLD};
use crate::sql::{QueryParams, QueryTemplate};

use super::types::{AlertResult, CountRow, LatestDate, QueryOptions};
use super::use_table::UseTable;
use super::validate;

/// Answers alert queries against the remote SQL service.
///
/// Holds no mutable state; one instance serves all requests.
pub struct AlertsService {
    sql: Arc<dyn SqlApi>,
    geostore: Arc<dyn GeostoreApi>,
    download_base: String,
}

impl AlertsService {
    /// `download_base` is the public SQL API endpoint used in download links.
    pub fn new(
        sql: Arc<dyn SqlApi>,
        geostore: Arc<dyn GeostoreApi>,
        download_base: impl Into<String>,
    ) -> Self {
        Self {
            sql,
            geostore,
            download_base: download_base.into(),
        }
    }

    /// Alerts inside a country.
    #[tracing::instrument(skip(self))]
    pub async fn by_admin(
        &self,
        iso: &str,
        opts: &QueryOptions,
    ) -> Result<Option<AlertResult>, AlertsError> {
        info!("Obtaining national data");
        let iso = validate::iso(iso)?;
        let (period, params) = opts.bind()?;
        self.count(&ISO, params.text("iso", iso), &period).await
    }

    /// Alerts inside a province of a country.
    #[tracing::instrument(skip(self))]
    pub async fn by_province(
        &self,
        iso: &str,
        id1: &str,
        opts: &QueryOptions,
    ) -> Result<Option<AlertResult>, AlertsError> {
        info!("Obtaining subnational data");
        let iso = validate::iso(iso)?;
        let id1 = validate::numeric_id("id1", id1)?;
        let (period, params) = opts.bind()?;
        self.count(&ID1, params.text("iso", iso).int("id1", id1), &period)
            .await
    }

    /// Alerts inside polygon `id` of the land-use layer called `name`.
    ///
    /// Unknown layer names fail with [`AlertsError::InvalidInput`] before
    /// anything is sent upstream.
    #[tracing::instrument(skip(self))]
    pub async fn by_use_table(
        &self,
        name: &str,
        id: &str,
        opts: &QueryOptions,
    ) -> Result<Option<AlertResult>, AlertsError> {
        info!("Obtaining use data");
        let use_table: UseTable = name.parse()?;
        let pid = validate::numeric_id("id", id)?;
        let (period, params) = opts.bind()?;
        let params = params.fragment("useTable", use_table.table()).int("pid", pid);
        self.count(&USE, params, &period).await
    }

    /// Alerts inside a WDPA protected area.
    #[tracing::instrument(skip(self))]
    pub async fn by_protected_area(
        &self,
        wdpaid: &str,
        opts: &QueryOptions,
    ) -> Result<Option<AlertResult>, AlertsError> {
        info!("Obtaining wdpa data");
        let wdpaid = validate::numeric_id("wdpaid", wdpaid)?;
        let (period, params) = opts.bind()?;
        self.count(&WDPA, params.int("wdpaid", wdpaid), &period).await
    }

    /// Alerts inside the polygon stored under geostore `hash`.
    ///
    /// A hash that cannot be resolved fails with [`AlertsError::NotFound`]
    /// and the SQL service is not called.
    #[tracing::instrument(skip(self, api_key))]
    pub async fn by_polygon(
        &self,
        hash: Option<&str>,
        opts: &QueryOptions,
        api_key: Option<&str>,
    ) -> Result<Option<AlertResult>, AlertsError> {
        info!("Obtaining world data");
        let hash = validate::geostore_hash(hash)?;
        let (period, params) = opts.bind()?;

        let Some(geometry) = resolve_geostore(self.geostore.as_ref(), hash, api_key).await else {
            return Err(AlertsError::not_found("Geostore not found"));
        };

        debug!("Executing query with geostore geometry");
        self.count(&WORLD, params.text("geojson", geometry.to_json()), &period)
            .await
    }

    /// The `limit` most recent distinct alert dates, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn latest(&self, limit: Option<&str>) -> Result<Vec<LatestDate>, AlertsError> {
        info!("Obtaining latest data");
        let limit = validate::limit(limit)?;
        let params = QueryParams::new().int("limit", limit);

        execute(self.sql.as_ref(), &LATEST, &params)
            .await?
            .into_iter()
            .map(decode_row)
            .collect()
    }

    async fn count(
        &self,
        template: &QueryTemplate,
        params: QueryParams,
        period: &Period,
    ) -> Result<Option<AlertResult>, AlertsError> {
        let rows = execute(self.sql.as_ref(), template, &params).await?;
        let Some(row) = rows.into_iter().next() else {
            debug!(template = template.name(), "No rows");
            return Ok(None);
        };
        let row: CountRow = decode_row(row)?;

        Ok(Some(AlertResult {
            value: row.value,
            min_date: row.min_date,
            max_date: row.max_date,
            period: period.label().to_string(),
            download_urls: build_download_urls(&self.download_base, template, &params),
        }))
    }
}
