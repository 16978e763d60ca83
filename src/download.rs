//! Public download links for the alerts behind a count.
//!
//! The count query is rewritten into a row dump (`SELECT pt.*`) and handed
//! to the CartoDB SQL API once per export format.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error};

use crate::sql::queries::{COUNT_SELECT, MIN_MAX_DATE_SQL};
use crate::sql::{QueryParams, QueryTemplate, RenderError};

const ROW_SELECT: &str = "SELECT pt.*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    Csv,
    Geojson,
    Kml,
    Shp,
    Svg,
}

impl DownloadFormat {
    pub const ALL: [DownloadFormat; 5] = [
        DownloadFormat::Csv,
        DownloadFormat::Geojson,
        DownloadFormat::Kml,
        DownloadFormat::Shp,
        DownloadFormat::Svg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::Csv => "csv",
            DownloadFormat::Geojson => "geojson",
            DownloadFormat::Kml => "kml",
            DownloadFormat::Shp => "shp",
            DownloadFormat::Svg => "svg",
        }
    }
}

/// Export format → URL. Either all five formats or none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DownloadUrls(BTreeMap<DownloadFormat, String>);

impl DownloadUrls {
    pub fn get(&self, format: DownloadFormat) -> Option<&str> {
        self.0.get(&format).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders `template` and turns the count into a row-returning query.
pub fn download_sql(template: &QueryTemplate, params: &QueryParams) -> Result<String, RenderError> {
    let sql = template.render(params)?;
    debug!(template = template.name(), sql = %sql, "Rendered query before rewrite");
    let sql = sql
        .replacen(MIN_MAX_DATE_SQL, "", 1)
        .replacen(COUNT_SELECT, ROW_SELECT, 1);
    debug!(template = template.name(), sql = %sql, "Rewrote count into row dump");
    Ok(sql)
}

/// Builds `<base_url>?q=<sql>&format=<fmt>` for every [`DownloadFormat`].
///
/// Never fails: if the query cannot be rendered the error is logged and an
/// empty mapping is returned, so the count itself is still served.
pub fn build_download_urls(
    base_url: &str,
    template: &QueryTemplate,
    params: &QueryParams,
) -> DownloadUrls {
    let sql = match download_sql(template, params) {
        Ok(sql) => sql,
        Err(e) => {
            error!(template = template.name(), error = %e, "Failed to build download URLs");
            return DownloadUrls::default();
        }
    };

    let encoded = urlencoding::encode(&sql);
    let urls = DownloadFormat::ALL
        .iter()
        .map(|f| (*f, format!("{}?q={}&format={}", base_url, encoded, f.as_str())))
        .collect();

    DownloadUrls(urls)
}
