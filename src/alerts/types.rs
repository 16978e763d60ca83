use serde::Deserialize;

use crate::download::DownloadUrls;
use crate::error::AlertsError;
use crate::period::Period;
use crate::sql::QueryParams;
use crate::sql::queries::MIN_MAX_DATE_SQL;

use super::validate;

/// Options shared by every count query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Also aggregate the earliest and latest alert dates.
    pub alert_query: bool,
    /// `begin,end`; yesterday→today when absent.
    pub period: Option<String>,
}

impl QueryOptions {
    /// Builds options from raw query-string values.
    pub fn from_raw(alert_query: Option<&str>, period: Option<&str>) -> Self {
        Self {
            alert_query: validate::alert_query_flag(alert_query),
            period: period.map(str::to_string),
        }
    }

    /// Resolves the period and binds `begin`, `end` and, when requested,
    /// the min/max date aggregation.
    pub(crate) fn bind(&self) -> Result<(Period, QueryParams), AlertsError> {
        let period = Period::resolve(self.period.as_deref())?;
        let mut params = QueryParams::new().period(&period);
        if self.alert_query {
            params = params.fragment("additionalSelect", MIN_MAX_DATE_SQL);
        }
        Ok((period, params))
    }
}

/// The single row a count query returns.
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub value: u64,
    #[serde(default)]
    pub min_date: Option<String>,
    #[serde(default)]
    pub max_date: Option<String>,
}

/// Alert count for one area and period.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertResult {
    pub value: u64,
    /// Only set when `alert_query` was requested.
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub period: String,
    pub download_urls: DownloadUrls,
}

/// One row of the latest-dates query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LatestDate {
    pub date: String,
}
