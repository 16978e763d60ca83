//! JSON:API documents for alert counts and latest dates.

use serde::Serialize;

use crate::alerts::{AlertResult, LatestDate};
use crate::download::DownloadUrls;

pub const ALERTS_TYPE: &str = "quicc-alerts";
pub const LATEST_TYPE: &str = "imazon-latest";

/// Top-level `{"data": ...}` wrapper.
#[derive(Debug, Serialize)]
pub struct Document<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: A,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAttributes<'a> {
    pub value: u64,
    pub period: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<&'a str>,
    pub download_urls: &'a DownloadUrls,
}

#[derive(Debug, Serialize)]
pub struct LatestAttributes<'a> {
    pub date: &'a str,
}

pub type AlertsDocument<'a> = Document<Option<Resource<AlertAttributes<'a>>>>;
pub type LatestDocument<'a> = Document<Vec<Resource<LatestAttributes<'a>>>>;

/// Renders a count result; `None` becomes `{"data": null}`.
pub fn serialize_alerts(result: Option<&AlertResult>) -> AlertsDocument<'_> {
    Document {
        data: result.map(|r| Resource {
            kind: ALERTS_TYPE,
            attributes: AlertAttributes {
                value: r.value,
                period: &r.period,
                min_date: r.min_date.as_deref(),
                max_date: r.max_date.as_deref(),
                download_urls: &r.download_urls,
            },
        }),
    }
}

/// Renders latest dates, one resource per date, in the given order.
pub fn serialize_latest(dates: &[LatestDate]) -> LatestDocument<'_> {
    Document {
        data: dates
            .iter()
            .map(|d| Resource {
                kind: LATEST_TYPE,
                attributes: LatestAttributes { date: &d.date },
            })
            .collect(),
    }
}
