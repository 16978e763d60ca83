use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quicc_alerts::alerts::AlertsService;
use quicc_alerts::server::{self, App, AppState};
use quicc_alerts::services::geostore_api::{FeatureCollection, Geostore, GeostoreApi};
use quicc_alerts::services::sql_api::{Row, SqlApi};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingSql {
    rows: Vec<Row>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl RecordingSql {
    fn with_rows(rows: Value) -> Arc<Self> {
        Arc::new(Self {
            rows: serde_json::from_value(rows).unwrap(),
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> String {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl SqlApi for RecordingSql {
    async fn query(&self, sql: &str) -> anyhow::Result<Vec<Row>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self.rows.clone())
    }
}

struct StaticGeostore {
    known_hash: &'static str,
    seen_keys: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl GeostoreApi for StaticGeostore {
    async fn geostore(&self, hash: &str, api_key: Option<&str>) -> anyhow::Result<Geostore> {
        self.seen_keys
            .lock()
            .unwrap()
            .push(api_key.map(str::to_string));
        if hash != self.known_hash {
            anyhow::bail!("upstream returned status 404: GeoStore not found");
        }
        let geojson: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[-60,-3],[-59,-3],[-59,-2],[-60,-3]]]}
            }]
        }))?;
        Ok(Geostore {
            id: hash.to_string(),
            geojson: Some(geojson),
        })
    }
}

fn app(sql: Arc<RecordingSql>) -> (App, Arc<StaticGeostore>) {
    let geostore = Arc::new(StaticGeostore {
        known_hash: "0d5b1b4b3a",
        seen_keys: Mutex::new(Vec::new()),
    });
    let service = AlertsService::new(
        sql,
        geostore.clone(),
        "https://wri-01.carto.com/api/v2/sql",
    );
    (server::app(AppState::new(Arc::new(service))), geostore)
}

async fn get(app: App, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: App, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_country_default_period() {
    let sql = RecordingSql::with_rows(json!([{"value": 128}]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app, "/api/v1/quicc-alerts/admin/BRA").await;
    assert_eq!(status, StatusCode::OK);

    let attrs = &body["data"]["attributes"];
    assert_eq!(body["data"]["type"], "quicc-alerts");
    assert_eq!(attrs["value"], 128);
    assert_eq!(attrs["period"], "Past 24 hours");
    assert!(attrs.get("minDate").is_none());
    assert!(attrs.get("maxDate").is_none());

    let urls = attrs["downloadUrls"].as_object().unwrap();
    let mut keys: Vec<_> = urls.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["csv", "geojson", "kml", "shp", "svg"]);
    assert!(urls["csv"].as_str().unwrap().starts_with("https://wri-01.carto.com/api/v2/sql?q=SELECT%20pt.%2A"));

    assert!(sql.last().contains("UPPER('BRA')"));
}

#[tokio::test]
async fn test_country_with_alert_query_and_period() {
    let sql = RecordingSql::with_rows(json!([{
        "value": 3,
        "min_date": "2017-03-01T00:00:00Z",
        "max_date": "2017-03-03T00:00:00Z"
    }]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(
        app,
        "/api/v1/quicc-alerts/admin/bra?alertQuery=true&period=2017-03-01,2017-03-04",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let attrs = &body["data"]["attributes"];
    assert_eq!(attrs["period"], "Past 72 hours");
    assert_eq!(attrs["minDate"], "2017-03-01T00:00:00Z");
    assert_eq!(attrs["maxDate"], "2017-03-03T00:00:00Z");
    assert!(sql.last().contains("MAX(date) as max_date"));
    // download links dump rows, not aggregates
    let csv = attrs["downloadUrls"]["csv"].as_str().unwrap();
    assert!(!csv.contains("max_date"));
}

#[tokio::test]
async fn test_province() {
    let sql = RecordingSql::with_rows(json!([{"value": 1}]));
    let (app, _) = app(sql.clone());

    let (status, _) = get(app, "/api/v1/quicc-alerts/admin/IDN/5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sql.last().contains("id_1 = 5"));
}

#[tokio::test]
async fn test_use_oilpalm_maps_table() {
    let sql = RecordingSql::with_rows(json!([{"value": 10}]));
    let (app, _) = app(sql.clone());

    let (status, _) = get(app, "/api/v1/quicc-alerts/use/oilpalm/42").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sql.last().contains("FROM gfw_oil_palm WHERE cartodb_id = 42"));
}

#[tokio::test]
async fn test_use_unknown_is_bad_request_without_remote_call() {
    let sql = RecordingSql::with_rows(json!([{"value": 10}]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app, "/api/v1/quicc-alerts/use/unknown/42").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["detail"], "Name param invalid");
    assert_eq!(sql.calls(), 0);
}

#[tokio::test]
async fn test_wdpa_zero_rows_is_null_data() {
    let sql = RecordingSql::with_rows(json!([]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app, "/api/v1/quicc-alerts/wdpa/555").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": null}));
    assert!(sql.last().contains("wdpaid=555"));
}

#[tokio::test]
async fn test_world_requires_geostore() {
    let sql = RecordingSql::with_rows(json!([{"value": 1}]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app, "/api/v1/quicc-alerts").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["detail"], "GeoJSON param required");
    assert_eq!(sql.calls(), 0);
}

#[tokio::test]
async fn test_world_unknown_geostore_is_not_found() {
    let sql = RecordingSql::with_rows(json!([{"value": 1}]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app, "/api/v1/quicc-alerts?geostore=ffffffff").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["detail"], "Geostore not found");
    assert_eq!(sql.calls(), 0);
}

#[tokio::test]
async fn test_world_forwards_api_key() {
    let sql = RecordingSql::with_rows(json!([{"value": 4}]));
    let (app, geostore) = app(sql.clone());

    let req = Request::builder()
        .uri("/api/v1/quicc-alerts?geostore=0d5b1b4b3a&period=2017-01-01,2017-01-03")
        .header("x-api-key", "user-key")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["attributes"]["value"], 4);
    assert_eq!(body["data"]["attributes"]["period"], "Past 48 hours");
    assert_eq!(
        geostore.seen_keys.lock().unwrap().as_slice(),
        [Some("user-key".to_string())]
    );
    assert!(sql.last().contains("ST_GeomFromGeoJSON('{\"coordinates\""));
}

#[tokio::test]
async fn test_latest_default_and_explicit_limit() {
    let sql = RecordingSql::with_rows(json!([
        {"date": "2017-03-04T00:00:00Z"},
        {"date": "2017-03-02T00:00:00Z"},
        {"date": "2017-03-01T00:00:00Z"}
    ]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app.clone(), "/api/v1/quicc-alerts/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sql.last().ends_with("LIMIT 3"));
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["type"], "imazon-latest");
    assert_eq!(data[0]["attributes"]["date"], "2017-03-04T00:00:00Z");

    let (status, _) = get(app, "/api/v1/quicc-alerts/latest?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sql.last().ends_with("LIMIT 5"));
}

#[tokio::test]
async fn test_latest_rejects_bad_limit() {
    let sql = RecordingSql::with_rows(json!([]));
    let (app, _) = app(sql.clone());

    let (status, _) = get(app, "/api/v1/quicc-alerts/latest?limit=zero").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(sql.calls(), 0);
}

#[tokio::test]
async fn test_bad_period_is_bad_request() {
    let sql = RecordingSql::with_rows(json!([{"value": 1}]));
    let (app, _) = app(sql.clone());

    let (status, _) = get(app, "/api/v1/quicc-alerts/admin/BRA?period=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(sql.calls(), 0);
}

#[tokio::test]
async fn test_healthcheck() {
    let (app, _) = app(RecordingSql::with_rows(json!([])));
    let (status, body) = get(app, "/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn test_trailing_slash_matches() {
    let sql = RecordingSql::with_rows(json!([{"value": 7}]));
    let (app, _) = app(sql.clone());

    let (status, body) = get(app.clone(), "/api/v1/quicc-alerts/?geostore=0d5b1b4b3a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["attributes"]["value"], 7);

    let (status, _) = get(app.clone(), "/api/v1/quicc-alerts/admin/BRA/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sql.last().contains("UPPER('BRA')"));

    let (status, body) = get(app, "/api/v1/quicc-alerts/latest/?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_array());
    assert!(sql.last().ends_with("LIMIT 2"));
}
