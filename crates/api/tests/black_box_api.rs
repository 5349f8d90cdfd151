use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use basketdash_api::app::services::AppServices;
use basketdash_api::config::ApiConfig;
use basketdash_products::LoadError;
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _dataset: tempfile::NamedTempFile,
}

impl TestServer {
    async fn spawn(csv: &str) -> Self {
        let mut dataset = tempfile::NamedTempFile::new().expect("failed to create dataset file");
        dataset.write_all(csv.as_bytes()).unwrap();

        let config = config_for(dataset.path().to_str().unwrap(), &[]);
        let services = AppServices::load(&config).expect("dataset should load");

        // Build app (same router as prod), but bind to an ephemeral port.
        let app = basketdash_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _dataset: dataset,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path: &str) -> serde_json::Value {
        let res = self.get(path).await;
        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            panic!("expected 200 OK from {path}, got {status} body={body}");
        }
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn config_for(dataset: &str, extra: &[(&str, &str)]) -> ApiConfig {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert("BASKETDASH_DATASET".to_string(), dataset.to_string());
    ApiConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Two categories; `Beverages/Tea` has twelve brands whose discount equals
/// their index, and one row with a missing brand that must be dropped.
fn catalog_csv() -> String {
    let mut csv = String::from("index,product,category,sub_category,brand,sale_price,market_price,type,rating\n");
    for i in 0..12 {
        csv.push_str(&format!(
            "{},Tea {i},Beverages,Tea,brand{i},100,{},Tea Bags,4.0\n",
            i + 1,
            100 + i
        ));
    }
    csv.push_str("13,Instant Coffee,Beverages,Coffee,Bru,150,180,Coffee,4.2\n");
    csv.push_str("14,Shampoo,Beauty & Hygiene,Hair Care,Dove,200,250,Shampoo,3.9\n");
    csv.push_str("15,Face Wash,Beauty & Hygiene,Skin Care,Himalaya,90,85,Face Wash,4.4\n");
    csv.push_str("16,Mystery Item,Beverages,Tea,,10,20,Tea Bags,1.0\n");
    csv
}

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let res = srv.get("/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    let request_id = res.headers().get("x-request-id").expect("x-request-id header");
    assert!(!request_id.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn dataset_reports_dropped_rows_and_defaults() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/dataset").await;
    assert_eq!(body["rows"], 15);
    assert_eq!(body["categories"], 2);
    assert_eq!(body["load"]["rows_read"], 16);
    assert_eq!(body["load"]["rows_dropped"], 1);
    assert_eq!(body["default_selection"]["category"], "Beverages");
    assert_eq!(body["default_selection"]["sub_category"], "Tea");
}

#[tokio::test]
async fn category_summary_groups_in_source_order() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/summary/categories").await;
    let summary = &body["summary"];
    assert_eq!(body["title"], "Category Wise Discount");
    assert_eq!(summary["dimension"], "category");
    assert_eq!(summary["total_count"], 15);
    assert_eq!(summary["series"]["labels"], serde_json::json!(["Beverages", "Beauty & Hygiene"]));

    // Beverages: 0 + 1 + ... + 11 = 66 from tea, 30 from coffee.
    assert_eq!(summary["series"]["discount"][0]["value"], 96.0);
    assert_eq!(summary["series"]["discount"][0]["text"], "96");
    // Beauty: 50 - 5 (face wash sells above market).
    assert_eq!(summary["series"]["discount"][1]["value"], 45.0);

    assert_eq!(summary["total_discount"]["display"], "141.00 Rs.");
    let market = summary["total_market"]["value"].as_f64().unwrap();
    let sale = summary["total_sale"]["value"].as_f64().unwrap();
    let discount = summary["total_discount"]["value"].as_f64().unwrap();
    assert!((market - sale - discount).abs() < 1e-9);
}

#[tokio::test]
async fn sub_category_summary_defaults_to_first_category() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/summary/sub-categories").await;
    assert_eq!(body["title"], "Result for Beverages");
    assert_eq!(body["summary"]["series"]["labels"], serde_json::json!(["Tea", "Coffee"]));
    assert_eq!(body["summary"]["total_count"], 13);

    let body = srv
        .get_json("/summary/sub-categories?category=Beauty%20%26%20Hygiene")
        .await;
    assert_eq!(body["category"], "Beauty & Hygiene");
    assert_eq!(body["summary"]["series"]["labels"], serde_json::json!(["Hair Care", "Skin Care"]));
    assert_eq!(body["summary"]["series"]["discount"][1]["value"], -5.0);
}

#[tokio::test]
async fn empty_dataset_has_no_default_category() {
    let srv = TestServer::spawn("category,sub_category,brand,sale_price,market_price\n").await;

    let body = srv.get_json("/summary/sub-categories").await;
    assert_eq!(body["title"], "No data loaded");
    assert!(body.get("category").is_none());
    assert_eq!(body["summary"]["total_count"], 0);

    let body = srv.get_json("/summary/brands").await;
    assert_eq!(body["summary"]["series"]["labels"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_category_returns_empty_summary_not_error() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/summary/sub-categories?category=Dairy").await;
    assert_eq!(body["summary"]["total_count"], 0);
    assert_eq!(body["summary"]["series"]["labels"], serde_json::json!([]));
    assert_eq!(body["summary"]["total_sale"]["display"], "0.00 Rs.");

    let body = srv.get_json("/categories/Dairy/sub-categories").await;
    assert_eq!(body["items"], serde_json::json!([]));
    assert!(body["default"].is_null());
}

#[tokio::test]
async fn brand_summary_returns_top_ten_by_discount() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv
        .get_json("/summary/brands?category=Beverages&sub_category=Tea")
        .await;
    assert_eq!(body["title"], "Top 10 Discount And Brand");
    let labels = body["summary"]["series"]["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 10);
    assert_eq!(labels[0], "brand11");
    assert_eq!(labels[9], "brand2");

    let discounts: Vec<f64> = body["summary"]["series"]["discount"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["value"].as_f64().unwrap())
        .collect();
    assert!(discounts.windows(2).all(|w| w[0] >= w[1]));

    // KPI totals cover all twelve tea brands, not just the top ten.
    assert_eq!(body["summary"]["total_count"], 12);
}

#[tokio::test]
async fn brand_summary_fills_defaults_and_honours_top_n() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/summary/brands?top_n=3").await;
    assert_eq!(body["category"], "Beverages");
    assert_eq!(body["sub_category"], "Tea");
    assert_eq!(body["top_n"], 3);
    assert_eq!(
        body["summary"]["series"]["labels"],
        serde_json::json!(["brand11", "brand10", "brand9"])
    );

    // Category without sub-category picks that category's first sub-category.
    let body = srv
        .get_json("/summary/brands?category=Beauty%20%26%20Hygiene")
        .await;
    assert_eq!(body["sub_category"], "Hair Care");
    assert_eq!(body["summary"]["series"]["labels"], serde_json::json!(["Dove"]));
}

#[tokio::test]
async fn invalid_query_parameters_are_rejected() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let res = srv.get("/summary/brands?top_n=0").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = srv.get("/summary/brands?top_n=ten").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_query");

    let res = srv.get("/summary/sub-categories?category=%20").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.get("/summary/brands?sub_category=Tea").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dropdown_options_follow_source_order() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let body = srv.get_json("/categories").await;
    assert_eq!(body["items"], serde_json::json!(["Beverages", "Beauty & Hygiene"]));
    assert_eq!(body["default"], "Beverages");

    let body = srv.get_json("/categories/Beverages/sub-categories").await;
    assert_eq!(body["items"], serde_json::json!(["Tea", "Coffee"]));
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let srv = TestServer::spawn(&catalog_csv()).await;

    let path = "/summary/brands?category=Beverages&sub_category=Tea&top_n=5";
    let first = srv.get_json(path).await;
    let second = srv.get_json(path).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn startup_fails_without_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let config = config_for(missing.to_str().unwrap(), &[]);

    let err = AppServices::load(&config).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn startup_fails_on_malformed_dataset() {
    let mut dataset = tempfile::NamedTempFile::new().unwrap();
    dataset
        .write_all(b"category,sub_category,brand,sale_price,market_price\nA,a,x,1\n")
        .unwrap();
    let config = config_for(dataset.path().to_str().unwrap(), &[("BASKETDASH_CURRENCY", "RS")]);

    let err = AppServices::load(&config).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
}
