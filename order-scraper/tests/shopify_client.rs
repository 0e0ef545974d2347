//! ShopifyClient against an in-process mock of the Admin API

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use order_scraper::{FetchOptions, OrderSource, ShopSession, ShopifyClient, SourceError, aggregate};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TOKEN: &str = "shpat_test";
const PREFIX: &str = "/admin/api/2022-04";

#[derive(Clone)]
struct MockShop {
    base: String,
    pages: usize,
    broken_orders: bool,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockShop {
    fn queries(&self) -> Vec<HashMap<String, String>> {
        self.seen.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-shopify-access-token")
        .and_then(|v| v.to_str().ok())
        == Some(TOKEN)
}

fn rejected() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "errors": "[API] Invalid API key or access token" })),
    )
        .into_response()
}

async fn shop(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected();
    }
    Json(json!({ "shop": { "id": 1, "name": "Demo Shop", "currency": "EUR" } })).into_response()
}

async fn orders(
    State(mock): State<MockShop>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return rejected();
    }
    if mock.broken_orders {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    mock.seen.lock().unwrap().push(query.clone());

    let page: usize = query
        .get("page_info")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let body = json!({
        "orders": [{
            "id": page,
            "email": "buyer@example.com",
            "financial_status": "paid",
            "line_items": [
                { "id": 10, "title": "A", "quantity": 2, "price": "9.99" },
                { "id": 11, "title": format!("P{page}"), "quantity": 1, "price": "1.00" }
            ]
        }]
    });

    let mut response = Json(body).into_response();
    if page < mock.pages {
        let link = format!(
            "<{}{PREFIX}/orders.json?limit=1&page_info={}>; rel=\"next\"",
            mock.base,
            page + 1
        );
        response
            .headers_mut()
            .insert(header::LINK, link.parse().unwrap());
    }
    response
}

async fn spawn_shop(pages: usize, broken_orders: bool) -> MockShop {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mock = MockShop {
        base: format!("http://{}", listener.local_addr().unwrap()),
        pages,
        broken_orders,
        seen: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route(&format!("{PREFIX}/shop.json"), get(shop))
        .route(&format!("{PREFIX}/orders.json"), get(orders))
        .with_state(mock.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    mock
}

async fn client(mock: &MockShop, options: FetchOptions) -> Result<ShopifyClient, SourceError> {
    let session = ShopSession::new(&mock.base, "2022-04", TOKEN).unwrap();
    ShopifyClient::connect(session, options).await
}

#[tokio::test]
async fn test_authenticate_with_defaults() {
    let mock = spawn_shop(1, false).await;
    let client = ShopifyClient::authenticate(TOKEN, &mock.base, "2022-04")
        .await
        .unwrap();
    assert_eq!(client.options(), &FetchOptions::default());
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() {
    let mock = spawn_shop(1, false).await;
    let err = ShopifyClient::authenticate("shpat_wrong", &mock.base, "2022-04")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SourceError::Unauthorized { status: 401 }));
}

#[tokio::test]
async fn test_follows_link_pagination() {
    let mock = spawn_shop(3, false).await;
    let client = client(&mock, FetchOptions::default()).await.unwrap();

    let orders = client.fetch_orders().await.unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].id, Some(1));

    let totals = aggregate(&orders);
    assert_eq!(totals["A"], 6);
    assert_eq!(totals["P1"], 1);
    assert_eq!(totals["P3"], 1);

    let queries = mock.queries();
    assert_eq!(queries.len(), 3);
    assert_eq!(queries[0].get("status").map(String::as_str), Some("open"));
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("250"));
    assert!(!queries[0].contains_key("created_at_min"));
    // cursor pages only carry what the Link URL carries
    assert_eq!(queries[1].get("page_info").map(String::as_str), Some("2"));
    assert!(!queries[1].contains_key("status"));
}

#[tokio::test]
async fn test_page_limit_stops_early() {
    let mock = spawn_shop(10, false).await;
    let options = FetchOptions {
        max_pages: 2,
        ..FetchOptions::default()
    };
    let client = client(&mock, options).await.unwrap();

    let orders = client.fetch_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(mock.queries().len(), 2);
}

#[tokio::test]
async fn test_window_and_status_in_first_query() {
    let mock = spawn_shop(1, false).await;
    let options = FetchOptions {
        status: "closed".into(),
        page_size: 50,
        window: Some(Duration::from_secs(24 * 3600)),
        ..FetchOptions::default()
    };
    let client = client(&mock, options).await.unwrap();
    client.fetch_orders().await.unwrap();

    let queries = mock.queries();
    assert_eq!(queries[0].get("status").map(String::as_str), Some("closed"));
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("50"));
    let since = queries[0].get("created_at_min").unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(since).is_ok());
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let mock = spawn_shop(1, true).await;
    let client = client(&mock, FetchOptions::default()).await.unwrap();

    match client.fetch_orders().await {
        Err(SourceError::Status { status, url, body }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/orders.json"));
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected result: {:?}", other.map(|o| o.len())),
    }
}

#[tokio::test]
async fn test_unreachable_shop_is_http_error() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = ShopifyClient::authenticate(TOKEN, &format!("http://{addr}"), "2022-04")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SourceError::Http(_)));
}
