//! Shopify Admin REST client
//!
//! Authentication is a `GET shop.json` with the access token header; a
//! client is only handed out once the platform has accepted the session.
//! Orders come from `GET orders.json`, following `Link: rel="next"` cursors.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use shared::models::Order;
use std::time::Duration;

use super::link::next_page_url;
use super::{OrderSource, ShopSession, SourceError};

pub const DEFAULT_API_VERSION: &str = "2022-04";
/// `X-Shopify-Access-Token`, lowercase for `HeaderName::from_static`
pub const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";
/// Largest page the Admin API will serve
pub const MAX_PAGE_SIZE: u32 = 250;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_LIMIT: usize = 512;

/// Which orders to fetch each cycle
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// `status` query parameter (`open`, `closed`, `cancelled`, `any`)
    ///
    /// `open` is the platform's own default; closed and cancelled orders
    /// drop out of the totals on the next cycle.
    pub status: String,
    /// Orders per page, 1..=250
    pub page_size: u32,
    /// Upper bound on pages followed per fetch
    pub max_pages: u32,
    /// Only orders created within this window (`created_at_min`)
    pub window: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            status: "open".to_string(),
            page_size: MAX_PAGE_SIZE,
            max_pages: 20,
            window: None,
        }
    }
}

impl FetchOptions {
    /// Clamp to what the platform accepts
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.max_pages = self.max_pages.max(1);
        self
    }
}

#[derive(Deserialize)]
struct ShopEnvelope {
    shop: ShopInfo,
}

#[derive(Deserialize)]
struct ShopInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

/// Authenticated Shopify session
pub struct ShopifyClient {
    session: ShopSession,
    http: reqwest::Client,
    options: FetchOptions,
}

impl ShopifyClient {
    /// Open and verify a session with default fetch options
    pub async fn authenticate(
        access_token: &str,
        shop_url: &str,
        api_version: &str,
    ) -> Result<Self, SourceError> {
        let session = ShopSession::new(shop_url, api_version, access_token)?;
        Self::connect(session, FetchOptions::default()).await
    }

    /// Verify `session` against the platform and keep it for later requests
    pub async fn connect(session: ShopSession, options: FetchOptions) -> Result<Self, SourceError> {
        let http = build_http_client(&session)?;
        let client = Self {
            session,
            http,
            options: options.normalized(),
        };
        client.verify().await?;
        Ok(client)
    }

    pub fn session(&self) -> &ShopSession {
        &self.session
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    async fn verify(&self) -> Result<(), SourceError> {
        let url = self.session.endpoint("shop.json");
        tracing::info!(base_url = %self.session.base_url(), api_version = %self.session.api_version(), "Authenticating with shop");

        let response = check_status(self.http.get(&url).send().await?, &url).await?;
        let body = response.bytes().await?;
        let envelope: ShopEnvelope =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        tracing::info!(
            shop = envelope.shop.name.as_deref().unwrap_or("<unnamed>"),
            "Shop session verified"
        );
        Ok(())
    }

    fn first_page_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("status", self.options.status.clone()),
            ("limit", self.options.page_size.to_string()),
        ];
        if let Some(since) = self.options.window.and_then(created_at_min) {
            query.push(("created_at_min", since));
        }
        query
    }

    /// One page of orders plus the cursor URL of the next page
    async fn fetch_page(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<(Vec<Order>, Option<String>), SourceError> {
        let response = check_status(request.send().await?, url).await?;

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let body = response.bytes().await?;
        let envelope: OrdersEnvelope =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok((envelope.orders, next))
    }
}

#[async_trait]
impl OrderSource for ShopifyClient {
    async fn fetch_orders(&self) -> Result<Vec<Order>, SourceError> {
        let url = self.session.endpoint("orders.json");
        let request = self.http.get(&url).query(&self.first_page_query());
        let (mut orders, mut next) = self.fetch_page(request, &url).await?;
        let mut pages = 1;

        while let Some(cursor) = next.take() {
            if pages >= self.options.max_pages {
                tracing::warn!(
                    pages,
                    orders = orders.len(),
                    "Page limit reached, remaining orders not fetched this cycle"
                );
                break;
            }
            // cursor URLs carry their own query
            let (page, following) = self.fetch_page(self.http.get(&cursor), &cursor).await?;
            orders.extend(page);
            next = following;
            pages += 1;
        }

        tracing::debug!(pages, orders = orders.len(), "Orders fetched");
        Ok(orders)
    }
}

fn build_http_client(session: &ShopSession) -> Result<reqwest::Client, SourceError> {
    let mut token = HeaderValue::from_str(session.access_token())
        .map_err(|_| SourceError::InvalidSession("access token is not a valid header value".into()))?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_TOKEN_HEADER, token);

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(SourceError::Unauthorized {
            status: status.as_u16(),
        });
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > ERROR_BODY_LIMIT {
        let mut cut = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(SourceError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

fn created_at_min(window: Duration) -> Option<String> {
    let delta = chrono::Duration::from_std(window).ok()?;
    Utc::now()
        .checked_sub_signed(delta)
        .map(|since| since.to_rfc3339_opts(SecondsFormat::Secs, true))
}
