//! Shop session handle
//!
//! The platform's own SDKs bind a session globally ("activate"); here the
//! session is a plain value owned by the client and threaded into every
//! request.

use super::SourceError;

/// Explicit session: which shop, which API version, which token
#[derive(Clone)]
pub struct ShopSession {
    /// Scheme + host, without trailing slash (e.g. `https://demo.myshopify.com`)
    base_url: String,
    api_version: String,
    access_token: String,
}

impl ShopSession {
    /// Validate and normalize session parameters
    ///
    /// `shop_url` may be a bare domain (`demo.myshopify.com`, https is
    /// implied) or a full URL with scheme.
    pub fn new(shop_url: &str, api_version: &str, access_token: &str) -> Result<Self, SourceError> {
        let shop_url = shop_url.trim().trim_end_matches('/');
        if shop_url.is_empty() {
            return Err(SourceError::InvalidSession("shop URL is empty".into()));
        }

        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(SourceError::InvalidSession("access token is empty".into()));
        }

        let api_version = api_version.trim();
        if api_version.is_empty() || api_version.contains('/') {
            return Err(SourceError::InvalidSession(format!(
                "invalid API version: {api_version:?}"
            )));
        }

        let base_url = if shop_url.contains("://") {
            shop_url.to_string()
        } else {
            format!("https://{shop_url}")
        };

        Ok(Self {
            base_url,
            api_version: api_version.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Admin API URL for a resource path, e.g. `orders.json`
    pub fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/admin/api/{}/{}",
            self.base_url,
            self.api_version,
            resource.trim_start_matches('/')
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for ShopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopSession")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("access_token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_https() {
        let session = ShopSession::new("demo.myshopify.com/", "2022-04", "shpat_x").unwrap();
        assert_eq!(session.base_url(), "https://demo.myshopify.com");
        assert_eq!(
            session.endpoint("orders.json"),
            "https://demo.myshopify.com/admin/api/2022-04/orders.json"
        );
    }

    #[test]
    fn test_explicit_scheme_kept() {
        let session = ShopSession::new("http://127.0.0.1:8080", "2022-04", "t").unwrap();
        assert_eq!(
            session.endpoint("/shop.json"),
            "http://127.0.0.1:8080/admin/api/2022-04/shop.json"
        );
    }

    #[test]
    fn test_rejects_empty_parameters() {
        assert!(matches!(
            ShopSession::new("", "2022-04", "t"),
            Err(SourceError::InvalidSession(_))
        ));
        assert!(matches!(
            ShopSession::new("demo.myshopify.com", "2022-04", "  "),
            Err(SourceError::InvalidSession(_))
        ));
        assert!(matches!(
            ShopSession::new("demo.myshopify.com", "../x", "t"),
            Err(SourceError::InvalidSession(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = ShopSession::new("demo.myshopify.com", "2022-04", "shpat_secret").unwrap();
        assert!(!format!("{session:?}").contains("shpat_secret"));
    }
}
