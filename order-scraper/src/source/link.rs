//! Cursor pagination via the `Link` response header
//!
//! ```text
//! Link: <https://shop/admin/api/2022-04/orders.json?limit=250&page_info=abc>; rel="previous",
//!       <https://shop/admin/api/2022-04/orders.json?limit=250&page_info=def>; rel="next"
//! ```

/// URL of the `rel="next"` entry, if any
pub fn next_page_url(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let param = param.trim();
            match param.split_once('=') {
                Some((key, value)) => {
                    key.trim().eq_ignore_ascii_case("rel")
                        && value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .any(|rel| rel.eq_ignore_ascii_case("next"))
                }
                None => false,
            }
        });

        is_next.then(|| url.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_only() {
        let header = r#"<https://demo.myshopify.com/admin/api/2022-04/orders.json?limit=250&page_info=abc>; rel="next""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://demo.myshopify.com/admin/api/2022-04/orders.json?limit=250&page_info=abc")
        );
    }

    #[test]
    fn test_previous_and_next() {
        let header = concat!(
            r#"<https://s/orders.json?page_info=prev>; rel="previous", "#,
            r#"<https://s/orders.json?page_info=next>; rel="next""#
        );
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://s/orders.json?page_info=next")
        );
    }

    #[test]
    fn test_previous_only_is_last_page() {
        let header = r#"<https://s/orders.json?page_info=prev>; rel="previous""#;
        assert_eq!(next_page_url(header), None);
    }

    #[test]
    fn test_unquoted_rel() {
        assert_eq!(
            next_page_url("<https://s/o?page_info=x>; rel=next").as_deref(),
            Some("https://s/o?page_info=x")
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(next_page_url(""), None);
        assert_eq!(next_page_url("not a link header"), None);
    }
}
