//! Canonical mockup URL construction.
//!
//! The canonical path built here is both the payload sent to the URL signer
//! and, once qualified with the account id, the signature cache key. Two
//! logically identical requests must therefore produce byte-identical paths.

use crate::error::{MockupError, Result};
use crate::types::MockupRequest;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use url::{form_urlencoded, Url};

/// Path of the mockup rendering endpoint.
pub const MOCKUP_PATH: &str = "/mockup";
/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "signature";
/// Query parameter scoping a cache key to an account.
pub const ACCOUNT_PARAM: &str = "accountId";
/// Variant used when the product selection names none.
pub const DEFAULT_VARIANT_ID: &str = "default";

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn looks_absolute(url: &str) -> bool {
    url.starts_with("//") || Url::parse(url).is_ok()
}

/// Ensure `url` is relative and starts with exactly one `/`.
///
/// # Example
///
/// ```
/// use mockup_sdk::url_builder::normalize_relative;
///
/// assert_eq!(normalize_relative("mockup?a=1").unwrap(), "/mockup?a=1");
/// assert!(normalize_relative("https://example.com/mockup").is_err());
/// ```
pub fn normalize_relative(url: &str) -> Result<String> {
    if looks_absolute(url) {
        return Err(MockupError::InvalidUrl(format!(
            "expected a relative URL, got {url}"
        )));
    }

    Ok(format!("/{}", url.trim_start_matches('/')))
}

/// Join a relative URL onto `base` with exactly one `/` between them.
pub fn to_absolute(relative: &str, base: &str) -> Result<String> {
    let path = normalize_relative(relative)?;

    Ok(format!("{}{}", base.trim_end_matches('/'), path))
}

/// Append `key=value` to `url`, starting the query string if needed.
pub fn append_query_param(url: &str, key: &str, value: &str) -> String {
    let separator = match url.find('?') {
        None => "?",
        Some(_) if url.ends_with('?') || url.ends_with('&') => "",
        Some(_) => "&",
    };

    format!("{url}{separator}{}={}", encode(key), encode(value))
}

/// Decode the first value of `key` from the query string of `url`.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Build the canonical relative path for a mockup request.
///
/// Parameters are emitted in a fixed order: `productId`, `mockupId`,
/// `variantId`, `design`, then `width` when set. The design is compact JSON,
/// base64 encoded.
pub fn build_canonical_mockup_path(request: &MockupRequest) -> Result<String> {
    let design = serde_json::to_string(&request.design)?;
    let design = BASE64.encode(design);
    let product = &request.product;
    let variant_id = product
        .variant_id
        .as_deref()
        .unwrap_or(DEFAULT_VARIANT_ID);

    let mut path = append_query_param(MOCKUP_PATH, "productId", &product.product_id);
    path = append_query_param(&path, "mockupId", &product.mockup_id);
    path = append_query_param(&path, "variantId", variant_id);
    path = append_query_param(&path, "design", &design);
    if let Some(width) = product.width {
        path = append_query_param(&path, "width", &width.to_string());
    }

    Ok(path)
}

/// Qualify a canonical path with the owning account.
pub fn account_cache_key(canonical_path: &str, account_id: &str) -> String {
    append_query_param(canonical_path, ACCOUNT_PARAM, account_id)
}
