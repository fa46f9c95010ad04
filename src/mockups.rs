//! Signed mockup URLs.
//!
//! This module provides the MockupsClient, which turns a [`MockupRequest`]
//! into an absolute signed URL. Signatures are cached per account, so a
//! repeated request is answered without contacting the signer.

use crate::client::Client;
use crate::error::{MockupError, Result};
use crate::rate::RateObserver;
use crate::types::{CacheStats, DesignElement, MockupRequest, MockupUrl, RateLimitInfo};
use crate::url_builder::{
    account_cache_key, append_query_param, build_canonical_mockup_path, to_absolute,
    SIGNATURE_PARAM,
};
use tracing::debug;

/// Client for mockup URL operations.
///
/// Access via `client.mockups()`.
pub struct MockupsClient {
    client: Client,
}

// Releases the in-flight slot even if the signing future is dropped.
struct QueueSlot<'a>(&'a RateObserver);

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        self.0.decrease_queue();
    }
}

impl MockupsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get an absolute, signed URL for a mockup.
    ///
    /// The request is validated before anything else happens. A cached
    /// signature for the same request and account is reused; otherwise the
    /// URL signer is called exactly once.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mockup_sdk::{Client, ClientOptions};
    /// use mockup_sdk::types::{
    ///     Alignment, ColorElement, DesignElement, MockupRequest, ProductSelection,
    /// };
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new(ClientOptions::new("acct_123", "client_abc"))?;
    ///
    ///     let mockup = client.mockups().get_mockup_url(&MockupRequest {
    ///         design: vec![DesignElement::Color(ColorElement {
    ///             name: "front".to_string(),
    ///             width: 1200,
    ///             height: 1200,
    ///             alignment: Alignment::Center,
    ///             hex: "#FF0000".to_string(),
    ///             tile: None,
    ///         })],
    ///         product: ProductSelection {
    ///             product_id: "tshirt".to_string(),
    ///             mockup_id: "front-flat".to_string(),
    ///             ..Default::default()
    ///         },
    ///     }).await?;
    ///
    ///     println!("Mockup: {}", mockup.url);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_mockup_url(&self, request: &MockupRequest) -> Result<MockupUrl> {
        validate_request(request)?;

        let rate = &self.client.inner.rate;
        rate.track();
        let _slot = QueueSlot(rate);

        self.sign(request).await
    }

    async fn sign(&self, request: &MockupRequest) -> Result<MockupUrl> {
        let inner = &self.client.inner;
        let canonical_path = build_canonical_mockup_path(request)?;
        let cache_key = account_cache_key(&canonical_path, &inner.options.account_id);
        let base = &inner.endpoints.mockup_api_url;

        if let Some(signature) = inner.cache.get(&cache_key) {
            debug!(target: "mockup_sdk", "signature cache hit");
            let signed = append_query_param(&cache_key, SIGNATURE_PARAM, &signature);

            return Ok(MockupUrl {
                url: to_absolute(&signed, base)?,
            });
        }

        debug!(target: "mockup_sdk", "signature cache miss");
        let signed = self.client.request_signature(&cache_key).await?;
        let url = to_absolute(&signed.url_with_signature, base)?;
        inner.cache.set(cache_key, signed.signature);

        Ok(MockupUrl { url })
    }

    /// Snapshot of the advisory rate counters.
    pub fn get_rate_limit_info(&self) -> RateLimitInfo {
        self.client.inner.rate.snapshot()
    }

    /// Current state of the signature cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.client.inner.cache.stats()
    }

    /// Forget every cached signature, including persisted ones.
    pub fn clear_cache(&self) {
        self.client.inner.cache.clear();
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn validate_element(index: usize, element: &DesignElement) -> Result<()> {
    let invalid = |reason: &str| Err(MockupError::validation(format!("design[{index}]: {reason}")));

    if element.name().trim().is_empty() {
        return invalid("name is required");
    }
    let (width, height) = element.size();
    if width == 0 || height == 0 {
        return invalid("width and height must be greater than zero");
    }

    match element {
        DesignElement::Image(image) if image.image_url.trim().is_empty() => {
            invalid("imageUrl is required for image elements")
        }
        DesignElement::Image(image) if image.scale.is_some_and(|s| !s.is_finite() || s <= 0.0) => {
            invalid("scale must be a positive number")
        }
        DesignElement::Color(color) if color.hex.trim().is_empty() => {
            invalid("hex is required for color elements")
        }
        DesignElement::Color(color) if !is_hex_color(&color.hex) => {
            invalid("hex must look like #RGB, #RRGGBB or #RRGGBBAA")
        }
        _ => Ok(()),
    }
}

/// Check a request before any cache or network access.
pub(crate) fn validate_request(request: &MockupRequest) -> Result<()> {
    if request.design.is_empty() {
        return Err(MockupError::validation(
            "design must contain at least one element",
        ));
    }
    for (index, element) in request.design.iter().enumerate() {
        validate_element(index, element)?;
    }

    if request.product.product_id.trim().is_empty() {
        return Err(MockupError::validation("product.productId is required"));
    }
    if request.product.mockup_id.trim().is_empty() {
        return Err(MockupError::validation("product.mockupId is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Alignment, ColorElement, ImageElement, ProductSelection};

    fn color(hex: &str) -> DesignElement {
        DesignElement::Color(ColorElement {
            name: "front".to_string(),
            width: 100,
            height: 100,
            alignment: Alignment::Center,
            hex: hex.to_string(),
            tile: None,
        })
    }

    fn image(image_url: &str, scale: Option<f64>) -> DesignElement {
        DesignElement::Image(ImageElement {
            name: "front".to_string(),
            width: 100,
            height: 100,
            alignment: Alignment::Center,
            image_url: image_url.to_string(),
            tile: Some(true),
            scale,
        })
    }

    fn request(design: Vec<DesignElement>) -> MockupRequest {
        MockupRequest {
            design,
            product: ProductSelection {
                product_id: "p1".to_string(),
                mockup_id: "m1".to_string(),
                variant_id: Some("v1".to_string()),
                width: None,
            },
        }
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF0000"));
        assert!(is_hex_color("#f00"));
        assert!(is_hex_color("#FF000080"));
        assert!(!is_hex_color("FF0000"));
        assert!(!is_hex_color("#GG0000"));
        assert!(!is_hex_color("#FF00"));
    }

    #[test]
    fn test_valid_request() {
        let req = request(vec![color("#FF0000"), image("https://cdn.example.com/a.png", Some(1.5))]);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_rejects_empty_design() {
        let err = validate_request(&request(vec![])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_missing_discriminant_fields() {
        assert!(validate_request(&request(vec![color("")])).unwrap_err().is_validation());
        assert!(validate_request(&request(vec![color("red")])).unwrap_err().is_validation());
        assert!(validate_request(&request(vec![image("", None)])).unwrap_err().is_validation());
        assert!(
            validate_request(&request(vec![image("https://cdn.example.com/a.png", Some(0.0))]))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn test_error_names_the_element() {
        let err = validate_request(&request(vec![color("#FFF"), image("", None)])).unwrap_err();
        assert!(err.to_string().contains("design[1]"));
    }

    #[test]
    fn test_rejects_missing_product_ids() {
        let mut req = request(vec![color("#FFF")]);
        req.product.product_id.clear();
        assert!(validate_request(&req).unwrap_err().is_validation());

        let mut req = request(vec![color("#FFF")]);
        req.product.mockup_id = " ".to_string();
        assert!(validate_request(&req).unwrap_err().is_validation());
    }
}
