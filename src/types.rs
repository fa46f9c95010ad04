//! Type definitions for the MockupSign SDK.
//!
//! Request types serialize into the design payload of a mockup URL, so their
//! field order is part of the cache identity of a request.

use serde::{Deserialize, Serialize};

/// How a design element is anchored inside its placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// An image placed on the product.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    /// Placement name (e.g., "front").
    pub name: String,
    /// Placement width in pixels.
    pub width: u32,
    /// Placement height in pixels.
    pub height: u32,
    /// Anchor inside the placement.
    pub alignment: Alignment,
    /// URL of the artwork to render.
    pub image_url: String,
    /// Repeat the image across the placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<bool>,
    /// Scale factor applied to the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// A solid color fill placed on the product.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorElement {
    /// Placement name (e.g., "front").
    pub name: String,
    /// Placement width in pixels.
    pub width: u32,
    /// Placement height in pixels.
    pub height: u32,
    /// Anchor inside the placement.
    pub alignment: Alignment,
    /// Hex color such as `#FF0000`.
    pub hex: String,
    /// Repeat the fill across the placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<bool>,
}

/// One element of a mockup design, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignElement {
    Image(ImageElement),
    Color(ColorElement),
}

impl DesignElement {
    /// Placement name of the element.
    pub fn name(&self) -> &str {
        match self {
            DesignElement::Image(e) => &e.name,
            DesignElement::Color(e) => &e.name,
        }
    }

    /// Placement size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        match self {
            DesignElement::Image(e) => (e.width, e.height),
            DesignElement::Color(e) => (e.width, e.height),
        }
    }
}

/// The product a design is rendered onto.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelection {
    /// Product identifier.
    pub product_id: String,
    /// Mockup template identifier.
    pub mockup_id: String,
    /// Product variant; the server's default variant when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    /// Output image width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// Request for a signed mockup URL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MockupRequest {
    /// Design elements, rendered in order.
    pub design: Vec<DesignElement>,
    /// Product selection.
    pub product: ProductSelection,
}

/// A signed, absolute mockup URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MockupUrl {
    /// Absolute URL that renders the mockup image.
    pub url: String,
}

impl MockupUrl {
    /// Returns the signature carried by the URL, if any.
    pub fn signature(&self) -> Option<String> {
        crate::url_builder::query_param(&self.url, crate::url_builder::SIGNATURE_PARAM)
    }
}

/// A signature held by the signature cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSignature {
    /// Canonical URL including the account qualifier.
    pub key: String,
    /// Signature returned by the signer.
    pub signature: String,
    /// Milliseconds since the Unix epoch of the last access.
    pub last_access_timestamp: u64,
}

/// Point-in-time view of the signature cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held in memory.
    pub size: usize,
    /// Maximum in-memory entries.
    pub memory_capacity: usize,
    /// Whether the durable store is in use.
    pub durable_enabled: bool,
    /// Maximum entries mirrored to the durable store.
    pub storage_capacity: usize,
    /// Timestamp of the least recently used entry.
    pub oldest_timestamp: Option<u64>,
    /// Timestamp of the most recently used entry.
    pub newest_timestamp: Option<u64>,
}

/// Advisory request limits reported alongside the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimits {
    /// Requests per minute.
    pub per_minute: u32,
    /// Requests per second.
    pub per_second: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            per_minute: 300,
            per_second: 10,
        }
    }
}

/// Requests observed within the current windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInfo {
    /// Requests started within the last minute.
    pub per_minute: u32,
    /// Requests started within the last second.
    pub per_second: u32,
}

/// Snapshot of the advisory rate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    /// Requests currently in flight.
    pub queue_length: u32,
    /// Window counters.
    pub rate_info: RateInfo,
    /// Configured limits; nothing enforces them.
    pub limits: RateLimits,
}
