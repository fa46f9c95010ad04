//! # MockupSign Rust SDK
//!
//! Rust SDK for building signed mockup image URLs.
//!
//! A mockup URL encodes a design (images and color fills placed on a
//! product) plus a product selection. The URL must be signed by the
//! MockupSign signer before the rendering service accepts it. This SDK builds
//! the canonical URL, signs it, and caches signatures per account so repeated
//! requests cost no network round trip.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mockup_sdk::{Client, ClientOptions};
//! use mockup_sdk::types::{
//!     Alignment, DesignElement, ImageElement, MockupRequest, ProductSelection,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientOptions::new("acct_123", "client_abc"))?;
//!
//!     let mockup = client.mockups().get_mockup_url(&MockupRequest {
//!         design: vec![DesignElement::Image(ImageElement {
//!             name: "front".to_string(),
//!             width: 1200,
//!             height: 1600,
//!             alignment: Alignment::Center,
//!             image_url: "https://cdn.example.com/artwork.png".to_string(),
//!             tile: None,
//!             scale: None,
//!         })],
//!         product: ProductSelection {
//!             product_id: "tshirt".to_string(),
//!             mockup_id: "front-flat".to_string(),
//!             variant_id: Some("black-m".to_string()),
//!             width: Some(800),
//!         },
//!     }).await?;
//!
//!     println!("Mockup: {}", mockup.url);
//!     Ok(())
//! }
//! ```
//!
//! ## Persistent Cache
//!
//! Signatures can be mirrored to a [`store::DurableStore`] so they survive
//! restarts. If the store fails at any point the cache quietly continues in
//! memory.
//!
//! ```rust,no_run
//! use mockup_sdk::{Client, ClientOptions, store::FileStore};
//! use std::sync::Arc;
//!
//! let store = FileStore::open("/var/cache/mockups").expect("cache directory");
//! let client = Client::with_store(ClientOptions::new("acct_123", "client_abc"), Arc::new(store))?;
//! assert!(client.mockups().cache_stats().durable_enabled);
//! # Ok::<(), mockup_sdk::MockupError>(())
//! ```
//!
//! ## Rate Counters
//!
//! `client.mockups().get_rate_limit_info()` reports in-flight requests and
//! how many requests started in the last second and minute. The counters are
//! advisory; nothing is throttled.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, MockupError>`:
//!
//! ```rust,no_run
//! use mockup_sdk::{Client, ClientOptions, MockupError};
//! # use mockup_sdk::types::MockupRequest;
//! # async fn run(request: MockupRequest) {
//! let client = Client::new(ClientOptions::new("acct_123", "client_abc")).unwrap();
//!
//! match client.mockups().get_mockup_url(&request).await {
//!     Ok(mockup) => println!("{}", mockup.url),
//!     Err(MockupError::Validation(reason)) => println!("Bad request: {}", reason),
//!     Err(MockupError::Signing { status, .. }) => println!("Signer refused: {:?}", status),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod mockups;
pub mod rate;
pub mod store;
pub mod types;
pub mod url_builder;

// Re-export main types at the crate root
pub use client::Client;
pub use config::{ClientOptions, Endpoints, Environment};
pub use error::{MockupError, Result};

pub use types::{
    Alignment, CacheStats, ColorElement, DesignElement, ImageElement, MockupRequest, MockupUrl,
    ProductSelection, RateLimitInfo,
};
