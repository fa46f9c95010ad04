//! Basic usage example for the MockupSign SDK.
//!
//! This example demonstrates:
//! - Creating a client with a file-backed signature cache
//! - Requesting a signed mockup URL
//! - Reading the advisory rate counters
//!
//! Run with:
//! ```bash
//! MOCKUP_ACCOUNT_ID=acct_xxx MOCKUP_CLIENT_ID=client_xxx RUST_LOG=mockup_sdk=debug cargo run --example basic
//! ```

use mockup_sdk::store::FileStore;
use mockup_sdk::{
    Alignment, Client, ClientOptions, DesignElement, ImageElement, MockupRequest, ProductSelection,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let account_id = std::env::var("MOCKUP_ACCOUNT_ID")
        .expect("MOCKUP_ACCOUNT_ID environment variable required");
    let client_id = std::env::var("MOCKUP_CLIENT_ID")
        .expect("MOCKUP_CLIENT_ID environment variable required");

    let store = FileStore::open(std::env::temp_dir().join("mockup-sdk-demo"))?;
    let client = Client::with_store(ClientOptions::new(account_id, client_id), Arc::new(store))?;
    println!("Signer: {}", client.endpoints().url_signer_endpoint);

    let request = MockupRequest {
        design: vec![DesignElement::Image(ImageElement {
            name: "front".to_string(),
            width: 1200,
            height: 1600,
            alignment: Alignment::Center,
            image_url: "https://cdn.example.com/artwork.png".to_string(),
            tile: None,
            scale: None,
        })],
        product: ProductSelection {
            product_id: "tshirt".to_string(),
            mockup_id: "front-flat".to_string(),
            variant_id: Some("black-m".to_string()),
            width: Some(800),
        },
    };

    // The second call is answered from the cache.
    for attempt in 1..=2 {
        let mockup = client.mockups().get_mockup_url(&request).await?;
        println!("Attempt {attempt}: {}", mockup.url);
    }

    let info = client.mockups().get_rate_limit_info();
    println!(
        "Rate: {}/{} per second, {}/{} per minute",
        info.rate_info.per_second,
        info.limits.per_second,
        info.rate_info.per_minute,
        info.limits.per_minute
    );
    println!("Cache: {:?}", client.mockups().cache_stats());

    Ok(())
}
