//! Utility modules supporting downloads.
//!
//! - [`HttpClient`]: shared reqwest client, implements [`Fetcher`](crate::download::Fetcher)
//!
//! ```rust,no_run
//! use shelf_fetch::download::Fetcher;
//! use shelf_fetch::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let bytes = client.fetch("https://example.com/book.epub", false).await?;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpClient;
