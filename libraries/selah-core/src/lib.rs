//! Selah Core
//!
//! Platform-agnostic content types, catalog lookup and asset resolution for
//! Selah, a devotional teachings player.
//!
//! This crate provides the read-only side of the application that the
//! playback core depends on:
//! - **Domain Types**: `Quote`, `Category`, `AssetHandle`
//! - **Content Catalog**: `ContentCatalog` trait and the `StaticCatalog` implementation
//! - **Asset Resolution**: `AssetResolver` trait with directory and map backed resolvers
//! - **Asset Coverage**: `AssetStats` over a catalog and a resolver
//! - **Platform Capability**: `Capability`, resolved once at startup and injected
//! - **Error Handling**: unified `SelahError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use selah_core::{ContentCatalog, Quote, StaticCatalog};
//!
//! let quote = Quote::new("1", "Ask, and it will be given to you.", "Prayer & Faith");
//! let catalog = StaticCatalog::new(vec![quote], Vec::new());
//!
//! assert!(catalog.quote_by_id("1").is_some());
//! assert_eq!(catalog.quotes_by_category("Prayer & Faith").len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assets;
pub mod capability;
pub mod catalog;
pub mod error;
pub mod stats;
pub mod types;

pub use assets::{AssetResolver, DirectoryAssets, MappedAssets};
pub use capability::Capability;
pub use catalog::{ContentCatalog, StaticCatalog};
pub use error::{Result, SelahError};
pub use stats::{quotes_with_assets, AssetStats};
pub use types::{AssetHandle, Category, Quote, QuoteId};
