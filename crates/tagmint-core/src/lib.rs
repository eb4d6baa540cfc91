// SPDX-License-Identifier: AGPL-3.0
// Tagmint Core - Shared logic for all frontends
//
// This crate provides:
// - Item, StoreConfig and AppError types
// - CatalogStore for the persisted item catalog and its uid counter
// - QrArtifactStore for per-item QR label images
//
// Frontend-specific code lives in separate crates.

pub mod artifact;
pub mod catalog;
pub mod types;

// Re-export commonly used items
pub use artifact::QrArtifactStore;
pub use catalog::CatalogStore;
pub use types::{parse_price, AppError, Item, StoreConfig, DEFAULT_UID_SEED};
