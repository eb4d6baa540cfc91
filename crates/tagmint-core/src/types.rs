// SPDX-License-Identifier: AGPL-3.0
// Tagmint Core - Type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// First uid handed out by a brand-new catalog
pub const DEFAULT_UID_SEED: u64 = 1_001_001;

/// One registered item. The uid is a decimal string assigned sequentially by
/// the catalog store and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uid: String,
    pub name: String,
    pub price: f64,
}

/// Where the catalog and its QR artifacts live on disk
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backing file holding the full catalog as a JSON array
    pub data_file: PathBuf,
    /// Directory QR label images are written into
    pub qr_output_dir: PathBuf,
    /// First uid assigned when the catalog is empty
    pub uid_seed: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = directories::ProjectDirs::from("com", "tagmint", "tagmint")
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_file: base.join("items.json"),
            qr_output_dir: base.join("qrcodes"),
            uid_seed: DEFAULT_UID_SEED,
        }
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Artifact I/O error: {0}")]
    ArtifactIo(String),
}

/// Parse user-entered price text.
///
/// Rejects empty input, anything that is not a number, and non-finite or
/// negative values.
pub fn parse_price(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingField("price"));
    }

    let price: f64 = trimmed
        .parse()
        .map_err(|_| AppError::InvalidPrice(trimmed.to_string()))?;

    if !price.is_finite() || price < 0.0 {
        return Err(AppError::InvalidPrice(trimmed.to_string()));
    }

    Ok(price)
}
