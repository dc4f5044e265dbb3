// src/document/mod.rs

//! Provisioning and layer catalog documents
//!
//! A provisioning document describes the feature-pack dependencies of an
//! installation, its universes, config customizations and options. A layer
//! catalog lists config layer definitions for [`LayerGraph`].
//!
//! Both are read from TOML or JSON. The format follows the file extension,
//! with TOML as the fallback.
//!
//! ```toml
//! [options]
//! jvm = "21"
//!
//! [universes]
//! default = "maven(org.example:universe)"
//!
//! [[dependencies]]
//! location = "server:1.x#1.0.0"
//! origin = "server"
//! exclude-packages = ["docs"]
//! ```

mod convert;
mod schema;

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::layers::LayerGraph;
use crate::provisioning::ProvisioningConfig;

pub use schema::{
    ConfigIdDocument, ConfigModelDocument, CustomizationsDocument, DependencyDocument,
    ExcludedFeatureDocument, ExcludedModelDocument, FeatureDepDocument, FeatureDocument,
    GroupBodyDocument, GroupDocument, IncludedFeatureDocument, ItemDocument, LayerCatalogDocument,
    LayerDepDocument, LayerDocument, ProvisioningDocument, SelectionDocument, UniversesDocument,
};

/// Errors reading or writing documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to process JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    Invalid(#[from] crate::Error),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Toml,
    Json,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(content: &str, format: Format) -> DocumentResult<T> {
    Ok(match format {
        Format::Toml => toml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    })
}

/// Parse a provisioning config from a file
pub fn parse_provisioning_file(path: &Path) -> DocumentResult<ProvisioningConfig> {
    debug!("reading provisioning document {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_provisioning_str(&content, Format::from_path(path))
}

/// Parse a provisioning config from a string
pub fn parse_provisioning_str(content: &str, format: Format) -> DocumentResult<ProvisioningConfig> {
    let document: ProvisioningDocument = decode(content, format)?;
    Ok(document.into_config()?)
}

pub fn provisioning_to_toml(config: &ProvisioningConfig) -> DocumentResult<String> {
    Ok(toml::to_string_pretty(&ProvisioningDocument::from_config(config))?)
}

pub fn provisioning_to_json(config: &ProvisioningConfig) -> DocumentResult<String> {
    Ok(serde_json::to_string_pretty(&ProvisioningDocument::from_config(config))?)
}

/// Parse a layer catalog from a file into a layer graph
pub fn parse_layer_catalog_file(path: &Path) -> DocumentResult<LayerGraph> {
    debug!("reading layer catalog {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_layer_catalog_str(&content, Format::from_path(path))
}

pub fn parse_layer_catalog_str(content: &str, format: Format) -> DocumentResult<LayerGraph> {
    let document: LayerCatalogDocument = decode(content, format)?;
    Ok(document.into_graph()?)
}
