//! Shared types, error model, and configuration for BlockBuilder.
//!
//! This crate is the foundation depended on by all other BlockBuilder crates.
//! It provides:
//! - [`BlockBuilderError`]: the unified error type
//! - The block model ([`Block`], [`BlockContent`], [`BlockType`], [`BlockId`])
//! - The block factory ([`create_block`])
//! - Configuration ([`AppConfig`], [`ReconstructConfig`], [`Thresholds`], config loading)

pub mod config;
pub mod error;
pub mod factory;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ReconstructConfig, ReconstructSection, Thresholds, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{BlockBuilderError, Result};
pub use factory::{DEFAULT_BUTTON_URL, create_block, text_block};
pub use types::{
    Block, BlockContent, BlockId, BlockStyle, BlockType, FaqItem, FeatureItem, GalleryImage,
    MAX_COLUMNS, MIN_COLUMNS, SpecItem,
};
