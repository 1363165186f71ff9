//! Application configuration for BlockBuilder.
//!
//! User config lives at `~/.blockbuilder/blockbuilder.toml`.
//! CLI flags override config file values, which override defaults.
//!
//! The heuristic numbers used by the importer (confidence scores, text-length
//! boundaries, column cap) are tuned values, so they live here as named
//! [`Thresholds`] rather than as literals inside the analyzers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlockBuilderError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blockbuilder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blockbuilder";

// ---------------------------------------------------------------------------
// Config structs (matching blockbuilder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Resource limits for a reconstruction call.
    #[serde(default)]
    pub reconstruct: ReconstructSection,

    /// Heuristic scores and boundaries.
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// `[reconstruct]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructSection {
    /// Parsed-node budget; larger documents become one fallback block.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// How deep the content splitter may recurse into sub-sections.
    #[serde(default = "default_max_split_depth")]
    pub max_split_depth: u32,
}

impl Default for ReconstructSection {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            max_split_depth: default_max_split_depth(),
        }
    }
}

fn default_max_nodes() -> usize {
    50_000
}
fn default_max_split_depth() -> u32 {
    8
}

/// `[thresholds]` section.
///
/// Confidence values are on the 0–100 scale used by section classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A classification must score strictly above this to be dispatched directly.
    pub dispatch: u8,
    /// Confidence of an explicit `data-*-type` attribute.
    pub attribute: u8,
    /// Class-name score: `min(class_cap, class_base + class_step * matches)`.
    pub class_base: u8,
    pub class_step: u8,
    pub class_cap: u8,
    pub hero_structure: u8,
    pub gallery_structure: u8,
    pub faq_structure: u8,
    pub cta_structure: u8,
    pub image_text_structure: u8,
    pub features_structure: u8,
    pub benefits_structure: u8,
    /// A CTA's text must be shorter than this many characters.
    pub cta_max_text: usize,
    /// Image+text sections need more than this many characters of text.
    pub image_text_min_text: usize,
    /// Image count at which a section reads as a gallery.
    pub gallery_min_images: usize,
    /// List-like items needed for a features/benefits structure.
    pub list_min_items: usize,
    /// `li` count at which unsectioned content reads as a feature list.
    pub content_list_min_items: usize,
    /// FAQ marker elements needed for an FAQ structure.
    pub faq_min_markers: usize,
    /// Column cap for galleries.
    pub max_columns: u8,
    /// Paragraphs per text block when splitting long runs.
    pub paragraph_run: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dispatch: 50,
            attribute: 90,
            class_base: 30,
            class_step: 10,
            class_cap: 80,
            hero_structure: 75,
            gallery_structure: 70,
            faq_structure: 70,
            cta_structure: 65,
            image_text_structure: 60,
            features_structure: 60,
            benefits_structure: 55,
            cta_max_text: 300,
            image_text_min_text: 50,
            gallery_min_images: 3,
            list_min_items: 3,
            content_list_min_items: 4,
            faq_min_markers: 2,
            max_columns: 4,
            paragraph_run: 3,
        }
    }
}

impl Thresholds {
    /// Class-name confidence for `matches` matching class names.
    pub fn class_confidence(&self, matches: usize) -> u8 {
        let step = u32::from(self.class_step).saturating_mul(matches as u32);
        let score = u32::from(self.class_base).saturating_add(step);
        score.min(u32::from(self.class_cap)) as u8
    }

    /// Reject combinations that would make the classifier misbehave.
    pub fn validate(&self) -> Result<()> {
        let scores = [
            ("attribute", self.attribute),
            ("class_cap", self.class_cap),
            ("hero_structure", self.hero_structure),
            ("gallery_structure", self.gallery_structure),
            ("faq_structure", self.faq_structure),
            ("cta_structure", self.cta_structure),
            ("image_text_structure", self.image_text_structure),
            ("features_structure", self.features_structure),
            ("benefits_structure", self.benefits_structure),
        ];
        if let Some((name, value)) = scores.iter().find(|(_, v)| *v > 100) {
            return Err(BlockBuilderError::config(format!(
                "thresholds.{name} = {value} is outside the 0-100 confidence scale"
            )));
        }
        if self.attribute <= self.dispatch {
            return Err(BlockBuilderError::config(
                "thresholds.attribute must be above thresholds.dispatch",
            ));
        }
        if !(1..=4).contains(&self.max_columns) {
            return Err(BlockBuilderError::config("thresholds.max_columns must be 1..=4"));
        }
        if self.paragraph_run == 0 {
            return Err(BlockBuilderError::config("thresholds.paragraph_run must be at least 1"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reconstruct config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime reconstruction configuration.
#[derive(Debug, Clone)]
pub struct ReconstructConfig {
    /// Parsed-node budget.
    pub max_nodes: usize,
    /// Splitter recursion limit.
    pub max_split_depth: u32,
    /// Heuristic scores and boundaries.
    pub thresholds: Thresholds,
}

impl From<&AppConfig> for ReconstructConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_nodes: config.reconstruct.max_nodes,
            max_split_depth: config.reconstruct.max_split_depth,
            thresholds: config.thresholds.clone(),
        }
    }
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blockbuilder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlockBuilderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blockbuilder/blockbuilder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlockBuilderError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BlockBuilderError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.thresholds.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BlockBuilderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlockBuilderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlockBuilderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_nodes"));
        assert!(toml_str.contains("cta_max_text"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.reconstruct.max_split_depth, 8);
        assert_eq!(parsed.thresholds, Thresholds::default());
    }

    #[test]
    fn partial_thresholds_keep_defaults() {
        let toml_str = r#"
[thresholds]
cta_max_text = 200
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.thresholds.cta_max_text, 200);
        assert_eq!(config.thresholds.dispatch, 50);
        assert_eq!(config.reconstruct.max_nodes, 50_000);
    }

    #[test]
    fn class_confidence_is_capped() {
        let t = Thresholds::default();
        assert_eq!(t.class_confidence(1), 40);
        assert_eq!(t.class_confidence(3), 60);
        assert_eq!(t.class_confidence(5), 80);
        assert_eq!(t.class_confidence(50), 80);
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let mut t = Thresholds::default();
        assert!(t.validate().is_ok());

        t.attribute = 40;
        assert!(t.validate().is_err());

        let mut t = Thresholds::default();
        t.max_columns = 6;
        assert!(t.validate().is_err());

        let mut t = Thresholds::default();
        t.hero_structure = 120;
        assert!(t.validate().unwrap_err().to_string().contains("hero_structure"));
    }

    #[test]
    fn reconstruct_config_from_app_config() {
        let app = AppConfig::default();
        let config = ReconstructConfig::from(&app);
        assert_eq!(config.max_nodes, 50_000);
        assert_eq!(config.max_split_depth, 8);
        assert_eq!(config.thresholds.attribute, 90);
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("blockbuilder-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("blockbuilder.toml");
        std::fs::write(&path, "[reconstruct]\nmax_nodes = 10\n").expect("write config");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.reconstruct.max_nodes, 10);

        std::fs::write(&path, "[thresholds]\nattribute = 10\n").expect("write config");
        assert!(load_config_from(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
