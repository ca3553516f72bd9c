//! Layout tuning and panel catalogs loaded from TOML.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    grid::GridSettings,
    model::{Point, Size, WindowDescriptor, WindowFlags, WindowId},
    persistence::DEFAULT_SNAPSHOT_KEEP,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid panel catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("panel #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("panel `{0}` is declared more than once")]
    DuplicateId(WindowId),
    #[error("panel `{id}` has an invalid {field}")]
    InvalidNumber { id: WindowId, field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Fixed window decoration added around content by resize-to-content.
pub struct ChromeMetrics {
    pub header_height: f64,
    pub border_width: f64,
    pub padding: f64,
}

impl ChromeMetrics {
    /// Total decoration around content on each axis.
    pub fn overhead(&self) -> Size {
        let frame = self.border_width * 2.0 + self.padding * 2.0;
        Size::new(frame, self.header_height + frame)
    }
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            header_height: 40.0,
            border_width: 2.0,
            padding: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport size the default positions were authored for.
    pub reference_design: Size,
    /// Space kept free along the right and bottom edges when placing defaults.
    pub edge_margin: Size,
    pub default_min_size: Size,
    pub grid: GridSettings,
    pub chrome: ChromeMetrics,
    pub snapshot_keep: usize,
    pub key_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_design: Size::new(1200.0, 800.0),
            edge_margin: Size::new(20.0, 20.0),
            default_min_size: Size::new(200.0, 150.0),
            grid: GridSettings::default(),
            chrome: ChromeMetrics::default(),
            snapshot_keep: DEFAULT_SNAPSHOT_KEEP,
            key_prefix: "panel".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Parses a standalone `LayoutConfig` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    config: LayoutConfig,
    #[serde(default)]
    windows: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    title: String,
    position: Point,
    size: Size,
    #[serde(default = "default_visible")]
    visible: bool,
    min_width: Option<f64>,
    min_height: Option<f64>,
    #[serde(default)]
    flags: WindowFlags,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
/// Layout configuration plus the panels a host registers at startup.
pub struct PanelCatalog {
    pub config: LayoutConfig,
    pub windows: Vec<WindowDescriptor>,
}

impl PanelCatalog {
    /// Parses a catalog with an optional `[config]` table and `[[windows]]` entries.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, empty or duplicate ids, and negative or non-finite
    /// numbers.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(raw)?;
        let mut seen = BTreeSet::new();
        let mut windows = Vec::with_capacity(file.windows.len());

        for (index, entry) in file.windows.into_iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(ConfigError::EmptyId { index });
            }
            let id = WindowId::new(entry.id);
            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateId(id));
            }

            let min_width = entry
                .min_width
                .unwrap_or(file.config.default_min_size.width);
            let min_height = entry
                .min_height
                .unwrap_or(file.config.default_min_size.height);
            let numbers = [
                ("position.x", entry.position.x),
                ("position.y", entry.position.y),
                ("size.width", entry.size.width),
                ("size.height", entry.size.height),
                ("min_width", min_width),
                ("min_height", min_height),
            ];
            if let Some((field, _)) = numbers
                .iter()
                .find(|(_, value)| !value.is_finite() || *value < 0.0)
            {
                return Err(ConfigError::InvalidNumber { id, field: *field });
            }

            let mut descriptor = WindowDescriptor::new(id, entry.title, entry.position, entry.size)
                .with_min_size(min_width, min_height)
                .with_flags(entry.flags);
            descriptor.is_visible = entry.visible;
            windows.push(descriptor);
        }

        Ok(Self {
            config: file.config,
            windows,
        })
    }
}
