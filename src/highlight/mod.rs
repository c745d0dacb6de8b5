//! Tag cross-highlighting.
//!
//! Tags sharing a label form a cluster; hovering any instance previews the
//! whole cluster, clicking toggles the whole cluster in the shared
//! activation set. Category buttons fan out to every cluster of their
//! category and mirror whether the category is fully active.
//!
//! Clusters are re-derived from the document on every interaction, which is
//! O(n) in the number of tags. Pages carry tens of tags, so nothing is cached.

pub mod activation;
pub mod buttons;
pub mod cluster;
pub mod engine;
pub mod style;
pub mod tags;

use std::fmt;

use crate::catalog::{CatalogError, TagCatalog, DEFAULT_DARK_TONE};
use crate::color::HexColor;
use crate::dom::{Document, NodeId};

use activation::ActivationState;
use buttons::CategoryButton;
use cluster::ClusterIndex;

/// Class names and tones the highlighter works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSettings {
    pub tag_class: String,
    pub active_tag_class: String,
    /// Container that receives the generated category buttons.
    pub host_class: String,
    pub button_class: String,
    pub active_button_class: String,
    pub dark_tone: HexColor,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            tag_class: "tag".into(),
            active_tag_class: "tag--active".into(),
            host_class: "highlight-buttons".into(),
            button_class: "highlight-tags".into(),
            active_button_class: "highlight-tags--active".into(),
            dark_tone: DEFAULT_DARK_TONE,
        }
    }
}

impl HighlightSettings {
    /// Defaults with any overrides the catalog file carries.
    pub fn from_catalog(catalog: &TagCatalog) -> Self {
        let mut settings = Self::default();
        let overrides = catalog.overrides();
        if let Some(tone) = overrides.dark_tone {
            settings.dark_tone = tone;
        }
        if let Some(ref class) = overrides.tag_class {
            settings.tag_class = class.clone();
        }
        if let Some(ref class) = overrides.host_class {
            settings.host_class = class.clone();
        }
        settings
    }
}

#[derive(Debug)]
pub enum HighlightError {
    /// A tag on the page whose label no category lists.
    UnknownTag { label: String },
    /// A bound element that no longer resolves to a cluster.
    Detached { node: NodeId },
    Catalog(CatalogError),
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::UnknownTag { label } => write!(
                f,
                "page has tag '{}' but no catalog category lists it",
                label
            ),
            HighlightError::Detached { node } => {
                write!(f, "element #{} is no longer a tag", node.index())
            }
            HighlightError::Catalog(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HighlightError {}

impl From<CatalogError> for HighlightError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownTag { label } => HighlightError::UnknownTag { label },
            other => HighlightError::Catalog(other),
        }
    }
}

/// Everything a handler may read or write while processing one event.
pub struct HighlightContext<'a> {
    pub document: &'a mut Document,
    pub state: &'a mut ActivationState,
    pub catalog: &'a TagCatalog,
    pub settings: &'a HighlightSettings,
    pub buttons: &'a [CategoryButton],
}

impl HighlightContext<'_> {
    /// Fresh cluster index for the current document.
    pub fn clusters(&self) -> Result<ClusterIndex, HighlightError> {
        ClusterIndex::build(self.document, self.catalog, &self.settings.tag_class)
    }
}

/// Direction of a click-driven change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Activated,
    Deactivated,
}
