//! Category catalog: which skill tags belong together and which color they
//! share.
//!
//! The catalog is static deployment configuration. It is loaded once from a
//! TOML file (or the built-in default) and never mutated afterwards.
//!
//! ```toml
//! dark_tone = "#111111"
//!
//! [[category]]
//! name = "Languages"
//! color = "#00ff00"
//! tags = ["Go", "Rust"]
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::color::HexColor;

/// Painted on tags whose label has no category.
pub const FALLBACK_COLOR: HexColor = HexColor::new(0x80, 0x80, 0x80);

/// Tone that highlight colors are blended toward.
pub const DEFAULT_DARK_TONE: HexColor = HexColor::new(0x11, 0x11, 0x11);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: HexColor,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of a label lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRef<'a> {
    pub category: &'a str,
    pub color: HexColor,
}

#[derive(Debug)]
pub enum CatalogError {
    /// Tag text on the page that no category lists.
    UnknownTag { label: String },
    /// A label listed by two categories.
    DuplicateTag {
        label: String,
        first: String,
        second: String,
    },
    DuplicateCategory { name: String },
    EmptyCategoryName,
    /// TOML syntax or schema error, including malformed colors.
    Parse { source: String, message: String },
    Io { path: String, message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownTag { label } => {
                write!(f, "tag '{}' is not listed in any catalog category", label)
            }
            CatalogError::DuplicateTag { label, first, second } => write!(
                f,
                "tag '{}' is listed in both '{}' and '{}'",
                label, first, second
            ),
            CatalogError::DuplicateCategory { name } => {
                write!(f, "category '{}' is defined more than once", name)
            }
            CatalogError::EmptyCategoryName => write!(f, "category with an empty name"),
            CatalogError::Parse { source, message } => {
                write!(f, "invalid catalog {}: {}", source, message)
            }
            CatalogError::Io { path, message } => {
                write!(f, "cannot read catalog {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    dark_tone: Option<HexColor>,
    #[serde(default)]
    tag_class: Option<String>,
    #[serde(default)]
    host_class: Option<String>,
    #[serde(default, rename = "category")]
    categories: Vec<Category>,
}

/// Page-level overrides carried by a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogOverrides {
    pub dark_tone: Option<HexColor>,
    pub tag_class: Option<String>,
    pub host_class: Option<String>,
}

/// Immutable label → category mapping.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    categories: Vec<Category>,
    by_label: HashMap<String, usize>,
    overrides: CatalogOverrides,
}

impl TagCatalog {
    /// Build a catalog, rejecting duplicate labels and category names.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut by_label: HashMap<String, usize> = HashMap::new();
        let mut names = HashSet::new();
        for (idx, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(CatalogError::EmptyCategoryName);
            }
            if !names.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory {
                    name: category.name.clone(),
                });
            }
            for label in &category.tags {
                if let Some(&prev) = by_label.get(label) {
                    return Err(CatalogError::DuplicateTag {
                        label: label.clone(),
                        first: categories[prev].name.clone(),
                        second: category.name.clone(),
                    });
                }
                by_label.insert(label.clone(), idx);
            }
        }
        Ok(Self {
            categories,
            by_label,
            overrides: CatalogOverrides::default(),
        })
    }

    /// Parse a catalog from TOML text. `source` names it in errors.
    pub fn from_toml_str(text: &str, source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text).map_err(|e| CatalogError::Parse {
            source: source.to_string(),
            message: e.to_string(),
        })?;
        let mut catalog = Self::new(file.categories)?;
        catalog.overrides = CatalogOverrides {
            dark_tone: file.dark_tone,
            tag_class: file.tag_class,
            host_class: file.host_class,
        };
        log::info!(
            "Loaded catalog {}: {} categories, {} tags",
            source,
            catalog.categories.len(),
            catalog.by_label.len()
        );
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    pub fn lookup(&self, label: &str) -> Result<CategoryRef<'_>, CatalogError> {
        self.by_label
            .get(label)
            .map(|&idx| {
                let category = &self.categories[idx];
                CategoryRef {
                    category: &category.name,
                    color: category.color,
                }
            })
            .ok_or_else(|| CatalogError::UnknownTag {
                label: label.to_string(),
            })
    }

    /// Color for `label`, or [`FALLBACK_COLOR`] with an error logged.
    pub fn color_or_fallback(&self, label: &str) -> HexColor {
        match self.lookup(label) {
            Ok(found) => found.color,
            Err(e) => {
                log::error!("{}; painting it {}", e, FALLBACK_COLOR);
                FALLBACK_COLOR
            }
        }
    }

    /// Categories in configured order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn overrides(&self) -> &CatalogOverrides {
        &self.overrides
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for TagCatalog {
    /// Catalog matching the stock portfolio page.
    fn default() -> Self {
        let cat = |name: &str, color: HexColor, tags: &[&str]| Category {
            name: name.to_string(),
            color,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        let categories = vec![
            cat(
                "Languages",
                HexColor::new(0x00, 0xff, 0x00),
                &["JavaScript", "TypeScript", "Java", "Python", "Go", "Rust", "SQL"],
            ),
            cat(
                "Frontend",
                HexColor::new(0x20, 0xc0, 0xff),
                &["React", "Redux", "Angular", "HTML", "CSS", "Sass"],
            ),
            cat(
                "Backend",
                HexColor::new(0xff, 0x3d, 0x00),
                &["Node.js", "Spring", "GraphQL", "REST", "PostgreSQL", "MongoDB"],
            ),
            cat(
                "DevOps",
                HexColor::new(0xd6, 0x02, 0xee),
                &["Docker", "Kubernetes", "AWS", "CI/CD", "Terraform", "Linux"],
            ),
            cat(
                "Tools",
                HexColor::new(0xff, 0xc1, 0x07),
                &["Git", "Jira", "Figma", "Webpack"],
            ),
        ];
        // Literal table above is duplicate-free.
        match Self::new(categories) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in catalog is invalid: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
dark_tone = "#222222"

[[category]]
name = "Languages"
color = "#00ff00"
tags = ["Go", "Rust"]

[[category]]
name = "DevOps"
color = "#D602EE"
tags = ["Docker"]
"##;

    #[test]
    fn parses_ordered_categories() {
        let catalog = TagCatalog::from_toml_str(SAMPLE, "sample").unwrap();
        let names: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Languages", "DevOps"]);
        assert_eq!(catalog.overrides().dark_tone, Some(HexColor::new(0x22, 0x22, 0x22)));
    }

    #[test]
    fn lookup_returns_category_and_color() {
        let catalog = TagCatalog::from_toml_str(SAMPLE, "sample").unwrap();
        let found = catalog.lookup("Docker").unwrap();
        assert_eq!(found.category, "DevOps");
        assert_eq!(found.color, HexColor::new(0xd6, 0x02, 0xee));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = TagCatalog::from_toml_str(SAMPLE, "sample").unwrap();
        match catalog.lookup("rust") {
            Err(CatalogError::UnknownTag { label }) => assert_eq!(label, "rust"),
            other => panic!("expected UnknownTag, got {:?}", other),
        }
    }

    #[test]
    fn fallback_color_for_unknown() {
        let catalog = TagCatalog::from_toml_str(SAMPLE, "sample").unwrap();
        assert_eq!(catalog.color_or_fallback("COBOL"), FALLBACK_COLOR);
        assert_eq!(catalog.color_or_fallback("Go"), HexColor::new(0, 255, 0));
    }

    #[test]
    fn rejects_malformed_color() {
        let text = "[[category]]\nname = \"Bad\"\ncolor = \"#12345\"\ntags = []\n";
        let err = TagCatalog::from_toml_str(text, "bad.toml").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.toml"), "{}", msg);
        assert!(msg.contains("#12345"), "{}", msg);
    }

    #[test]
    fn rejects_label_in_two_categories() {
        let text = r##"
[[category]]
name = "A"
color = "#000000"
tags = ["Go"]

[[category]]
name = "B"
color = "#ffffff"
tags = ["Go"]
"##;
        match TagCatalog::from_toml_str(text, "dup") {
            Err(CatalogError::DuplicateTag { label, first, second }) => {
                assert_eq!((label.as_str(), first.as_str(), second.as_str()), ("Go", "A", "B"));
            }
            other => panic!("expected DuplicateTag, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_category_names() {
        let c = Category {
            name: "A".into(),
            color: HexColor::BLACK,
            tags: vec![],
        };
        assert!(matches!(
            TagCatalog::new(vec![c.clone(), c]),
            Err(CatalogError::DuplicateCategory { .. })
        ));
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = TagCatalog::default();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.lookup("Rust").unwrap().category, "Languages");
    }
}
