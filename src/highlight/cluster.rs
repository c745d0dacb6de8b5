use std::collections::HashMap;

use crate::catalog::TagCatalog;
use crate::color::HexColor;
use crate::dom::{Document, NodeId};

use super::HighlightError;

/// All tag elements sharing one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub label: String,
    pub category: String,
    pub color: HexColor,
    /// Document order.
    pub elements: Vec<NodeId>,
}

/// Label → cluster mapping, iterated in first-seen label order.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndex {
    clusters: Vec<Cluster>,
    by_label: HashMap<String, usize>,
}

impl ClusterIndex {
    /// Scan `document` for elements carrying `tag_class` and group them by
    /// label. Every label must be known to `catalog`.
    pub fn build(
        document: &Document,
        catalog: &TagCatalog,
        tag_class: &str,
    ) -> Result<Self, HighlightError> {
        let mut index = Self::default();
        for node in document.elements_with_class(tag_class) {
            let label = document.text_content(node);
            if let Some(&idx) = index.by_label.get(&label) {
                index.clusters[idx].elements.push(node);
                continue;
            }
            let found = catalog.lookup(&label)?;
            let cluster = Cluster {
                label: label.clone(),
                category: found.category.to_string(),
                color: found.color,
                elements: vec![node],
            };
            index.by_label.insert(label, index.clusters.len());
            index.clusters.push(cluster);
        }
        Ok(index)
    }

    pub fn get(&self, label: &str) -> Option<&Cluster> {
        self.by_label.get(label).map(|&idx| &self.clusters[idx])
    }

    /// Cluster containing `node`, if it is a tag.
    pub fn cluster_of(&self, node: NodeId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.elements.contains(&node))
    }

    /// Every element of every cluster for `labels`, paired with its color.
    /// Labels without elements on the page contribute nothing.
    pub fn members<'a, I>(&self, labels: I) -> Vec<(NodeId, HexColor)>
    where
        I: IntoIterator<Item = &'a String>,
    {
        labels
            .into_iter()
            .filter_map(|label| self.get(label))
            .flat_map(|c| c.elements.iter().map(move |&e| (e, c.color)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::dom::parser::parse_html;

    fn catalog() -> TagCatalog {
        TagCatalog::new(vec![
            Category {
                name: "Languages".into(),
                color: HexColor::new(0, 255, 0),
                tags: vec!["Go".into(), "Rust".into()],
            },
            Category {
                name: "DevOps".into(),
                color: HexColor::new(255, 0, 0),
                tags: vec!["Docker".into()],
            },
        ])
        .unwrap()
    }

    const PAGE: &str = r#"<html><body>
        <section><span class="tag">Rust</span><span class="tag">Go</span></section>
        <section><span class="tag">Docker</span><span class="tag"> Go </span></section>
    </body></html>"#;

    #[test]
    fn groups_by_label_in_first_seen_order() {
        let doc = parse_html(PAGE, "");
        let index = ClusterIndex::build(&doc, &catalog(), "tag").unwrap();
        let labels: Vec<&str> = index.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Rust", "Go", "Docker"]);
        assert_eq!(index.get("Go").unwrap().elements.len(), 2);
    }

    #[test]
    fn clusters_take_catalog_color_and_category() {
        let doc = parse_html(PAGE, "");
        let index = ClusterIndex::build(&doc, &catalog(), "tag").unwrap();
        let docker = index.get("Docker").unwrap();
        assert_eq!(docker.color, HexColor::new(255, 0, 0));
        assert_eq!(docker.category, "DevOps");
    }

    #[test]
    fn rebuild_is_stable() {
        let doc = parse_html(PAGE, "");
        let a = ClusterIndex::build(&doc, &catalog(), "tag").unwrap();
        let b = ClusterIndex::build(&doc, &catalog(), "tag").unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn unknown_label_is_an_error() {
        let doc = parse_html(r#"<html><body><span class="tag">COBOL</span></body></html>"#, "");
        match ClusterIndex::build(&doc, &catalog(), "tag") {
            Err(HighlightError::UnknownTag { label }) => assert_eq!(label, "COBOL"),
            other => panic!("expected UnknownTag, got {:?}", other),
        }
    }

    #[test]
    fn members_skip_absent_labels() {
        let doc = parse_html(PAGE, "");
        let index = ClusterIndex::build(&doc, &catalog(), "tag").unwrap();
        let labels = vec!["Rust".to_string(), "Python".to_string()];
        let members = index.members(&labels);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].1, HexColor::new(0, 255, 0));
    }
}
