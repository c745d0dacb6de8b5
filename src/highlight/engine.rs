use std::collections::HashMap;

use crate::catalog::TagCatalog;
use crate::color::HexColor;
use crate::dom::{Document, NodeId};

use super::activation::ActivationState;
use super::buttons::{create_buttons, fully_active, CategoryButton};
use super::cluster::ClusterIndex;
use super::tags::TagBinding;
use super::{HighlightContext, HighlightError, HighlightSettings, Toggle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// What a dispatched event hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ignored,
    Tag { label: String, toggle: Option<Toggle> },
    Button { category: String, toggle: Option<Toggle> },
}

/// Per-label line of a [`CategoryReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelReport {
    pub label: String,
    pub elements: usize,
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    pub color: HexColor,
    pub labels: Vec<LabelReport>,
    pub fully_active: bool,
    /// Whether the button element shows the active class.
    pub button_active: Option<bool>,
}

/// The wired tag highlighter for one document.
pub struct HighlightEngine {
    catalog: TagCatalog,
    settings: HighlightSettings,
    state: ActivationState,
    tags: HashMap<NodeId, TagBinding>,
    buttons: Vec<CategoryButton>,
}

impl HighlightEngine {
    /// Wire the highlighter onto `document` with settings from the catalog.
    pub fn attach(document: &mut Document, catalog: TagCatalog) -> Result<Self, HighlightError> {
        let settings = HighlightSettings::from_catalog(&catalog);
        Self::attach_with(document, catalog, settings)
    }

    /// Validate the page against the catalog, create the category buttons
    /// and bind every tag. Nothing is touched if a tag has no category.
    pub fn attach_with(
        document: &mut Document,
        catalog: TagCatalog,
        settings: HighlightSettings,
    ) -> Result<Self, HighlightError> {
        let index = ClusterIndex::build(document, &catalog, &settings.tag_class)?;

        let mut tags = HashMap::new();
        for cluster in index.iter() {
            for &element in &cluster.elements {
                tags.insert(element, TagBinding::new(element, cluster.label.clone()));
            }
        }
        let buttons = create_buttons(document, &catalog, &settings);

        log::info!(
            "Tag highlighting wired: {} tags in {} clusters, {} category buttons",
            tags.len(),
            index.len(),
            buttons.len()
        );

        let mut engine = Self {
            catalog,
            settings,
            state: ActivationState::new(),
            tags,
            buttons,
        };
        engine.sync_all(document)?;
        Ok(engine)
    }

    fn context<'a>(&'a mut self, document: &'a mut Document) -> HighlightContext<'a> {
        HighlightContext {
            document,
            state: &mut self.state,
            catalog: &self.catalog,
            settings: &self.settings,
            buttons: &self.buttons,
        }
    }

    /// Closest bound ancestor-or-self of `target`.
    fn resolve(&self, document: &Document, target: NodeId) -> Option<NodeId> {
        let mut cur = Some(target);
        while let Some(node) = cur {
            if self.tags.contains_key(&node) || self.button_at(node).is_some() {
                return Some(node);
            }
            cur = document.get(node).and_then(|n| n.parent);
        }
        None
    }

    fn button_at(&self, node: NodeId) -> Option<&CategoryButton> {
        self.buttons.iter().find(|b| b.element == node)
    }

    /// Route a pointer event to the tag or button under `target`.
    pub fn dispatch(
        &mut self,
        document: &mut Document,
        target: NodeId,
        event: PointerEvent,
    ) -> Result<Dispatch, HighlightError> {
        let node = match self.resolve(document, target) {
            Some(node) => node,
            None => return Ok(Dispatch::Ignored),
        };

        if let Some(binding) = self.tags.get(&node).cloned() {
            let mut ctx = self.context(document);
            let toggle = match event {
                PointerEvent::Enter => binding.pointer_enter(&mut ctx).map(|_| None),
                PointerEvent::Leave => binding.pointer_leave(&mut ctx).map(|_| None),
                PointerEvent::Click => binding.click(&mut ctx).map(Some),
            }?;
            return Ok(Dispatch::Tag {
                label: binding.label,
                toggle,
            });
        }

        match self.button_at(node).cloned() {
            Some(button) => {
                let mut ctx = self.context(document);
                let toggle = match event {
                    PointerEvent::Enter => button.pointer_enter(&mut ctx).map(|_| None),
                    PointerEvent::Leave => button.pointer_leave(&mut ctx).map(|_| None),
                    PointerEvent::Click => button.click(&mut ctx).map(Some),
                }?;
                Ok(Dispatch::Button {
                    category: button.category,
                    toggle,
                })
            }
            None => Ok(Dispatch::Ignored),
        }
    }

    /// Click the first element labelled `label`. `None` if the page has no
    /// such tag.
    pub fn click_label(
        &mut self,
        document: &mut Document,
        label: &str,
    ) -> Result<Option<Toggle>, HighlightError> {
        let index = ClusterIndex::build(document, &self.catalog, &self.settings.tag_class)?;
        let first = match index.get(label).and_then(|c| c.elements.first()) {
            Some(&first) => first,
            None => return Ok(None),
        };
        match self.dispatch(document, first, PointerEvent::Click)? {
            Dispatch::Tag { toggle, .. } => Ok(toggle),
            _ => Ok(None),
        }
    }

    /// Click the button of `category`. `None` if no such button exists.
    pub fn click_category(
        &mut self,
        document: &mut Document,
        category: &str,
    ) -> Result<Option<Toggle>, HighlightError> {
        let element = match self.button_for(category) {
            Some(button) => button.element,
            None => return Ok(None),
        };
        match self.dispatch(document, element, PointerEvent::Click)? {
            Dispatch::Button { toggle, .. } => Ok(toggle),
            _ => Ok(None),
        }
    }

    /// Recompute every button's active class.
    pub fn sync_all(&mut self, document: &mut Document) -> Result<(), HighlightError> {
        let buttons = self.buttons.clone();
        let mut ctx = self.context(document);
        let index = ctx.clusters()?;
        for button in &buttons {
            button.sync(&mut ctx, &index);
        }
        Ok(())
    }

    pub fn report(&self, document: &Document) -> Result<Vec<CategoryReport>, HighlightError> {
        let index = ClusterIndex::build(document, &self.catalog, &self.settings.tag_class)?;
        let reports = self
            .catalog
            .categories()
            .iter()
            .map(|category| {
                let labels = category
                    .tags
                    .iter()
                    .map(|label| {
                        let elements = index.get(label).map(|c| c.elements.as_slice()).unwrap_or(&[]);
                        LabelReport {
                            label: label.clone(),
                            elements: elements.len(),
                            active: elements.iter().filter(|&&e| self.state.is_active(e)).count(),
                        }
                    })
                    .collect();
                let members = index.members(&category.tags);
                CategoryReport {
                    name: category.name.clone(),
                    color: category.color,
                    labels,
                    fully_active: fully_active(&self.state, &members),
                    button_active: self.button_for(&category.name).map(|b| {
                        document.has_class(b.element, &self.settings.active_button_class)
                    }),
                }
            })
            .collect();
        Ok(reports)
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.tags.contains_key(&node) || self.button_at(node).is_some()
    }

    pub fn button_for(&self, category: &str) -> Option<&CategoryButton> {
        self.buttons.iter().find(|b| b.category == category)
    }

    pub fn buttons(&self) -> &[CategoryButton] {
        &self.buttons
    }

    pub fn state(&self) -> &ActivationState {
        &self.state
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::dom::parser::parse_html;
    use crate::highlight::tags::set_members;

    const PAGE: &str = r#"<html><body>
        <div class="highlight-buttons"></div>
        <section id="skills">
            <span class="tag">Go</span>
            <span class="tag">Rust</span>
            <span class="tag">Docker</span>
        </section>
        <section id="projects">
            <span class="tag" style="margin: 0 2px">Go</span>
        </section>
    </body></html>"#;

    fn catalog() -> TagCatalog {
        TagCatalog::new(vec![
            Category {
                name: "Languages".into(),
                color: HexColor::new(0x00, 0xff, 0x00),
                tags: vec!["Go".into(), "Rust".into()],
            },
            Category {
                name: "DevOps".into(),
                color: HexColor::new(0xd6, 0x02, 0xee),
                tags: vec!["Docker".into(), "Kubernetes".into()],
            },
            Category {
                name: "Databases".into(),
                color: HexColor::new(0xff, 0xc1, 0x07),
                tags: vec!["PostgreSQL".into()],
            },
        ])
        .unwrap()
    }

    fn setup() -> (Document, HighlightEngine) {
        let mut doc = parse_html(PAGE, "");
        let engine = HighlightEngine::attach(&mut doc, catalog()).unwrap();
        (doc, engine)
    }

    fn tags_labelled(doc: &Document, label: &str) -> Vec<NodeId> {
        doc.elements_with_class("tag")
            .into_iter()
            .filter(|&n| doc.text_content(n) == label)
            .collect()
    }

    fn button_on(doc: &Document, engine: &HighlightEngine, category: &str) -> bool {
        let button = engine.button_for(category).unwrap();
        doc.has_class(button.element, "highlight-tags--active")
    }

    #[test]
    fn creates_one_button_per_category() {
        let (doc, engine) = setup();
        let host = doc.first_by_class("highlight-buttons").unwrap();
        let names: Vec<String> = doc
            .node(host)
            .children
            .iter()
            .map(|&b| doc.text_content(b))
            .collect();
        assert_eq!(names, vec!["Languages", "DevOps", "Databases"]);
        assert_eq!(engine.buttons().len(), 3);
        let first = engine.buttons()[0].element;
        assert_eq!(doc.node(first).attr("data-category"), Some("Languages"));
        assert!(doc.has_class(first, "highlight-tags"));
    }

    #[test]
    fn clicking_one_instance_activates_all() {
        let (mut doc, mut engine) = setup();
        let gos = tags_labelled(&doc, "Go");
        let hit = engine.dispatch(&mut doc, gos[1], PointerEvent::Click).unwrap();
        assert_eq!(
            hit,
            Dispatch::Tag {
                label: "Go".into(),
                toggle: Some(Toggle::Activated)
            }
        );
        for &g in &gos {
            assert!(engine.state().is_active(g));
            assert!(doc.has_class(g, "tag--active"));
            assert_eq!(doc.node(g).style.border_color.unwrap().to_string(), "#05b805");
            assert_eq!(doc.node(g).style.color, Some(HexColor::WHITE));
        }
    }

    #[test]
    fn button_follows_member_tags() {
        let (mut doc, mut engine) = setup();
        let go = tags_labelled(&doc, "Go")[0];
        let rust = tags_labelled(&doc, "Rust")[0];

        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        assert!(!button_on(&doc, &engine, "Languages"));

        engine.dispatch(&mut doc, rust, PointerEvent::Click).unwrap();
        assert!(button_on(&doc, &engine, "Languages"));

        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        assert!(!button_on(&doc, &engine, "Languages"));
    }

    #[test]
    fn button_click_completes_partial_category() {
        let (mut doc, mut engine) = setup();
        engine.click_label(&mut doc, "Rust").unwrap();

        let toggle = engine.click_category(&mut doc, "Languages").unwrap();
        assert_eq!(toggle, Some(Toggle::Activated));
        for n in tags_labelled(&doc, "Go").into_iter().chain(tags_labelled(&doc, "Rust")) {
            assert!(engine.state().is_active(n));
        }
        assert!(button_on(&doc, &engine, "Languages"));

        let toggle = engine.click_category(&mut doc, "Languages").unwrap();
        assert_eq!(toggle, Some(Toggle::Deactivated));
        assert!(engine.state().is_empty());
        assert!(!button_on(&doc, &engine, "Languages"));
    }

    #[test]
    fn deactivating_one_tag_turns_button_off() {
        let (mut doc, mut engine) = setup();
        engine.click_category(&mut doc, "Languages").unwrap();
        assert!(button_on(&doc, &engine, "Languages"));
        engine.click_label(&mut doc, "Rust").unwrap();
        assert!(!button_on(&doc, &engine, "Languages"));
        let report = engine.report(&doc).unwrap();
        assert!(!report[0].fully_active);
        assert_eq!(report[0].button_active, Some(false));
    }

    #[test]
    fn category_without_page_tags_never_active() {
        let (mut doc, mut engine) = setup();
        assert!(!button_on(&doc, &engine, "Databases"));
        engine.click_category(&mut doc, "Databases").unwrap();
        assert!(!button_on(&doc, &engine, "Databases"));
        assert!(engine.state().is_empty());
    }

    #[test]
    fn hover_previews_whole_cluster() {
        let (mut doc, mut engine) = setup();
        let gos = tags_labelled(&doc, "Go");
        engine.dispatch(&mut doc, gos[0], PointerEvent::Enter).unwrap();
        for &g in &gos {
            let style = &doc.node(g).style;
            assert_eq!(style.border_color.unwrap().to_string(), "#07a007");
            assert!(!engine.state().is_active(g));
        }
        engine.dispatch(&mut doc, gos[0], PointerEvent::Leave).unwrap();
        for &g in &gos {
            assert!(doc.node(g).style.is_authored());
        }
    }

    #[test]
    fn hover_does_not_override_active() {
        let (mut doc, mut engine) = setup();
        let go = tags_labelled(&doc, "Go")[0];
        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        let before = doc.node(go).style.clone();
        engine.dispatch(&mut doc, go, PointerEvent::Enter).unwrap();
        assert_eq!(doc.node(go).style, before);
        engine.dispatch(&mut doc, go, PointerEvent::Leave).unwrap();
        assert_eq!(doc.node(go).style, before);
    }

    #[test]
    fn button_hover_is_preview_only() {
        let (mut doc, mut engine) = setup();
        engine.click_label(&mut doc, "Rust").unwrap();
        let rust = tags_labelled(&doc, "Rust")[0];
        let go = tags_labelled(&doc, "Go")[0];
        let active_style = doc.node(rust).style.clone();
        let button = engine.button_for("Languages").unwrap().element;

        engine.dispatch(&mut doc, button, PointerEvent::Enter).unwrap();
        assert_eq!(engine.state().len(), 1);
        assert!(!doc.node(go).style.is_authored());
        assert_eq!(doc.node(rust).style, active_style);

        engine.dispatch(&mut doc, button, PointerEvent::Leave).unwrap();
        assert!(doc.node(go).style.is_authored());
        assert_eq!(doc.node(rust).style, active_style);
        assert!(engine.state().is_active(rust));
    }

    #[test]
    fn click_round_trip_restores_markup() {
        let (mut doc, mut engine) = setup();
        let go = tags_labelled(&doc, "Go")[1];
        let before = doc.outer_html(go);
        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        assert_eq!(doc.outer_html(go), before);
    }

    #[test]
    fn click_round_trip_keeps_authored_color() {
        let mut doc = parse_html(
            r#"<html><body><span class="tag" style="color: #123456">Go</span></body></html>"#,
            "",
        );
        let mut engine = HighlightEngine::attach(&mut doc, catalog()).unwrap();
        let go = tags_labelled(&doc, "Go")[0];
        let before = doc.outer_html(go);
        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        assert_eq!(doc.node(go).style.color, Some(HexColor::WHITE));
        engine.dispatch(&mut doc, go, PointerEvent::Click).unwrap();
        assert_eq!(doc.outer_html(go), before);

        engine.dispatch(&mut doc, go, PointerEvent::Enter).unwrap();
        engine.dispatch(&mut doc, go, PointerEvent::Leave).unwrap();
        assert_eq!(doc.outer_html(go), before);
    }

    #[test]
    fn activating_twice_changes_nothing() {
        let (mut doc, mut engine) = setup();
        engine.click_category(&mut doc, "Languages").unwrap();
        assert!(button_on(&doc, &engine, "Languages"));
        let snapshot = doc.outer_html(doc.root());
        let len = engine.state().len();

        let labels = vec!["Go".to_string(), "Rust".to_string()];
        let mut ctx = engine.context(&mut doc);
        let members = ctx.clusters().unwrap().members(&labels);
        set_members(&mut ctx, &members, Toggle::Activated);
        set_members(&mut ctx, &members, Toggle::Activated);

        assert_eq!(engine.state().len(), len);
        assert_eq!(doc.outer_html(doc.root()), snapshot);
    }

    #[test]
    fn events_on_tag_text_reach_the_tag() {
        let (mut doc, mut engine) = setup();
        let docker = tags_labelled(&doc, "Docker")[0];
        let text = doc.node(docker).children[0];
        let hit = engine.dispatch(&mut doc, text, PointerEvent::Click).unwrap();
        assert!(matches!(hit, Dispatch::Tag { ref label, .. } if label == "Docker"));
    }

    #[test]
    fn unbound_targets_are_ignored() {
        let (mut doc, mut engine) = setup();
        let section = doc.element_by_id("skills").unwrap();
        let hit = engine.dispatch(&mut doc, section, PointerEvent::Click).unwrap();
        assert_eq!(hit, Dispatch::Ignored);
        assert!(engine.state().is_empty());
    }

    #[test]
    fn unknown_tag_blocks_wiring() {
        let mut doc = parse_html(
            r#"<html><body><div class="highlight-buttons"></div><span class="tag">COBOL</span></body></html>"#,
            "",
        );
        let err = HighlightEngine::attach(&mut doc, catalog()).err().unwrap();
        assert!(err.to_string().contains("COBOL"));
        let host = doc.first_by_class("highlight-buttons").unwrap();
        assert!(doc.node(host).children.is_empty());
    }

    #[test]
    fn missing_host_still_highlights_tags() {
        let mut doc = parse_html(r#"<html><body><span class="tag">Go</span></body></html>"#, "");
        let mut engine = HighlightEngine::attach(&mut doc, catalog()).unwrap();
        assert!(engine.buttons().is_empty());
        assert_eq!(engine.click_label(&mut doc, "Go").unwrap(), Some(Toggle::Activated));
    }

    #[test]
    fn retoggle_restores_document() {
        let (mut doc, mut engine) = setup();
        engine.click_category(&mut doc, "Languages").unwrap();
        let snapshot = doc.outer_html(doc.root());
        let len = engine.state().len();
        let rust = tags_labelled(&doc, "Rust")[0];
        engine.dispatch(&mut doc, rust, PointerEvent::Click).unwrap();
        engine.dispatch(&mut doc, rust, PointerEvent::Click).unwrap();
        assert_eq!(engine.state().len(), len);
        assert_eq!(doc.outer_html(doc.root()), snapshot);
    }
}
