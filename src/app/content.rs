//! Content-area rendering for `TagLensApp`.
//!
//! - `draw_content`: scroll area, geometry capture, event routing
//! - `PagePainter`:  walks the document and draws headings, text, tags
//!   and category buttons from their inline styles

use std::collections::{HashMap, HashSet};

use eframe::egui;

use tag_lens::color::HexColor;
use tag_lens::dom::{Document, NodeId, NodeType};
use tag_lens::highlight::engine::PointerEvent;
use tag_lens::highlight::HighlightSettings;
use tag_lens::nav::DOWN_ARROW_CLASS;

use super::navigation::NAVBAR_ID;
use super::TagLensApp;

const SKIPPED_TAGS: &[&str] = &["head", "title", "meta", "link", "template"];
const INLINE_TAGS: &[&str] = &["span", "a", "b", "i", "em", "strong", "code", "small", "button"];

fn color32(c: HexColor) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

/// Text color and fill of a category button. Active buttons are filled with
/// the category color.
fn button_palette(active: bool, color: HexColor) -> (egui::Color32, Option<egui::Color32>) {
    if active {
        (egui::Color32::WHITE, Some(color32(color)))
    } else {
        (color32(color), None)
    }
}

/// Pointer activity collected during one frame.
#[derive(Default)]
struct PageEvents {
    hovered: Option<NodeId>,
    clicked: Option<NodeId>,
}

struct PagePainter<'a> {
    doc: &'a Document,
    settings: &'a HighlightSettings,
    /// Elements wired to the highlighter.
    interactive: &'a HashSet<NodeId>,
    fallback: &'a HashMap<NodeId, HexColor>,
    /// Category color of each generated button.
    button_colors: &'a HashMap<NodeId, HexColor>,
    nav_targets: &'a HashSet<NodeId>,
    navbar: Option<NodeId>,
    scroll_target: Option<NodeId>,
    arrow_opacity: f32,
    viewport_top: f32,
    tops: HashMap<NodeId, f32>,
    scrolled_to: bool,
    events: PageEvents,
}

impl PagePainter<'_> {
    fn is_inline(&self, id: NodeId) -> bool {
        let node = self.doc.node(id);
        match node.node_type {
            NodeType::Text => true,
            NodeType::Element => {
                INLINE_TAGS.contains(&node.tag.as_str())
                    || node.has_class(&self.settings.tag_class)
            }
            NodeType::Document => false,
        }
    }

    fn draw(&mut self, ui: &mut egui::Ui, id: NodeId) {
        if Some(id) == self.navbar {
            return;
        }
        let doc = self.doc;
        let node = doc.node(id);
        match node.node_type {
            NodeType::Text => {
                let text = node.text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    ui.label(text);
                }
                return;
            }
            NodeType::Element => {}
            NodeType::Document => {
                for &child in &node.children {
                    self.draw(ui, child);
                }
                return;
            }
        }
        if SKIPPED_TAGS.contains(&node.tag.as_str()) {
            return;
        }

        if self.nav_targets.contains(&id) {
            let top = ui.cursor().top();
            self.tops.insert(id, top - self.viewport_top);
        }

        if node.has_class(DOWN_ARROW_CLASS) {
            let color = ui.visuals().text_color().gamma_multiply(self.arrow_opacity);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("\u{2304}").size(32.0).color(color));
            });
            return;
        }

        if self.interactive.contains(&id) || node.has_class(&self.settings.tag_class) {
            self.draw_tag(ui, id);
            return;
        }

        match node.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let size = match node.tag.as_str() {
                    "h1" => 28.0,
                    "h2" => 22.0,
                    _ => 18.0,
                };
                let text = doc.text_content(id);
                if !text.is_empty() {
                    ui.heading(egui::RichText::new(text).size(size).strong());
                    ui.add_space(6.0);
                }
            }
            _ => self.draw_children(ui, id),
        }

        if self.scroll_target == Some(id) && !self.scrolled_to {
            if let Some(&top) = self.tops.get(&id) {
                let left = ui.min_rect().left();
                let rect = egui::Rect::from_min_size(
                    egui::pos2(left, top + self.viewport_top),
                    egui::vec2(1.0, 1.0),
                );
                ui.scroll_to_rect(rect, Some(egui::Align::TOP));
                self.scrolled_to = true;
            }
        }
    }

    /// Runs of inline children share a wrapped row.
    fn draw_children(&mut self, ui: &mut egui::Ui, id: NodeId) {
        let doc = self.doc;
        let children = &doc.node(id).children;
        let mut i = 0;
        while i < children.len() {
            if self.is_inline(children[i]) {
                let start = i;
                while i < children.len() && self.is_inline(children[i]) {
                    i += 1;
                }
                let run = &children[start..i];
                ui.horizontal_wrapped(|ui| {
                    for &child in run {
                        self.draw(ui, child);
                    }
                });
            } else {
                self.draw(ui, children[i]);
                i += 1;
            }
        }
    }

    /// Category buttons carry no inline style; their look follows the
    /// active button class.
    fn draw_button(&mut self, ui: &mut egui::Ui, id: NodeId, color: HexColor) {
        let doc = self.doc;
        let label = doc.text_content(id);
        let active = doc.has_class(id, &self.settings.active_button_class);

        let (text, fill) = button_palette(active, color);
        let mut button = egui::Button::new(egui::RichText::new(&label).color(text)).selected(active);
        if let Some(fill) = fill {
            button = button.fill(fill);
        }
        let response = ui.add(button.stroke(egui::Stroke::new(1.0, color32(color))));
        if response.hovered() {
            self.events.hovered = Some(id);
        }
        if response.clicked() {
            self.events.clicked = Some(id);
        }
    }

    fn draw_tag(&mut self, ui: &mut egui::Ui, id: NodeId) {
        if let Some(&color) = self.button_colors.get(&id) {
            self.draw_button(ui, id, color);
            return;
        }
        let doc = self.doc;
        let style = &doc.node(id).style;
        let label = doc.text_content(id);

        let fallback = self.fallback.get(&id).copied();
        let mut text = egui::RichText::new(&label);
        if let Some(c) = style.color {
            text = text.color(color32(c));
        }
        let mut button = egui::Button::new(text);
        if let Some(c) = style.background_color {
            button = button.fill(color32(c));
        }
        if let Some(c) = style.border_color.or(fallback) {
            button = button.stroke(egui::Stroke::new(1.0, color32(c)));
        }

        let response = ui.add(button);
        if let Some(c) = style.box_shadow {
            ui.painter().rect_stroke(
                response.rect.expand(3.0),
                4.0,
                egui::Stroke::new(2.0, color32(c).gamma_multiply(0.6)),
            );
        }
        if !self.interactive.contains(&id) {
            return;
        }
        if response.hovered() {
            self.events.hovered = Some(id);
        }
        if response.clicked() {
            self.events.clicked = Some(id);
        }
    }
}

impl TagLensApp {
    /// Render the central content panel.
    pub fn draw_content(&mut self, ui: &mut egui::Ui) {
        let document = match self.document {
            Some(ref document) => document,
            None => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.heading("tag-lens");
                        ui.label("Enter a page path or URL and press Enter");
                    });
                });
                return;
            }
        };

        let default_settings;
        let settings = match self.engine {
            Some(ref engine) => engine.settings(),
            None => {
                default_settings = HighlightSettings::from_catalog(&self.catalog);
                &default_settings
            }
        };
        let mut interactive = HashSet::new();
        if let Some(ref engine) = self.engine {
            for tag in document.elements_with_class(&settings.tag_class) {
                if engine.is_bound(tag) {
                    interactive.insert(tag);
                }
            }
            interactive.extend(engine.buttons().iter().map(|b| b.element));
        }
        let button_colors: HashMap<NodeId, HexColor> = self
            .engine
            .as_ref()
            .map(|engine| {
                engine
                    .buttons()
                    .iter()
                    .filter_map(|b| {
                        let category = engine.catalog().category(&b.category)?;
                        Some((b.element, category.color))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let nav_targets: HashSet<NodeId> = self
            .nav
            .as_ref()
            .map(|nav| nav.pages().iter().map(|p| p.target).collect())
            .unwrap_or_default();

        if !document.title.is_empty() {
            ui.heading(&document.title);
            ui.separator();
        }

        let mut painter = PagePainter {
            doc: document,
            settings,
            interactive: &interactive,
            fallback: &self.fallback_colors,
            button_colors: &button_colors,
            nav_targets: &nav_targets,
            navbar: document.element_by_id(NAVBAR_ID),
            scroll_target: self.scroll_target,
            arrow_opacity: self.nav_frame.as_ref().map_or(1.0, |f| f.down_arrow_opacity),
            viewport_top: 0.0,
            tops: HashMap::new(),
            scrolled_to: false,
            events: PageEvents::default(),
        };

        let root = document.first_by_tag("body").unwrap_or_else(|| document.root());
        let output = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                painter.viewport_top = ui.clip_rect().top();
                painter.draw(ui, root);
            });

        let PagePainter {
            tops,
            scrolled_to,
            events,
            ..
        } = painter;
        if scrolled_to {
            self.scroll_target = None;
        }

        self.geometry.tops = tops;
        self.geometry.scroll_y = output.state.offset.y;
        self.update_nav(ui.ctx());
        self.route_events(events);
    }

    /// Feed the measured geometry to the navbar tracker.
    fn update_nav(&mut self, ctx: &egui::Context) {
        let (nav, document) = match (self.nav.as_mut(), self.document.as_mut()) {
            (Some(nav), Some(document)) => (nav, document),
            _ => return,
        };

        // First section in document order, in document space.
        if let Some(first) = nav.pages().last() {
            if let Some(&top) = self.geometry.tops.get(&first.target) {
                self.geometry.navbar_offset_top = top + self.geometry.scroll_y;
            }
        }

        let viewport = ctx.screen_rect();
        if self.last_viewport != Some(viewport) {
            self.last_viewport = Some(viewport);
            nav.on_resize(&self.geometry);
        }

        let scroll_y = self.geometry.scroll_y;
        if self.last_scroll != Some(scroll_y) || nav.is_scrolling() {
            self.last_scroll = Some(scroll_y);
            self.nav_frame = Some(nav.on_scroll(document, &self.geometry));
            if nav.is_scrolling() {
                ctx.request_repaint();
            }
        }
    }

    /// Translate this frame's pointer activity into highlighter events.
    fn route_events(&mut self, events: PageEvents) {
        let (engine, document) = match (self.engine.as_mut(), self.document.as_mut()) {
            (Some(engine), Some(document)) => (engine, document),
            _ => return,
        };

        let mut queue = Vec::new();
        if events.hovered != self.hovered {
            if let Some(prev) = self.hovered {
                queue.push((prev, PointerEvent::Leave));
            }
            if let Some(next) = events.hovered {
                queue.push((next, PointerEvent::Enter));
            }
            self.hovered = events.hovered;
        }
        if let Some(clicked) = events.clicked {
            queue.push((clicked, PointerEvent::Click));
        }

        for (target, event) in queue {
            match engine.dispatch(document, target, event) {
                Ok(outcome) => log::trace!("{:?} -> {:?}", event, outcome),
                Err(e) => {
                    log::error!("Highlight event failed: {}", e);
                    self.error = Some(e.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag_lens::catalog::TagCatalog;
    use tag_lens::dom::parser::parse_html;
    use tag_lens::highlight::engine::HighlightEngine;

    #[test]
    fn idle_button_uses_category_text() {
        let green = HexColor::new(0, 255, 0);
        assert_eq!(button_palette(false, green), (color32(green), None));
    }

    #[test]
    fn active_button_is_filled() {
        let green = HexColor::new(0, 255, 0);
        assert_eq!(
            button_palette(true, green),
            (egui::Color32::WHITE, Some(egui::Color32::from_rgb(0, 255, 0)))
        );
    }

    #[test]
    fn button_class_follows_category_clicks() {
        let mut doc = parse_html(
            r#"<html><body><div class="highlight-buttons"></div><span class="tag">Rust</span></body></html>"#,
            "",
        );
        let catalog = TagCatalog::default();
        let mut engine = HighlightEngine::attach(&mut doc, catalog).unwrap();
        let name = engine.catalog().lookup("Rust").unwrap().category;
        let button = engine.button_for(&name).unwrap().element;
        let active_class = engine.settings().active_button_class.clone();

        engine.click_label(&mut doc, "Rust").unwrap();
        assert!(doc.has_class(button, &active_class));
        engine.click_label(&mut doc, "Rust").unwrap();
        assert!(!doc.has_class(button, &active_class));
    }
}
