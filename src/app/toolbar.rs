//! Toolbar rendering for `TagLensApp`.
//!
//! Draws the source bar and the page's navbar strip.

use eframe::egui;

use tag_lens::dom::NodeId;
use tag_lens::nav::ACTIVE_LINK_CLASS;

use super::{TagLensApp, REM_PX};

impl TagLensApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            let response = ui.add_sized(
                [ui.available_width() - 140.0, 24.0],
                egui::TextEdit::singleline(&mut self.source_input)
                    .hint_text("Page path or URL...")
                    .font(egui::TextStyle::Monospace),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.reload(ctx);
            }
            if ui.button("Load").clicked() {
                self.reload(ctx);
            }

            if let Some(ref engine) = self.engine {
                ui.label(format!("{} active", engine.state().len()));
            }
        });
    }

    /// Render the page navbar. Links slide horizontally with the tracker's
    /// content offset; clicking one starts a smooth scroll to its section.
    pub fn draw_navbar(&mut self, ui: &mut egui::Ui) {
        let (nav, document) = match (self.nav.as_mut(), self.document.as_mut()) {
            (Some(nav), Some(document)) => (nav, document),
            _ => return,
        };

        // Offsets are usually negative; shift relative to the leftmost one.
        let min_offset = nav
            .pages()
            .iter()
            .map(|p| p.offset_rem)
            .fold(0.0_f32, f32::min);
        let offset = self
            .nav_frame
            .as_ref()
            .map_or(0.0, |f| f.content_offset_rem);

        let mut clicked: Option<(NodeId, NodeId)> = None;
        ui.horizontal(|ui| {
            ui.add_space(4.0 + (offset - min_offset) * REM_PX);
            for page in nav.pages().iter().rev() {
                let active = document.has_class(page.link, ACTIVE_LINK_CLASS);
                let label = document.text_content(page.link);
                if ui.selectable_label(active, label).clicked() {
                    clicked = Some((page.link, page.target));
                }
            }
            if nav.is_sticky() {
                ui.weak("\u{1F4CC}");
            }
        });

        if let Some((link, target)) = clicked {
            nav.on_link_click(document, &self.geometry, link);
            self.scroll_target = Some(target);
        }
    }
}
