//! `TagLensApp`: the egui viewer state.
//!
//! The struct and its load lifecycle live here. Methods are split across the
//! sibling sub-modules:
//!
//! - `navigation`: page loading on a worker thread, reload
//! - `toolbar`:    source bar and the navbar strip
//! - `content`:    document rendering and pointer-event routing

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;

use eframe::egui;

use tag_lens::catalog::TagCatalog;
use tag_lens::color::HexColor;
use tag_lens::dom::{Document, NodeId};
use tag_lens::highlight::engine::HighlightEngine;
use tag_lens::nav::{NavFrame, NavbarTracker, PageGeometry};
use tag_lens::net::{FetchError, PageSource};

/// Pixels per CSS rem in the viewer.
pub const REM_PX: f32 = 8.0;

/// Geometry measured while drawing the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameGeometry {
    /// Section tops relative to the scroll viewport top.
    pub tops: HashMap<NodeId, f32>,
    pub scroll_y: f32,
    pub navbar_height: f32,
    pub navbar_offset_top: f32,
}

impl PageGeometry for FrameGeometry {
    fn top_of(&self, node: NodeId) -> Option<f32> {
        self.tops.get(&node).copied()
    }
    fn navbar_height(&self) -> f32 {
        self.navbar_height
    }
    fn navbar_offset_top(&self) -> f32 {
        self.navbar_offset_top
    }
    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct TagLensApp {
    pub source_input: String,
    pub catalog: TagCatalog,
    pub document: Option<Document>,
    pub engine: Option<HighlightEngine>,
    pub nav: Option<NavbarTracker>,
    pub nav_frame: Option<NavFrame>,
    /// Initialisation or event error shown in the banner.
    pub error: Option<String>,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<Result<Document, FetchError>>>,
    /// Tag or button under the pointer in the previous frame.
    pub hovered: Option<NodeId>,
    pub geometry: FrameGeometry,
    pub last_scroll: Option<f32>,
    pub last_viewport: Option<egui::Rect>,
    /// Section to bring into view after a navbar click.
    pub scroll_target: Option<NodeId>,
    /// Colors used when the highlighter could not be wired.
    pub fallback_colors: HashMap<NodeId, HexColor>,
}

impl TagLensApp {
    pub fn new(source: &PageSource, catalog: TagCatalog) -> Self {
        Self {
            source_input: source.to_string(),
            catalog,
            document: None,
            engine: None,
            nav: None,
            nav_frame: None,
            error: None,
            loading: false,
            fetch_rx: None,
            hovered: None,
            geometry: FrameGeometry::default(),
            last_scroll: None,
            last_viewport: None,
            scroll_target: None,
            fallback_colors: HashMap::new(),
        }
    }
}

impl eframe::App for TagLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_fetch();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        let nav_panel = egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            self.draw_navbar(ui);
        });
        self.geometry.navbar_height = nav_panel.response.rect.height();

        if let Some(ref err) = self.error {
            egui::TopBottomPanel::bottom("error").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(200, 40, 40), err);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.loading {
                ui.centered_and_justified(|ui| ui.spinner());
                ctx.request_repaint();
                return;
            }
            self.draw_content(ui);
        });
    }
}
