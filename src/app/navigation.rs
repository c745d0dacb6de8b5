//! Page loading for `TagLensApp`.
//!
//! Pages load on a worker thread; `check_fetch` picks the result up on the
//! UI thread and wires the highlighter and navbar onto the new document.

use std::collections::HashMap;
use std::sync::mpsc;

use eframe::egui;

use tag_lens::dom::Document;
use tag_lens::highlight::engine::HighlightEngine;
use tag_lens::highlight::HighlightSettings;
use tag_lens::nav::NavbarTracker;
use tag_lens::net::PageSource;

use super::{FrameGeometry, TagLensApp};

/// Id of the navbar element on portfolio pages.
pub const NAVBAR_ID: &str = "navbar";

impl TagLensApp {
    /// Start loading `source_input` without blocking the UI.
    pub fn reload(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;

        let source = PageSource::parse(self.source_input.trim());
        log::info!("Loading {}", source);

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(source.load());
            ctx.request_repaint();
        });
    }

    /// Poll the worker for a finished load.
    pub fn check_fetch(&mut self) {
        let result = match self.fetch_rx.as_ref().map(|rx| rx.try_recv()) {
            Some(Ok(result)) => result,
            Some(Err(mpsc::TryRecvError::Empty)) | None => return,
            Some(Err(mpsc::TryRecvError::Disconnected)) => {
                self.fetch_rx = None;
                self.loading = false;
                self.error = Some("page loader stopped unexpectedly".into());
                return;
            }
        };
        self.fetch_rx = None;
        self.loading = false;

        match result {
            Ok(document) => self.install(document),
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Wire the highlighter and navbar onto a freshly loaded document.
    pub fn install(&mut self, mut document: Document) {
        self.hovered = None;
        self.nav_frame = None;
        self.last_scroll = None;
        self.scroll_target = None;
        self.geometry = FrameGeometry::default();
        self.fallback_colors = HashMap::new();

        match HighlightEngine::attach(&mut document, self.catalog.clone()) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                log::error!("Tag highlighting disabled: {}", e);
                self.error = Some(e.to_string());
                self.engine = None;
                let settings = HighlightSettings::from_catalog(&self.catalog);
                for tag in document.elements_with_class(&settings.tag_class) {
                    let label = document.text_content(tag);
                    self.fallback_colors
                        .insert(tag, self.catalog.color_or_fallback(&label));
                }
            }
        }

        self.nav = match NavbarTracker::discover(&document, NAVBAR_ID) {
            Ok(nav) => Some(nav),
            Err(e) => {
                log::warn!("Navbar tracking disabled: {}", e);
                None
            }
        };

        self.document = Some(document);
    }
}
