//! Scroll-tracking navbar.
//!
//! Independent of the tag highlighter; both listen to the same scroll and
//! load lifecycle. Geometry is supplied by the host through
//! [`PageGeometry`], the tracker only keeps bookkeeping and writes classes
//! and offsets back into the document.
//!
//! - Sticky: latches once the page scrolls past the navbar's resting offset
//! - Active link: the last section whose top passed under the navbar
//! - Scroll motion: after a link click the clicked link stays active until
//!   the smooth scroll arrives
//! - Horizontal motion: the navbar content slides between per-link offsets
//!   in proportion to scroll progress between sections

use std::fmt;

use crate::dom::{Document, NodeId};

/// Distance (px) at which a smooth scroll counts as arrived.
pub const ARRIVAL_TOLERANCE: f32 = 10.0;

/// Scroll distance (px) over which the homepage down arrow fades out.
pub const DOWN_ARROW_FADE: f32 = 200.0;

pub const STICKY_CLASS: &str = "nav--sticky";
pub const BODY_STICKY_CLASS: &str = "sticky-nav";
pub const ACTIVE_LINK_CLASS: &str = "nav__link--active";
pub const CONTENT_CLASS: &str = "navbar__content";
pub const DOWN_ARROW_CLASS: &str = "homepage__down-arrow";

/// Layout queries the host answers for the tracker.
pub trait PageGeometry {
    /// Distance of the element's top edge below the viewport top (negative
    /// once scrolled past).
    fn top_of(&self, node: NodeId) -> Option<f32>;
    fn navbar_height(&self) -> f32;
    /// Resting distance of the navbar from the document top.
    fn navbar_offset_top(&self) -> f32;
    fn scroll_y(&self) -> f32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    MissingNavbar { id: String },
    /// A link's `#anchor` matches no element.
    MissingTarget { href: String },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::MissingNavbar { id } => write!(f, "no navbar element with id '{}'", id),
            NavError::MissingTarget { href } => {
                write!(f, "navbar link '{}' points at no element", href)
            }
        }
    }
}

impl std::error::Error for NavError {}

/// A navbar link and the section it scrolls to.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPage {
    pub link: NodeId,
    pub target: NodeId,
    /// Horizontal position (rem) of the navbar content while this page is
    /// current.
    pub offset_rem: f32,
}

/// In-flight smooth scroll started by a link click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMotion {
    from: Option<usize>,
    to: Option<usize>,
}

impl ScrollMotion {
    pub fn start(&mut self, from: Option<usize>, to: usize) {
        self.from = from;
        self.to = Some(to);
    }

    pub fn is_scrolling(&self) -> bool {
        self.to.is_some()
    }

    /// End the motion once the target is within [`ARRIVAL_TOLERANCE`].
    fn update(&mut self, pages: &[NavPage], geometry: &impl PageGeometry) {
        if let Some(to) = self.to {
            let arrived = geometry
                .top_of(pages[to].target)
                .map_or(true, |top| top.abs() <= ARRIVAL_TOLERANCE);
            if arrived {
                *self = Self::default();
            }
        }
    }
}

/// Result of one scroll update.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFrame {
    pub sticky: bool,
    pub active_link: Option<NodeId>,
    pub content_offset_rem: f32,
    pub down_arrow_opacity: f32,
}

pub struct NavbarTracker {
    navbar: NodeId,
    /// Reverse document order; detection walks from the bottom up.
    pages: Vec<NavPage>,
    sticky: bool,
    resting_offset: Option<f32>,
    motion: ScrollMotion,
}

impl NavbarTracker {
    /// Collect `<a href="#…">` links under the element with id `navbar_id`.
    pub fn discover(document: &Document, navbar_id: &str) -> Result<Self, NavError> {
        let navbar = document
            .element_by_id(navbar_id)
            .ok_or_else(|| NavError::MissingNavbar {
                id: navbar_id.to_string(),
            })?;

        let mut pages = Vec::new();
        for link in document.elements_by_tag(navbar, "a") {
            let node = document.node(link);
            let href = match node.attr("href") {
                Some(href) if href.starts_with('#') => href,
                _ => continue,
            };
            let target = document
                .element_by_id(href.trim_start_matches('#'))
                .ok_or_else(|| NavError::MissingTarget {
                    href: href.to_string(),
                })?;
            let offset_rem = node
                .attr("data-offset")
                .and_then(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(0.0);
            pages.push(NavPage {
                link,
                target,
                offset_rem,
            });
        }
        pages.reverse();

        log::info!("Navbar tracking {} pages", pages.len());
        Ok(Self {
            navbar,
            pages,
            sticky: false,
            resting_offset: None,
            motion: ScrollMotion::default(),
        })
    }

    /// Pages in reverse document order.
    pub fn pages(&self) -> &[NavPage] {
        &self.pages
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    pub fn is_scrolling(&self) -> bool {
        self.motion.is_scrolling()
    }

    /// Re-read the navbar's resting offset (layout changed).
    pub fn on_resize(&mut self, geometry: &impl PageGeometry) {
        self.resting_offset = Some(geometry.navbar_offset_top());
    }

    /// Index of the page whose section sits under the navbar.
    pub fn current_page(&self, geometry: &impl PageGeometry) -> Option<usize> {
        let limit = geometry.navbar_height();
        self.pages
            .iter()
            .position(|p| geometry.top_of(p.target).is_some_and(|top| top <= limit))
    }

    /// Mark `link` active right away and keep it so until the smooth scroll
    /// reaches its section.
    pub fn on_link_click(
        &mut self,
        document: &mut Document,
        geometry: &impl PageGeometry,
        link: NodeId,
    ) -> Option<NodeId> {
        let idx = self.pages.iter().position(|p| p.link == link)?;
        let from = self.current_page(geometry);
        self.set_active_link(document, Some(idx));
        self.motion.start(from, idx);
        log::debug!("nav click -> page {} (from {:?})", idx, from);
        Some(link)
    }

    pub fn on_scroll(&mut self, document: &mut Document, geometry: &impl PageGeometry) -> NavFrame {
        self.update_sticky(document, geometry);

        self.motion.update(&self.pages, geometry);
        let active = if self.motion.is_scrolling() {
            self.motion.to
        } else {
            self.current_page(geometry)
        };
        self.set_active_link(document, active);

        let content_offset_rem = self.horizontal_offset(geometry);
        let down_arrow_opacity = down_arrow_opacity(geometry.scroll_y());
        write_offsets(document, content_offset_rem, down_arrow_opacity);

        NavFrame {
            sticky: self.sticky,
            active_link: active.map(|i| self.pages[i].link),
            content_offset_rem,
            down_arrow_opacity,
        }
    }

    fn update_sticky(&mut self, document: &mut Document, geometry: &impl PageGeometry) {
        let offset = *self
            .resting_offset
            .get_or_insert_with(|| geometry.navbar_offset_top());
        if !self.sticky && geometry.scroll_y() >= offset {
            self.sticky = true;
            document.add_class(self.navbar, STICKY_CLASS);
            if let Some(body) = document.first_by_tag("body") {
                document.add_class(body, BODY_STICKY_CLASS);
            }
            log::debug!("navbar sticky at scroll {}", geometry.scroll_y());
        }
    }

    fn set_active_link(&self, document: &mut Document, active: Option<usize>) {
        for (i, page) in self.pages.iter().enumerate() {
            document.set_class(page.link, ACTIVE_LINK_CLASS, Some(i) == active);
        }
    }

    /// Current and next page for the horizontal motion. While a smooth
    /// scroll is in flight these are its origin and target.
    fn current_and_next(&self, geometry: &impl PageGeometry) -> (Option<usize>, Option<usize>) {
        if self.motion.is_scrolling() {
            return (self.motion.from, self.motion.to);
        }
        match self
            .pages
            .iter()
            .position(|p| geometry.top_of(p.target).is_some_and(|top| top <= 0.0))
        {
            Some(i) => (Some(i), i.checked_sub(1)),
            // Above every section: the homepage, heading for the first page.
            None => (None, self.pages.len().checked_sub(1)),
        }
    }

    /// Navbar content offset (rem) for the current scroll position.
    pub fn horizontal_offset(&self, geometry: &impl PageGeometry) -> f32 {
        let (current, next) = self.current_and_next(geometry);
        let current_offset = current.map_or(0.0, |i| self.pages[i].offset_rem);

        let next = match next {
            Some(next) => &self.pages[next],
            None => return current_offset,
        };

        let current_top = match current {
            Some(i) => geometry.top_of(self.pages[i].target).unwrap_or(0.0),
            None => -geometry.scroll_y(),
        };
        let next_top = match geometry.top_of(next.target) {
            Some(top) => top,
            None => return current_offset,
        };

        let span = (next_top - current_top).abs();
        let progress = if span > f32::EPSILON {
            current_top.abs() / span
        } else {
            0.0
        };
        current_offset + progress * (next.offset_rem - current_offset)
    }
}

/// Opacity of the homepage down arrow at `scroll_y`.
pub fn down_arrow_opacity(scroll_y: f32) -> f32 {
    1.0 - (scroll_y.max(0.0) / DOWN_ARROW_FADE).min(1.0)
}

fn write_offsets(document: &mut Document, content_offset_rem: f32, arrow_opacity: f32) {
    if let Some(content) = document.first_by_class(CONTENT_CLASS) {
        set_style_decl(document, content, "left", format!("{}rem", content_offset_rem));
    }
    if let Some(arrow) = document.first_by_class(DOWN_ARROW_CLASS) {
        set_style_decl(document, arrow, "opacity", format!("{}", arrow_opacity));
    }
}

fn set_style_decl(document: &mut Document, node: NodeId, prop: &str, value: String) {
    let other = &mut document.node_mut(node).style.other;
    match other.iter_mut().find(|(k, _)| k == prop) {
        Some(decl) => decl.1 = value,
        None => other.push((prop.to_string(), value)),
    }
}
