pub mod color;
pub mod catalog;
pub mod dom;
pub mod net;

// Tag cross-highlighting: clusters, activation state, category buttons
pub mod highlight;

// Scroll-tracking navbar (independent of the highlighter)
pub mod nav;
