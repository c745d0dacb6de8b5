//! Per-tag pointer handling.
//!
//! A tag is in one of three visual states: inactive, hover preview (only
//! while not active) and active. Hover and click always act on the whole
//! cluster, so every instance of a duplicated label moves together.

use crate::color::HexColor;
use crate::dom::NodeId;

use super::cluster::{Cluster, ClusterIndex};
use super::{buttons, style, HighlightContext, HighlightError, Toggle};

/// Listener context bound to one tag element at wiring time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBinding {
    pub element: NodeId,
    pub label: String,
}

impl TagBinding {
    pub fn new(element: NodeId, label: impl Into<String>) -> Self {
        Self {
            element,
            label: label.into(),
        }
    }

    fn cluster<'i>(&self, index: &'i ClusterIndex) -> Result<&'i Cluster, HighlightError> {
        index
            .cluster_of(self.element)
            .ok_or(HighlightError::Detached { node: self.element })
    }

    pub fn pointer_enter(&self, ctx: &mut HighlightContext<'_>) -> Result<(), HighlightError> {
        let index = ctx.clusters()?;
        let cluster = self.cluster(&index)?;
        log::debug!("hover enter '{}' ({} elements)", cluster.label, cluster.elements.len());
        preview(ctx, &cluster_members(cluster));
        Ok(())
    }

    pub fn pointer_leave(&self, ctx: &mut HighlightContext<'_>) -> Result<(), HighlightError> {
        let index = ctx.clusters()?;
        let cluster = self.cluster(&index)?;
        unpreview(ctx, &cluster_members(cluster), false);
        Ok(())
    }

    /// Toggle the whole cluster. The clicked element decides the direction,
    /// every member follows it.
    pub fn click(&self, ctx: &mut HighlightContext<'_>) -> Result<Toggle, HighlightError> {
        let index = ctx.clusters()?;
        let cluster = self.cluster(&index)?;
        let toggle = if ctx.state.is_active(self.element) {
            Toggle::Deactivated
        } else {
            Toggle::Activated
        };
        set_members(ctx, &cluster_members(cluster), toggle);
        log::debug!("click '{}' -> {:?}", cluster.label, toggle);
        buttons::sync_category(ctx, &index, &cluster.category);
        Ok(toggle)
    }
}

fn cluster_members(cluster: &Cluster) -> Vec<(NodeId, HexColor)> {
    cluster.elements.iter().map(|&e| (e, cluster.color)).collect()
}

/// Hover preview on every member that is not active.
pub(crate) fn preview(ctx: &mut HighlightContext<'_>, members: &[(NodeId, HexColor)]) {
    for &(node, color) in members {
        if !ctx.state.is_active(node) {
            style::apply_hover(ctx.document, node, color, ctx.settings);
        }
    }
}

/// Drop the preview from inactive members. With `reassert_active`, active
/// members get their active style written again.
pub(crate) fn unpreview(
    ctx: &mut HighlightContext<'_>,
    members: &[(NodeId, HexColor)],
    reassert_active: bool,
) {
    for &(node, color) in members {
        if !ctx.state.is_active(node) {
            style::clear(ctx.document, node, ctx.settings);
        } else if reassert_active {
            style::apply_active(ctx.document, node, color, ctx.settings);
        }
    }
}

/// Move every member to `toggle`. State is committed for all members
/// before any style is written.
pub(crate) fn set_members(
    ctx: &mut HighlightContext<'_>,
    members: &[(NodeId, HexColor)],
    toggle: Toggle,
) {
    for &(node, _) in members {
        match toggle {
            Toggle::Activated => ctx.state.activate(node),
            Toggle::Deactivated => ctx.state.deactivate(node),
        };
    }
    for &(node, color) in members {
        match toggle {
            Toggle::Activated => style::apply_active(ctx.document, node, color, ctx.settings),
            Toggle::Deactivated => style::clear(ctx.document, node, ctx.settings),
        }
    }
}
