//! Category highlight buttons.
//!
//! One button per catalog category, appended to the button host. Clicking
//! activates or deactivates every tag of the category; the button's active
//! class mirrors whether the whole category is active and is recomputed
//! after every change.

use crate::catalog::{Category, TagCatalog};
use crate::color::HexColor;
use crate::dom::{attrs, Document, NodeId};

use super::activation::ActivationState;
use super::cluster::ClusterIndex;
use super::tags::{preview, set_members, unpreview};
use super::{HighlightContext, HighlightError, HighlightSettings, Toggle};

/// Listener context bound to one generated button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryButton {
    pub element: NodeId,
    pub category: String,
}

/// Append one button per category to the host element.
///
/// Returns no buttons when the page has no host; tag highlighting works
/// without them.
pub fn create_buttons(
    document: &mut Document,
    catalog: &TagCatalog,
    settings: &HighlightSettings,
) -> Vec<CategoryButton> {
    let host = match document.first_by_class(&settings.host_class) {
        Some(host) => host,
        None => {
            log::warn!(
                "No '.{}' element on the page, category buttons disabled",
                settings.host_class
            );
            return Vec::new();
        }
    };

    catalog
        .categories()
        .iter()
        .map(|category| {
            let element = document.append_element(
                host,
                "button",
                attrs(&[
                    ("class", settings.button_class.as_str()),
                    ("data-category", category.name.as_str()),
                    ("type", "button"),
                ]),
            );
            document.append_text(element, category.name.as_str());
            CategoryButton {
                element,
                category: category.name.clone(),
            }
        })
        .collect()
}

/// Non-empty and every member active. A category with nothing on the page
/// is never fully active.
pub fn fully_active(state: &ActivationState, members: &[(NodeId, HexColor)]) -> bool {
    !members.is_empty() && state.all_active(members.iter().map(|&(n, _)| n))
}

impl CategoryButton {
    fn members(
        &self,
        catalog: &TagCatalog,
        index: &ClusterIndex,
    ) -> Vec<(NodeId, HexColor)> {
        catalog
            .category(&self.category)
            .map(|c: &Category| index.members(&c.tags))
            .unwrap_or_default()
    }

    /// Bulk toggle. Partially active counts as inactive, so the first click
    /// on a partial category completes it.
    pub fn click(&self, ctx: &mut HighlightContext<'_>) -> Result<Toggle, HighlightError> {
        let index = ctx.clusters()?;
        let members = self.members(ctx.catalog, &index);
        let toggle = if fully_active(ctx.state, &members) {
            Toggle::Deactivated
        } else {
            Toggle::Activated
        };
        set_members(ctx, &members, toggle);
        log::debug!(
            "button '{}' -> {:?} ({} elements)",
            self.category,
            toggle,
            members.len()
        );
        self.sync(ctx, &index);
        Ok(toggle)
    }

    pub fn pointer_enter(&self, ctx: &mut HighlightContext<'_>) -> Result<(), HighlightError> {
        let index = ctx.clusters()?;
        let members = self.members(ctx.catalog, &index);
        preview(ctx, &members);
        Ok(())
    }

    /// Clear the preview; members that are really active keep their style.
    pub fn pointer_leave(&self, ctx: &mut HighlightContext<'_>) -> Result<(), HighlightError> {
        let index = ctx.clusters()?;
        let members = self.members(ctx.catalog, &index);
        unpreview(ctx, &members, true);
        Ok(())
    }

    /// Recompute the active class. Returns the new state.
    pub fn sync(&self, ctx: &mut HighlightContext<'_>, index: &ClusterIndex) -> bool {
        let members = self.members(ctx.catalog, index);
        let on = fully_active(ctx.state, &members);
        ctx.document
            .set_class(self.element, &ctx.settings.active_button_class, on);
        on
    }
}

/// Sync the button owning `category`, if the page has one.
pub(crate) fn sync_category(
    ctx: &mut HighlightContext<'_>,
    index: &ClusterIndex,
    category: &str,
) -> Option<bool> {
    let button = ctx.buttons.iter().find(|b| b.category == category)?.clone();
    Some(button.sync(ctx, index))
}
