use shared::{
    domain::{FilterTag, NodeId},
    protocol::{EventKind, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::debug;

use super::{Behavior, Reaction};
use crate::config::FilterConfig;

/// Category filter over the project list.
#[derive(Debug)]
pub struct ProjectFilter {
    buttons: Vec<NodeId>,
    items: Vec<NodeId>,
    selection: FilterTag,
    config: FilterConfig,
}

impl ProjectFilter {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &FilterConfig) -> Option<Self> {
        let buttons = surface.query_all(&config.buttons);
        if buttons.is_empty() {
            return None;
        }
        // The markup decides the initial selection; fall back to `all`.
        let selection = buttons
            .iter()
            .find(|button| surface.has_class(**button, &config.active_class))
            .map(|button| {
                FilterTag::from_attribute(
                    surface.attribute(*button, &config.filter_attribute).as_deref(),
                )
            })
            .unwrap_or_default();
        Some(Self {
            items: surface.query_all(&config.items),
            buttons,
            selection,
            config: config.clone(),
        })
    }

    pub fn selection(&self) -> &FilterTag {
        &self.selection
    }

    fn select<S: PageSurface + ?Sized>(&mut self, surface: &mut S, button: NodeId) {
        for other in &self.buttons {
            surface.remove_class(*other, &self.config.active_class);
        }
        surface.add_class(button, &self.config.active_class);

        let tag = FilterTag::from_attribute(
            surface
                .attribute(button, &self.config.filter_attribute)
                .as_deref(),
        );
        let mut shown = 0usize;
        for item in &self.items {
            let category = surface.attribute(*item, &self.config.category_attribute);
            let visible = tag.shows(category.as_deref());
            surface.set_style(*item, "display", if visible { "block" } else { "none" });
            shown += usize::from(visible);
        }
        debug!(tag = %tag, shown, total = self.items.len(), "applied project filter");
        self.selection = tag;
    }
}

impl Behavior for ProjectFilter {
    const NAME: &'static str = "filter";

    fn subscriptions(&self) -> Vec<Subscription> {
        self.buttons
            .iter()
            .map(|button| Subscription::Node {
                node: *button,
                kind: EventKind::Click,
            })
            .collect()
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        if let PageEvent::Click { target } = event {
            if self.buttons.contains(target) {
                self.select(surface, *target);
            }
        }
        Reaction::ignored()
    }
}
