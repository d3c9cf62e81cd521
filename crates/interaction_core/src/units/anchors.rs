use shared::{
    domain::{NodeId, ScrollBehavior},
    protocol::{EventKind, PageEvent, Subscription},
    selector::Selector,
    surface::PageSurface,
};
use tracing::debug;

use super::{Behavior, Reaction};
use crate::config::AnchorConfig;

/// In-page anchor links scroll smoothly, leaving room for the fixed header.
#[derive(Debug)]
pub struct SmoothScroll {
    anchors: Vec<NodeId>,
    config: AnchorConfig,
}

impl SmoothScroll {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &AnchorConfig) -> Option<Self> {
        let anchors = surface.query_all(&config.anchors);
        if anchors.is_empty() {
            return None;
        }
        Some(Self {
            anchors,
            config: config.clone(),
        })
    }

    fn follow<S: PageSurface + ?Sized>(&self, surface: &mut S, anchor: NodeId) -> Reaction {
        let Some(href) = surface.attribute(anchor, "href") else {
            return Reaction::ignored();
        };
        if href == "#" {
            return Reaction::ignored();
        }

        let target = Selector::parse(&href)
            .ok()
            .and_then(|selector| surface.query_one(&selector));
        match target {
            Some(node) => {
                let top =
                    surface.bounding_top(node) + surface.scroll_offset() - self.config.header_offset_px;
                debug!(%href, top, "scrolling to anchor");
                surface.scroll_to(top, ScrollBehavior::Smooth);
            }
            None => debug!(%href, "anchor target not found"),
        }
        Reaction::prevent_default()
    }
}

impl Behavior for SmoothScroll {
    const NAME: &'static str = "anchors";

    fn subscriptions(&self) -> Vec<Subscription> {
        self.anchors
            .iter()
            .map(|anchor| Subscription::Node {
                node: *anchor,
                kind: EventKind::Click,
            })
            .collect()
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        match event {
            PageEvent::Click { target } if self.anchors.contains(target) => {
                self.follow(surface, *target)
            }
            _ => Reaction::ignored(),
        }
    }
}
