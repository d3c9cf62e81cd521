use shared::{
    domain::NodeId,
    protocol::{EventKind, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::trace;

use super::{Behavior, Reaction};
use crate::config::HeaderConfig;

#[derive(Debug)]
pub struct StickyHeader {
    header: NodeId,
    scrolled: bool,
    config: HeaderConfig,
}

impl StickyHeader {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &HeaderConfig) -> Option<Self> {
        let header = surface.query_one(&config.header)?;
        Some(Self {
            header,
            scrolled: surface.has_class(header, &config.scrolled_class),
            config: config.clone(),
        })
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

impl Behavior for StickyHeader {
    const NAME: &'static str = "header";

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::Window {
            kind: EventKind::Scroll,
        }]
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        let PageEvent::Scroll { scroll_y } = event else {
            return Reaction::ignored();
        };
        let scrolled = *scroll_y > self.config.threshold_px;
        if scrolled != self.scrolled {
            if scrolled {
                surface.add_class(self.header, &self.config.scrolled_class);
            } else {
                surface.remove_class(self.header, &self.config.scrolled_class);
            }
            self.scrolled = scrolled;
            trace!(scroll_y, scrolled, "header state changed");
        }
        Reaction::ignored()
    }
}
