use std::collections::BTreeSet;

use shared::{
    domain::{NodeId, Point},
    protocol::{EventKind, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::trace;

use super::{Behavior, Reaction};
use crate::config::CursorConfig;

/// Mirrors the pointer onto the dot and trailing outline indicators.
#[derive(Debug)]
pub struct CursorTracker {
    dot: NodeId,
    outline: NodeId,
    interactive: BTreeSet<NodeId>,
    config: CursorConfig,
    hovering: bool,
}

impl CursorTracker {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &CursorConfig) -> Option<Self> {
        let dot = surface.query_one(&config.dot)?;
        let outline = surface.query_one(&config.outline)?;
        let interactive = surface.query_all(&config.interactive).into_iter().collect();
        Some(Self {
            dot,
            outline,
            interactive,
            config: config.clone(),
            hovering: false,
        })
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    fn follow<S: PageSurface + ?Sized>(&self, surface: &mut S, point: Point) {
        surface.set_style(self.dot, "translate", &point.translate_value());
        surface.animate_translate(self.outline, point, self.config.trail());
    }

    fn set_hover<S: PageSurface + ?Sized>(&mut self, surface: &mut S, hovering: bool) {
        let (size, background, opacity) = if hovering {
            (
                self.config.hover_size_px,
                self.config.hover_background.as_str(),
                "0",
            )
        } else {
            (self.config.rest_size_px, "transparent", "1")
        };
        let size = format!("{size}px");
        surface.set_style(self.outline, "width", &size);
        surface.set_style(self.outline, "height", &size);
        surface.set_style(self.outline, "background-color", background);
        surface.set_style(self.dot, "opacity", opacity);
        self.hovering = hovering;
        trace!(hovering, "cursor hover state");
    }
}

impl Behavior for CursorTracker {
    const NAME: &'static str = "cursor";

    fn subscriptions(&self) -> Vec<Subscription> {
        let mut subscriptions = vec![Subscription::Window {
            kind: EventKind::PointerMove,
        }];
        for node in &self.interactive {
            for kind in [EventKind::PointerEnter, EventKind::PointerLeave] {
                subscriptions.push(Subscription::Node { node: *node, kind });
            }
        }
        subscriptions
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        match event {
            PageEvent::PointerMove { x, y } => self.follow(surface, Point::new(*x, *y)),
            PageEvent::PointerEnter { target } if self.interactive.contains(target) => {
                self.set_hover(surface, true)
            }
            PageEvent::PointerLeave { target } if self.interactive.contains(target) => {
                self.set_hover(surface, false)
            }
            _ => {}
        }
        Reaction::ignored()
    }
}
