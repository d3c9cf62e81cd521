use shared::{
    domain::{MenuState, NodeId},
    protocol::{EventKind, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::debug;

use super::{Behavior, Reaction};
use crate::config::MenuConfig;

/// Mobile navigation toggle. The toggle and panel always share one state.
#[derive(Debug)]
pub struct MobileMenu {
    toggle: NodeId,
    panel: NodeId,
    links: Vec<NodeId>,
    body: Option<NodeId>,
    state: MenuState,
    config: MenuConfig,
}

impl MobileMenu {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &MenuConfig) -> Option<Self> {
        let toggle = surface.query_one(&config.toggle)?;
        let panel = surface.query_one(&config.panel)?;
        let state = if surface.has_class(toggle, &config.active_class) {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        Some(Self {
            toggle,
            panel,
            links: surface.query_all(&config.links),
            body: surface.body(),
            state,
            config: config.clone(),
        })
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    fn apply<S: PageSurface + ?Sized>(&mut self, surface: &mut S, state: MenuState) {
        let class = &self.config.active_class;
        for node in [self.toggle, self.panel] {
            if state.is_open() {
                surface.add_class(node, class);
            } else {
                surface.remove_class(node, class);
            }
        }
        surface.set_attribute(
            self.toggle,
            "aria-expanded",
            if state.is_open() { "true" } else { "false" },
        );
        if let Some(body) = self.body {
            surface.set_style(body, "overflow", if state.is_open() { "hidden" } else { "" });
        }
        if state != self.state {
            debug!(?state, "menu state changed");
        }
        self.state = state;
    }
}

impl Behavior for MobileMenu {
    const NAME: &'static str = "menu";

    fn subscriptions(&self) -> Vec<Subscription> {
        let mut subscriptions = vec![
            Subscription::Node {
                node: self.toggle,
                kind: EventKind::Click,
            },
            Subscription::Window {
                kind: EventKind::Resize,
            },
        ];
        subscriptions.extend(self.links.iter().map(|link| Subscription::Node {
            node: *link,
            kind: EventKind::Click,
        }));
        subscriptions
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        match event {
            PageEvent::Click { target } if *target == self.toggle => {
                self.apply(surface, self.state.toggled());
            }
            PageEvent::Click { target } if self.links.contains(target) => {
                self.apply(surface, MenuState::Closed);
            }
            PageEvent::Resize { width }
                if self.state.is_open() && *width >= self.config.breakpoint_px =>
            {
                self.apply(surface, MenuState::Closed);
            }
            _ => {}
        }
        Reaction::ignored()
    }
}
