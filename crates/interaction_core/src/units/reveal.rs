use std::collections::BTreeMap;

use shared::{
    domain::NodeId,
    protocol::{IntersectionOptions, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::debug;

use super::{Behavior, Reaction};
use crate::config::RevealConfig;

/// One-shot "active" flag for every reveal target present at attach time.
#[derive(Debug)]
pub struct ScrollReveal {
    revealed: BTreeMap<NodeId, bool>,
    config: RevealConfig,
}

impl ScrollReveal {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &RevealConfig) -> Option<Self> {
        let targets = surface.query_all(&config.targets);
        if targets.is_empty() {
            return None;
        }
        Some(Self {
            revealed: targets.into_iter().map(|node| (node, false)).collect(),
            config: config.clone(),
        })
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.get(&node).copied().unwrap_or(false)
    }

    pub fn revealed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.revealed
            .iter()
            .filter(|(_, revealed)| **revealed)
            .map(|(node, _)| *node)
    }
}

impl Behavior for ScrollReveal {
    const NAME: &'static str = "reveal";

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::Intersection {
            nodes: self.revealed.keys().copied().collect(),
            options: IntersectionOptions {
                threshold: self.config.threshold,
                root_margin: self.config.root_margin.clone(),
            },
        }]
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        let PageEvent::Intersection {
            target,
            ratio,
            is_intersecting,
        } = event
        else {
            return Reaction::ignored();
        };
        if !*is_intersecting || *ratio < self.config.threshold {
            return Reaction::ignored();
        }
        let Some(revealed) = self.revealed.get_mut(target) else {
            return Reaction::ignored();
        };
        if !*revealed {
            *revealed = true;
            surface.add_class(*target, &self.config.active_class);
            debug!(node = target.0, ratio, "revealed element");
        }
        Reaction::ignored()
    }
}
