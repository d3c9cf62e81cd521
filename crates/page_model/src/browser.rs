//! Turns user actions on a [`Document`] into the page events a real browser
//! would dispatch to the installed listeners.

use std::collections::{BTreeMap, HashSet};

use shared::{
    domain::NodeId,
    protocol::{EventKind, IntersectionOptions, PageEvent, Subscription},
};
use tracing::trace;

use crate::{Document, PageResult};

#[derive(Debug, Clone, Copy)]
struct Observation {
    threshold: f64,
    /// Last reported "at or past threshold" state; `None` until the initial report.
    reported: Option<bool>,
}

/// Listener registry plus intersection bookkeeping for one page.
#[derive(Debug, Default)]
pub struct Browser {
    window: HashSet<EventKind>,
    nodes: HashSet<(NodeId, EventKind)>,
    observed: BTreeMap<NodeId, Observation>,
    last_scroll_y: f64,
}

impl Browser {
    pub fn new(subscriptions: &[Subscription]) -> Self {
        let mut browser = Self::default();
        for subscription in subscriptions {
            browser.install(subscription);
        }
        browser
    }

    pub fn install(&mut self, subscription: &Subscription) {
        match subscription {
            Subscription::Window { kind } => {
                self.window.insert(*kind);
            }
            Subscription::Node { node, kind } => {
                self.nodes.insert((*node, *kind));
            }
            Subscription::Intersection { nodes, options } => {
                self.observe(nodes, options);
            }
        }
    }

    fn observe(&mut self, nodes: &[NodeId], options: &IntersectionOptions) {
        for node in nodes {
            self.observed.insert(
                *node,
                Observation {
                    threshold: options.threshold,
                    reported: None,
                },
            );
        }
    }

    pub fn listens(&self, node: NodeId, kind: EventKind) -> bool {
        self.nodes.contains(&(node, kind))
    }

    /// Intersection entries owed since the last call: the initial report for
    /// newly observed nodes and every threshold crossing.
    pub fn intersection_events(&mut self, document: &Document) -> Vec<PageEvent> {
        let mut events = Vec::new();
        for (node, observation) in self.observed.iter_mut() {
            let (ratio, is_intersecting) = document.intersection(*node);
            let past_threshold = is_intersecting && ratio >= observation.threshold;
            if observation.reported == Some(past_threshold) {
                continue;
            }
            observation.reported = Some(past_threshold);
            trace!(node = node.0, ratio, is_intersecting, "intersection entry");
            events.push(PageEvent::Intersection {
                target: *node,
                ratio,
                is_intersecting,
            });
        }
        events
    }

    /// Events caused by the page's own scroll position changing, e.g. after a
    /// programmatic `scroll_to`.
    pub fn sync(&mut self, document: &Document) -> Vec<PageEvent> {
        let scroll_y = document.viewport().scroll_y;
        let mut events = Vec::new();
        if scroll_y != self.last_scroll_y {
            self.last_scroll_y = scroll_y;
            if self.window.contains(&EventKind::Scroll) {
                events.push(PageEvent::Scroll { scroll_y });
            }
        }
        events.extend(self.intersection_events(document));
        events
    }

    pub fn scroll(&mut self, document: &mut Document, scroll_y: f64) -> Vec<PageEvent> {
        document.set_scroll_y(scroll_y);
        let scroll_y = document.viewport().scroll_y;
        self.last_scroll_y = scroll_y;
        let mut events = Vec::new();
        if self.window.contains(&EventKind::Scroll) {
            events.push(PageEvent::Scroll { scroll_y });
        }
        events.extend(self.intersection_events(document));
        events
    }

    pub fn resize(&mut self, document: &mut Document, width: f64) -> Vec<PageEvent> {
        document.set_viewport_width(width);
        self.window_event(EventKind::Resize, PageEvent::Resize { width })
    }

    pub fn move_pointer(&self, x: f64, y: f64) -> Vec<PageEvent> {
        self.window_event(EventKind::PointerMove, PageEvent::PointerMove { x, y })
    }

    pub fn hover(&self, node: NodeId) -> Vec<PageEvent> {
        self.node_event(node, EventKind::PointerEnter, PageEvent::PointerEnter { target: node })
    }

    pub fn unhover(&self, node: NodeId) -> Vec<PageEvent> {
        self.node_event(node, EventKind::PointerLeave, PageEvent::PointerLeave { target: node })
    }

    /// Click on `node`, bubbling to every listening ancestor.
    pub fn click(&self, document: &Document, node: NodeId) -> Vec<PageEvent> {
        let mut events = Vec::new();
        let mut current = Some(node);
        while let Some(target) = current {
            if self.listens(target, EventKind::Click) {
                events.push(PageEvent::Click { target });
            }
            current = document.parent_of(target);
        }
        events
    }

    pub fn fill(&self, document: &mut Document, control: NodeId, value: &str) -> PageResult<()> {
        document.set_value(control, value)
    }

    pub fn submit(&self, form: NodeId) -> Vec<PageEvent> {
        self.node_event(form, EventKind::Submit, PageEvent::Submit { form })
    }

    fn window_event(&self, kind: EventKind, event: PageEvent) -> Vec<PageEvent> {
        if self.window.contains(&kind) {
            vec![event]
        } else {
            Vec::new()
        }
    }

    fn node_event(&self, node: NodeId, kind: EventKind, event: PageEvent) -> Vec<PageEvent> {
        if self.listens(node, kind) {
            vec![event]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
