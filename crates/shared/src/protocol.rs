use serde::{Deserialize, Serialize};

use crate::domain::NodeId;

/// Browser events the controller reacts to.
///
/// Window-level events carry the values a handler needs so that handlers
/// never read layout (scroll offset, viewport width, pointer position).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PageEvent {
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerEnter {
        target: NodeId,
    },
    PointerLeave {
        target: NodeId,
    },
    Scroll {
        scroll_y: f64,
    },
    Resize {
        width: f64,
    },
    Click {
        target: NodeId,
    },
    Submit {
        form: NodeId,
    },
    Intersection {
        target: NodeId,
        ratio: f64,
        is_intersecting: bool,
    },
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerEnter { .. } => EventKind::PointerEnter,
            Self::PointerLeave { .. } => EventKind::PointerLeave,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
            Self::Click { .. } => EventKind::Click,
            Self::Submit { .. } => EventKind::Submit,
            Self::Intersection { .. } => EventKind::Intersection,
        }
    }

    /// Node the event was dispatched to, `None` for window-level events.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::PointerEnter { target }
            | Self::PointerLeave { target }
            | Self::Click { target }
            | Self::Intersection { target, .. } => Some(*target),
            Self::Submit { form } => Some(*form),
            Self::PointerMove { .. } | Self::Scroll { .. } | Self::Resize { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PointerMove,
    PointerEnter,
    PointerLeave,
    Scroll,
    Resize,
    Click,
    Submit,
    Intersection,
}

impl EventKind {
    /// DOM event type name used when installing a listener.
    pub fn dom_name(&self) -> &'static str {
        match self {
            Self::PointerMove => "mousemove",
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Intersection => "intersection",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventOutcome {
    pub default_prevented: bool,
}

impl EventOutcome {
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn prevent() -> Self {
        Self {
            default_prevented: true,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            default_prevented: self.default_prevented || other.default_prevented,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionOptions {
    pub threshold: f64,
    pub root_margin: String,
}

/// A listener a behavior unit needs installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Subscription {
    Window {
        kind: EventKind,
    },
    Node {
        node: NodeId,
        kind: EventKind,
    },
    Intersection {
        nodes: Vec<NodeId>,
        options: IntersectionOptions,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_event_uses_tagged_wire_shape() {
        let event = PageEvent::Click { target: NodeId(7) };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "click");
        assert_eq!(json["payload"]["target"], 7);

        let parsed: PageEvent =
            serde_json::from_str(r#"{"type":"scroll","payload":{"scroll_y":120.0}}"#)
                .expect("parse scroll");
        assert_eq!(parsed, PageEvent::Scroll { scroll_y: 120.0 });
    }

    #[test]
    fn window_events_have_no_target() {
        assert_eq!(PageEvent::Resize { width: 800.0 }.target(), None);
        assert_eq!(
            PageEvent::Submit { form: NodeId(3) }.target(),
            Some(NodeId(3))
        );
    }

    #[test]
    fn outcomes_merge_prevent_default() {
        let merged = EventOutcome::allow().merge(EventOutcome::prevent());
        assert!(merged.default_prevented);
        assert!(!EventOutcome::allow().merge(EventOutcome::allow()).default_prevented);
    }
}
