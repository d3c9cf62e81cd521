//! Independent behavior units. Each one owns its state, declares the
//! listeners it needs, and reacts to page events through a [`PageSurface`].

use shared::{
    domain::{ContactPayload, NodeId},
    protocol::{EventOutcome, PageEvent, Subscription},
    surface::PageSurface,
};

use crate::status::StatusTicket;

pub mod anchors;
pub mod contact;
pub mod cursor;
pub mod filter;
pub mod header;
pub mod menu;
pub mod reveal;

pub use anchors::SmoothScroll;
pub use contact::{validate_contact, ContactForm};
pub use cursor::CursorTracker;
pub use filter::ProjectFilter;
pub use header::StickyHeader;
pub use menu::MobileMenu;
pub use reveal::ScrollReveal;

/// Work a handler hands back to the dispatcher instead of doing inline.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Submit {
        form: NodeId,
        payload: ContactPayload,
    },
    ScheduleStatusHide(StatusTicket),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reaction {
    pub outcome: EventOutcome,
    pub effect: Option<Effect>,
}

impl Reaction {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevent_default() -> Self {
        Self {
            outcome: EventOutcome::prevent(),
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            outcome: self.outcome.merge(other.outcome),
            effect: self.effect.or(other.effect),
        }
    }
}

pub trait Behavior {
    const NAME: &'static str;

    fn subscriptions(&self) -> Vec<Subscription>;

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction;
}
