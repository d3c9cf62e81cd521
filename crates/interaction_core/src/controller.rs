use shared::{error::SubmitError, protocol::PageEvent, protocol::Subscription, surface::PageSurface};
use tracing::{debug, info};

use crate::{
    config::ControllerConfig,
    status::StatusTicket,
    units::{
        Behavior, ContactForm, CursorTracker, MobileMenu, ProjectFilter, Reaction, ScrollReveal,
        SmoothScroll, StickyHeader,
    },
};

/// Every behavior unit attached to one page.
///
/// Units whose markup is missing are left out; the rest see every event and
/// ignore what is not theirs.
#[derive(Debug)]
pub struct PageController {
    cursor: Option<CursorTracker>,
    reveal: Option<ScrollReveal>,
    header: Option<StickyHeader>,
    filter: Option<ProjectFilter>,
    contact: Option<ContactForm>,
    menu: Option<MobileMenu>,
    anchors: Option<SmoothScroll>,
}

impl PageController {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &ControllerConfig) -> Self {
        let controller = Self {
            cursor: CursorTracker::attach(surface, &config.cursor),
            reveal: ScrollReveal::attach(surface, &config.reveal),
            header: StickyHeader::attach(surface, &config.header),
            filter: ProjectFilter::attach(surface, &config.filter),
            contact: ContactForm::attach(surface, &config.contact),
            menu: MobileMenu::attach(surface, &config.menu),
            anchors: SmoothScroll::attach(surface, &config.anchors),
        };
        info!(units = ?controller.active_units(), "page interactions initialized");
        controller
    }

    pub fn active_units(&self) -> Vec<&'static str> {
        let mut units = Vec::new();
        let mut note = |present: bool, name: &'static str| {
            if present {
                units.push(name);
            }
        };
        note(self.cursor.is_some(), CursorTracker::NAME);
        note(self.reveal.is_some(), ScrollReveal::NAME);
        note(self.header.is_some(), StickyHeader::NAME);
        note(self.filter.is_some(), ProjectFilter::NAME);
        note(self.contact.is_some(), ContactForm::NAME);
        note(self.menu.is_some(), MobileMenu::NAME);
        note(self.anchors.is_some(), SmoothScroll::NAME);
        units
    }

    /// Listeners to install, deduplicated across units.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let mut all: Vec<Subscription> = Vec::new();
        let mut extend = |subscriptions: Vec<Subscription>| {
            for subscription in subscriptions {
                if !all.contains(&subscription) {
                    all.push(subscription);
                }
            }
        };
        if let Some(unit) = &self.cursor {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.reveal {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.header {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.filter {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.contact {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.menu {
            extend(unit.subscriptions());
        }
        if let Some(unit) = &self.anchors {
            extend(unit.subscriptions());
        }
        all
    }

    /// Runs every unit against `event` and merges what they ask for.
    pub fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        let mut reaction = Reaction::ignored();
        if let Some(unit) = &mut self.cursor {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.reveal {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.header {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.filter {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.contact {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.menu {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if let Some(unit) = &mut self.anchors {
            reaction = reaction.merge(unit.handle(surface, event));
        }
        if reaction.outcome.default_prevented {
            debug!(kind = ?event.kind(), "default action prevented");
        }
        reaction
    }

    /// Shows the submission result; `None` when no contact form is attached.
    pub fn finish_submission<S: PageSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        result: Result<(), SubmitError>,
    ) -> Option<StatusTicket> {
        let contact = self.contact.as_mut()?;
        Some(contact.finish_submission(surface, result))
    }

    pub fn expire_status<S: PageSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        ticket: StatusTicket,
    ) -> bool {
        self.contact
            .as_mut()
            .is_some_and(|contact| contact.expire_status(surface, ticket))
    }

    pub fn cursor(&self) -> Option<&CursorTracker> {
        self.cursor.as_ref()
    }

    pub fn reveal(&self) -> Option<&ScrollReveal> {
        self.reveal.as_ref()
    }

    pub fn header(&self) -> Option<&StickyHeader> {
        self.header.as_ref()
    }

    pub fn filter(&self) -> Option<&ProjectFilter> {
        self.filter.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn anchors(&self) -> Option<&SmoothScroll> {
        self.anchors.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
