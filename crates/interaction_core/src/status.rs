use std::time::Duration;

use shared::{
    domain::{NodeId, StatusKind},
    surface::PageSurface,
};
use tracing::debug;

/// Handle for one status display; only the newest ticket may hide the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTicket {
    pub generation: u64,
    pub hide_after: Duration,
}

/// The single shared region that shows one transient form message.
#[derive(Debug)]
pub struct StatusRegion {
    node: Option<NodeId>,
    generation: u64,
    hide_after: Duration,
}

impl StatusRegion {
    pub fn new(node: Option<NodeId>, hide_after: Duration) -> Self {
        Self {
            node,
            generation: 0,
            hide_after,
        }
    }

    pub fn show<S: PageSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        message: &str,
        kind: StatusKind,
    ) -> StatusTicket {
        self.generation += 1;
        if let Some(node) = self.node {
            surface.set_text(node, message);
            surface.set_class_name(node, &format!("form-status {}", kind.as_str()));
            surface.set_style(node, "display", "block");
        }
        debug!(generation = self.generation, kind = kind.as_str(), "status shown");
        StatusTicket {
            generation: self.generation,
            hide_after: self.hide_after,
        }
    }

    /// Hides the region if `ticket` is still the latest display.
    pub fn expire<S: PageSurface + ?Sized>(&mut self, surface: &mut S, ticket: StatusTicket) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "ignored stale status hide"
            );
            return false;
        }
        if let Some(node) = self.node {
            surface.set_style(node, "display", "none");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use page_model::{Document, NodeSpec, PageSpec, Viewport};

    use super::*;

    #[test]
    fn only_the_latest_ticket_hides_the_region() {
        let mut document = Document::from_spec(&PageSpec {
            viewport: Viewport::default(),
            body: vec![NodeSpec::new("div").id("formStatus")],
        });
        let node = document.find("#formStatus").expect("status node");
        let mut region = StatusRegion::new(Some(node), Duration::from_secs(5));

        let first = region.show(&mut document, "Please fill in all fields.", StatusKind::Error);
        let second = region.show(&mut document, "Sent", StatusKind::Success);
        assert_eq!(second.generation, first.generation + 1);

        assert!(!region.expire(&mut document, first));
        assert_eq!(document.style(node, "display"), Some("block"));
        assert!(region.expire(&mut document, second));
        assert_eq!(document.style(node, "display"), Some("none"));
        assert_eq!(document.attribute(node, "class"), Some("form-status success"));
    }
}
