use std::time::Duration;

use crate::{
    domain::{NodeId, Point, ScrollBehavior},
    selector::Selector,
};

/// The document operations behavior units are allowed to perform.
///
/// Implemented by the in-memory page model and by the browser binding. Node
/// handles that no longer resolve are ignored by setters and read as absent.
pub trait PageSurface {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    fn query_one(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn body(&self) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn set_class_name(&mut self, node: NodeId, class_name: &str);

    /// Sets an inline style property; an empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Animates the `translate` property toward `to`, replacing any running
    /// translate animation on the node and holding the final value.
    fn animate_translate(&mut self, node: NodeId, to: Point, duration: Duration);

    /// Value of the named control inside `form`, `None` when no such control exists.
    fn form_value(&self, form: NodeId, field: &str) -> Option<String>;
    fn reset_form(&mut self, form: NodeId);

    /// Distance from the viewport top to the node's top edge.
    fn bounding_top(&self, node: NodeId) -> f64;
    fn scroll_offset(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}
