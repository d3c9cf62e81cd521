use std::{cell::RefCell, time::Duration};

use js_sys::{Array, Function, Object, Reflect};
use shared::{
    domain::{NodeId, Point, ScrollBehavior},
    selector::Selector,
    surface::PageSurface,
};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, ScrollBehavior as DomScrollBehavior, ScrollToOptions, Window,
};

/// [`PageSurface`] over the live DOM. Elements get a stable [`NodeId`] the
/// first time a query returns them.
pub struct WebSurface {
    window: Window,
    document: Document,
    nodes: RefCell<Vec<Element>>,
}

impl WebSurface {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            nodes: RefCell::new(Vec::new()),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.index()).cloned()
    }

    /// `None` only once the registry has run out of ids.
    pub fn node_of(&self, element: &Element) -> Option<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|known| known == element) {
            return NodeId::from_index(index);
        }
        let id = NodeId::from_index(nodes.len())?;
        nodes.push(element.clone());
        Some(id)
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }
}

impl PageSurface for WebSurface {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let Ok(list) = self.document.query_selector_all(&selector.to_string()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|element| self.node_of(&element))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        let body: Element = self.document.body()?.into();
        self.node_of(&body)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            let _ = element.class_list().remove_1(class);
        }
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.element(node) {
            element.set_class_name(class_name);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(error) = result {
            warn!(property, ?error, "failed to update inline style");
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn animate_translate(&mut self, node: NodeId, to: Point, duration: Duration) {
        let Some(element) = self.element(node) else {
            return;
        };
        let frame = Object::new();
        let options = Object::new();
        let animate = Reflect::set(
            &frame,
            &"translate".into(),
            &to.translate_value().into(),
        )
        .and_then(|_| {
            Reflect::set(
                &options,
                &"duration".into(),
                &JsValue::from_f64(duration.as_millis() as f64),
            )
        })
        .and_then(|_| Reflect::set(&options, &"fill".into(), &"forwards".into()))
        .and_then(|_| Reflect::get(&element, &"animate".into()))
        .and_then(|animate| animate.dyn_into::<Function>())
        .and_then(|animate| animate.call2(&element, &Array::of1(&frame), &options));
        if let Err(error) = animate {
            warn!(?error, "outline animation failed");
        }
    }

    fn form_value(&self, form: NodeId, field: &str) -> Option<String> {
        let control = self
            .element(form)?
            .query_selector(&format!("[name=\"{field}\"]"))
            .ok()??;
        if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(textarea) = control.dyn_ref::<HtmlTextAreaElement>() {
            return Some(textarea.value());
        }
        control
            .dyn_ref::<HtmlSelectElement>()
            .map(HtmlSelectElement::value)
    }

    fn reset_form(&mut self, form: NodeId) {
        if let Some(form) = self
            .element(form)
            .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }

    fn bounding_top(&self, node: NodeId) -> f64 {
        self.element(node)
            .map(|element| element.get_bounding_client_rect().top())
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => DomScrollBehavior::Smooth,
            ScrollBehavior::Instant => DomScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}
