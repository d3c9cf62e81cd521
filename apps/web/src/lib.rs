//! Browser binding: attaches the page controller to `window.document` and
//! feeds it DOM events.

use std::{cell::RefCell, rc::Rc};

use async_trait::async_trait;
use gloo::{
    events::{EventListener, EventListenerOptions},
    timers::callback::Timeout,
};
use interaction_core::{
    ContactSubmitter, ControllerConfig, Effect, EventOutcome, PageController, PageEvent,
    StatusTicket, Subscription,
};
use js_sys::Array;
use shared::{
    domain::{ContactPayload, NodeId},
    error::SubmitError,
    protocol::{EventKind, IntersectionOptions},
};
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{
    Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
};

mod surface;

pub use surface::WebSurface;

thread_local! {
    static APP: RefCell<Option<Rc<WebApp>>> = const { RefCell::new(None) };
}

/// Records accepted submissions in the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSubmitter;

#[async_trait(?Send)]
impl ContactSubmitter for ConsoleSubmitter {
    async fn submit(&self, payload: &ContactPayload) -> Result<(), SubmitError> {
        let record = serde_json::to_string(payload)
            .map_err(|err| SubmitError::Unavailable(err.to_string()))?;
        web_sys::console::log_2(&"Form submitted:".into(), &record.into());
        Ok(())
    }
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct WebApp {
    surface: RefCell<WebSurface>,
    controller: RefCell<PageController>,
    submitter: ConsoleSubmitter,
    hide_timer: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
    observers: RefCell<Vec<(IntersectionObserver, ObserverCallback)>>,
}

impl WebApp {
    fn attach(surface: WebSurface, config: &ControllerConfig) -> Rc<Self> {
        let controller = PageController::attach(&surface, config);
        let app = Rc::new(Self {
            surface: RefCell::new(surface),
            controller: RefCell::new(controller),
            submitter: ConsoleSubmitter,
            hide_timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        });
        let subscriptions = app.controller.borrow().subscriptions();
        for subscription in &subscriptions {
            app.install(subscription);
        }
        app
    }

    fn dispatch(self: &Rc<Self>, event: PageEvent) -> EventOutcome {
        let (Ok(mut controller), Ok(mut surface)) =
            (self.controller.try_borrow_mut(), self.surface.try_borrow_mut())
        else {
            warn!(kind = ?event.kind(), "dropped re-entrant page event");
            return EventOutcome::allow();
        };
        let reaction = controller.handle(&mut *surface, &event);
        drop(surface);
        drop(controller);
        if let Some(effect) = reaction.effect {
            self.apply(effect);
        }
        reaction.outcome
    }

    fn apply(self: &Rc<Self>, effect: Effect) {
        match effect {
            Effect::Submit { form, payload } => {
                debug!(form = form.0, "submitting contact form");
                let app = Rc::clone(self);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = app.submitter.submit(&payload).await;
                    let ticket = app
                        .controller
                        .borrow_mut()
                        .finish_submission(&mut *app.surface.borrow_mut(), result);
                    if let Some(ticket) = ticket {
                        app.schedule_hide(ticket);
                    }
                });
            }
            Effect::ScheduleStatusHide(ticket) => self.schedule_hide(ticket),
        }
    }

    /// Replacing the stored timeout drops, and so cancels, the previous one.
    fn schedule_hide(self: &Rc<Self>, ticket: StatusTicket) {
        let app = Rc::clone(self);
        let millis = u32::try_from(ticket.hide_after.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            app.controller
                .borrow_mut()
                .expire_status(&mut *app.surface.borrow_mut(), ticket);
        });
        *self.hide_timer.borrow_mut() = Some(timeout);
    }

    fn install(self: &Rc<Self>, subscription: &Subscription) {
        match subscription {
            Subscription::Window { kind } => self.listen_window(*kind),
            Subscription::Node { node, kind } => self.listen_node(*node, *kind),
            Subscription::Intersection { nodes, options } => self.observe(nodes, options),
        }
    }

    fn listen_window(self: &Rc<Self>, kind: EventKind) {
        let window = self.surface.borrow().window().clone();
        let app = Rc::clone(self);
        let listener = EventListener::new(&window, kind.dom_name(), move |event: &Event| {
            let page_event = {
                let surface = app.surface.borrow();
                let window = surface.window();
                match kind {
                    EventKind::PointerMove => {
                        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                            return;
                        };
                        PageEvent::PointerMove {
                            x: f64::from(mouse.client_x()),
                            y: f64::from(mouse.client_y()),
                        }
                    }
                    EventKind::Scroll => PageEvent::Scroll {
                        scroll_y: window.scroll_y().unwrap_or_default(),
                    },
                    EventKind::Resize => PageEvent::Resize {
                        width: window
                            .inner_width()
                            .ok()
                            .and_then(|width| width.as_f64())
                            .unwrap_or_default(),
                    },
                    _ => return,
                }
            };
            app.dispatch(page_event);
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn listen_node(self: &Rc<Self>, node: NodeId, kind: EventKind) {
        let Some(element) = self.surface.borrow().element(node) else {
            return;
        };
        let page_event = match kind {
            EventKind::PointerEnter => PageEvent::PointerEnter { target: node },
            EventKind::PointerLeave => PageEvent::PointerLeave { target: node },
            EventKind::Click => PageEvent::Click { target: node },
            EventKind::Submit => PageEvent::Submit { form: node },
            _ => return,
        };
        let app = Rc::clone(self);
        let listener = EventListener::new_with_options(
            &element,
            kind.dom_name(),
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                if app.dispatch(page_event.clone()).default_prevented {
                    event.prevent_default();
                }
            },
        );
        self.listeners.borrow_mut().push(listener);
    }

    fn observe(self: &Rc<Self>, nodes: &[NodeId], options: &IntersectionOptions) {
        let app = Rc::clone(self);
        let callback: ObserverCallback =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let Some(target) = app.surface.borrow().node_of(&entry.target()) else {
                        continue;
                    };
                    app.dispatch(PageEvent::Intersection {
                        target,
                        ratio: entry.intersection_ratio(),
                        is_intersecting: entry.is_intersecting(),
                    });
                }
            });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = match IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => observer,
            Err(error) => {
                warn!(?error, "intersection observer unavailable");
                return;
            }
        };
        let surface = self.surface.borrow();
        for node in nodes {
            if let Some(element) = surface.element(*node) {
                observer.observe(&element);
            }
        }
        drop(surface);
        self.observers.borrow_mut().push((observer, callback));
    }
}

fn attach_to_document() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let app = WebApp::attach(
        WebSurface::new(window, document),
        &ControllerConfig::default(),
    );
    APP.with(|slot| *slot.borrow_mut() = Some(app));
}

/// Attaches once the document is interactive.
#[wasm_bindgen(start)]
pub fn start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        attach_to_document();
        return;
    }
    EventListener::once(&document, "DOMContentLoaded", |_event| attach_to_document()).forget();
}
