use super::*;
use page_model::{Document, NodeSpec, PageSpec};
use shared::{
    domain::{ContactPayload, FilterTag, MenuState, NodeId, ScrollBehavior},
    protocol::EventKind,
};

use crate::units::{contact::SUCCESS_MESSAGE, Effect};

const PORTFOLIO: &str = include_str!("../../tests/fixtures/portfolio.json");

fn portfolio() -> Document {
    let spec: PageSpec = serde_json::from_str(PORTFOLIO).expect("portfolio fixture");
    Document::from_spec(&spec)
}

fn attached() -> (Document, PageController) {
    let document = portfolio();
    let controller = PageController::attach(&document, &ControllerConfig::default());
    (document, controller)
}

fn node(document: &Document, selector: &str) -> NodeId {
    document.find(selector).expect(selector)
}

fn fill_contact(document: &mut Document, name: &str, email: &str, message: &str) {
    for (field, value) in [
        ("#field-name", name),
        ("#field-email", email),
        ("#field-message", message),
    ] {
        let control = node(document, field);
        document.set_value(control, value).expect("fill field");
    }
}

#[test]
fn attaches_every_unit_on_the_full_page() {
    let (_, controller) = attached();
    assert_eq!(
        controller.active_units(),
        vec!["cursor", "reveal", "header", "filter", "contact", "menu", "anchors"]
    );
}

#[test]
fn units_without_markup_are_skipped() {
    let empty = Document::default();
    let controller = PageController::attach(&empty, &ControllerConfig::default());
    assert!(controller.active_units().is_empty());
    assert!(controller.subscriptions().is_empty());

    let dot_only = Document::from_spec(&PageSpec {
        body: vec![
            NodeSpec::new("div").id("cursor-dot"),
            NodeSpec::new("header").class("header"),
        ],
        ..PageSpec::default()
    });
    let controller = PageController::attach(&dot_only, &ControllerConfig::default());
    assert_eq!(controller.active_units(), vec!["header"]);
}

#[test]
fn shared_listeners_are_installed_once() {
    let (document, controller) = attached();
    let link = node(&document, "#nav-work");
    let subscriptions = controller.subscriptions();
    let link_clicks = subscriptions
        .iter()
        .filter(|subscription| {
            **subscription
                == Subscription::Node {
                    node: link,
                    kind: EventKind::Click,
                }
        })
        .count();
    assert_eq!(link_clicks, 1);
    assert!(subscriptions.contains(&Subscription::Window {
        kind: EventKind::PointerMove
    }));
}

#[test]
fn pointer_move_places_dot_and_animates_outline() {
    let (mut document, mut controller) = attached();
    let reaction = controller.handle(&mut document, &PageEvent::PointerMove { x: 12.0, y: 40.5 });
    assert_eq!(reaction, Reaction::ignored());

    let dot = node(&document, "#cursor-dot");
    let outline = node(&document, "#cursor-outline");
    assert_eq!(document.style(dot, "translate"), Some("12px 40.5px"));
    let animation = document.animations().last().expect("outline animation");
    assert_eq!(animation.node, outline);
    assert_eq!(animation.duration_ms, 400);
}

#[test]
fn hovering_interactive_elements_grows_outline() {
    let (mut document, mut controller) = attached();
    let card = node(&document, "#service-web");
    let dot = node(&document, "#cursor-dot");
    let outline = node(&document, "#cursor-outline");

    controller.handle(&mut document, &PageEvent::PointerEnter { target: card });
    assert_eq!(document.style(outline, "width"), Some("60px"));
    assert_eq!(document.style(outline, "height"), Some("60px"));
    assert_eq!(
        document.style(outline, "background-color"),
        Some("rgba(99, 102, 241, 0.1)")
    );
    assert_eq!(document.style(dot, "opacity"), Some("0"));
    assert!(controller.cursor().expect("cursor").is_hovering());

    controller.handle(&mut document, &PageEvent::PointerLeave { target: card });
    assert_eq!(document.style(outline, "width"), Some("40px"));
    assert_eq!(document.style(outline, "background-color"), Some("transparent"));
    assert_eq!(document.style(dot, "opacity"), Some("1"));
}

#[test]
fn header_threshold_is_strictly_greater_than_100() {
    let (mut document, mut controller) = attached();
    let header = node(&document, ".header");

    controller.handle(&mut document, &PageEvent::Scroll { scroll_y: 100.0 });
    assert!(!document.has_class(header, "scrolled"));

    controller.handle(&mut document, &PageEvent::Scroll { scroll_y: 101.0 });
    assert!(document.has_class(header, "scrolled"));

    controller.handle(&mut document, &PageEvent::Scroll { scroll_y: 40.0 });
    assert!(!document.has_class(header, "scrolled"));
    assert!(!controller.header().expect("header").is_scrolled());
}

#[test]
fn filter_shows_matching_items_and_keeps_one_active_control() {
    let (mut document, mut controller) = attached();
    let frontend = node(&document, "#filter-frontend");
    let all = node(&document, "#filter-all");
    let items = document.find_all(".work-item").expect("items");
    let buttons = document.find_all(".filter-btn").expect("buttons");

    controller.handle(&mut document, &PageEvent::Click { target: frontend });
    let displays: Vec<_> = items
        .iter()
        .map(|item| document.style(*item, "display"))
        .collect();
    assert_eq!(displays, vec![Some("block"), Some("none"), Some("block")]);
    let active: Vec<_> = buttons
        .iter()
        .filter(|button| document.has_class(**button, "active"))
        .collect();
    assert_eq!(active, vec![&frontend]);
    assert_eq!(
        controller.filter().expect("filter").selection(),
        &FilterTag::Category("frontend".into())
    );

    controller.handle(&mut document, &PageEvent::Click { target: all });
    assert!(items
        .iter()
        .all(|item| document.style(*item, "display") == Some("block")));
    assert_eq!(controller.filter().expect("filter").selection(), &FilterTag::All);
}

#[test]
fn reveal_is_monotonic_and_respects_threshold() {
    let (mut document, mut controller) = attached();
    let work = node(&document, "#work");

    controller.handle(
        &mut document,
        &PageEvent::Intersection {
            target: work,
            ratio: 0.1,
            is_intersecting: true,
        },
    );
    assert!(!document.has_class(work, "active"));

    controller.handle(
        &mut document,
        &PageEvent::Intersection {
            target: work,
            ratio: 0.4,
            is_intersecting: true,
        },
    );
    assert!(document.has_class(work, "active"));

    controller.handle(
        &mut document,
        &PageEvent::Intersection {
            target: work,
            ratio: 0.0,
            is_intersecting: false,
        },
    );
    assert!(document.has_class(work, "active"));
    assert_eq!(document.classes(work), vec!["work", "reveal", "active"]);
    assert!(controller.reveal().expect("reveal").is_revealed(work));
}

#[test]
fn anchor_scrolls_below_the_fixed_header() {
    let (mut document, mut controller) = attached();
    document.set_scroll_y(300.0);
    let link = node(&document, "#nav-work");

    let reaction = controller.handle(&mut document, &PageEvent::Click { target: link });
    assert!(reaction.outcome.default_prevented);
    let request = document.scroll_requests().last().expect("scroll request");
    assert_eq!(request.top, 1520.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);
}

#[test]
fn bare_hash_anchor_keeps_default_navigation() {
    let (mut document, mut controller) = attached();
    let logo = node(&document, "#logo");
    let reaction = controller.handle(&mut document, &PageEvent::Click { target: logo });
    assert!(!reaction.outcome.default_prevented);
    assert!(document.scroll_requests().is_empty());
}

#[test]
fn missing_anchor_target_prevents_default_without_scrolling() {
    let (mut document, mut controller) = attached();
    let broken = node(&document, "#broken");
    let reaction = controller.handle(&mut document, &PageEvent::Click { target: broken });
    assert!(reaction.outcome.default_prevented);
    assert!(document.scroll_requests().is_empty());
    assert_eq!(document.viewport().scroll_y, 0.0);
}

#[test]
fn anchor_to_digit_leading_id_is_not_a_target() {
    let mut document = Document::from_spec(&PageSpec {
        body: vec![
            NodeSpec::new("a").id("jump").attr("href", "#1abc"),
            NodeSpec::new("section").id("1abc").at(900.0, 400.0),
        ],
        ..PageSpec::default()
    });
    let mut controller = PageController::attach(&document, &ControllerConfig::default());
    let link = node(&document, "#jump");

    let reaction = controller.handle(&mut document, &PageEvent::Click { target: link });
    assert!(reaction.outcome.default_prevented);
    assert!(document.scroll_requests().is_empty());
}

#[test]
fn menu_toggle_keeps_toggle_panel_and_body_in_lockstep() {
    let (mut document, mut controller) = attached();
    let toggle = node(&document, ".hamburger");
    let panel = node(&document, ".navbar");
    let body = document.body_id();

    controller.handle(&mut document, &PageEvent::Click { target: toggle });
    assert!(document.has_class(toggle, "active"));
    assert!(document.has_class(panel, "active"));
    assert_eq!(document.attribute(toggle, "aria-expanded"), Some("true"));
    assert_eq!(document.style(body, "overflow"), Some("hidden"));

    controller.handle(&mut document, &PageEvent::Click { target: toggle });
    assert!(!document.has_class(toggle, "active"));
    assert!(!document.has_class(panel, "active"));
    assert_eq!(document.attribute(toggle, "aria-expanded"), Some("false"));
    assert_eq!(document.style(body, "overflow"), None);
}

#[test]
fn nav_link_click_closes_menu_and_scrolls() {
    let (mut document, mut controller) = attached();
    let toggle = node(&document, ".hamburger");
    let link = node(&document, "#nav-contact");

    controller.handle(&mut document, &PageEvent::Click { target: toggle });
    let reaction = controller.handle(&mut document, &PageEvent::Click { target: link });
    assert!(reaction.outcome.default_prevented);
    assert_eq!(controller.menu().expect("menu").state(), MenuState::Closed);
    assert!(!document.has_class(node(&document, ".navbar"), "active"));
    assert_eq!(document.viewport().scroll_y, 2720.0);
}

#[test]
fn resize_closes_open_menu_only_from_the_breakpoint_up() {
    let (mut document, mut controller) = attached();
    let toggle = node(&document, ".hamburger");

    controller.handle(&mut document, &PageEvent::Click { target: toggle });
    controller.handle(&mut document, &PageEvent::Resize { width: 1023.0 });
    assert_eq!(controller.menu().expect("menu").state(), MenuState::Open);

    controller.handle(&mut document, &PageEvent::Resize { width: 1024.0 });
    assert_eq!(controller.menu().expect("menu").state(), MenuState::Closed);
    assert_eq!(document.attribute(toggle, "aria-expanded"), Some("false"));
}

#[test]
fn invalid_submission_shows_error_and_schedules_hide() {
    let (mut document, mut controller) = attached();
    let form = node(&document, "#contactForm");
    let status = node(&document, "#formStatus");
    fill_contact(&mut document, "Bob", "bob@@nodomain", "Hi");

    let reaction = controller.handle(&mut document, &PageEvent::Submit { form });
    assert!(reaction.outcome.default_prevented);
    assert!(matches!(
        reaction.effect,
        Some(Effect::ScheduleStatusHide(ticket)) if ticket.hide_after.as_millis() == 5000
    ));
    assert_eq!(
        document.text(status),
        Some("Please enter a valid email address.")
    );
    assert_eq!(document.attribute(status, "class"), Some("form-status error"));
    assert_eq!(document.style(status, "display"), Some("block"));
    assert_eq!(
        document.value(node(&document, "#field-email")),
        Some("bob@@nodomain")
    );
}

#[test]
fn valid_submission_hands_payload_to_the_seam() {
    let (mut document, mut controller) = attached();
    let form = node(&document, "#contactForm");
    fill_contact(&mut document, "Ada", "ada@example.com", "Hello");

    let reaction = controller.handle(&mut document, &PageEvent::Submit { form });
    assert!(reaction.outcome.default_prevented);
    assert_eq!(
        reaction.effect,
        Some(Effect::Submit {
            form,
            payload: ContactPayload {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                message: "Hello".into(),
            },
        })
    );
}

#[test]
fn finished_submission_resets_only_on_success() {
    let (mut document, mut controller) = attached();
    let status = node(&document, "#formStatus");
    let name = node(&document, "#field-name");
    fill_contact(&mut document, "Ada", "ada@example.com", "Hello");

    let failed = controller
        .finish_submission(&mut document, Err(SubmitError::Rejected { status: 502 }))
        .expect("contact attached");
    assert_eq!(document.text(status), Some(SubmitError::USER_MESSAGE));
    assert_eq!(document.attribute(status, "class"), Some("form-status error"));
    assert_eq!(document.value(name), Some("Ada"));

    let succeeded = controller
        .finish_submission(&mut document, Ok(()))
        .expect("contact attached");
    assert_eq!(document.text(status), Some(SUCCESS_MESSAGE));
    assert_eq!(document.attribute(status, "class"), Some("form-status success"));
    assert_eq!(document.value(name), Some(""));

    assert!(!controller.expire_status(&mut document, failed));
    assert_eq!(document.style(status, "display"), Some("block"));
    assert!(controller.expire_status(&mut document, succeeded));
    assert_eq!(document.style(status, "display"), Some("none"));
}
