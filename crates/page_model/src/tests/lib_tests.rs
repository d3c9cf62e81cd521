use super::*;

fn contact_page() -> Document {
    Document::from_spec(&PageSpec {
        viewport: Viewport::default(),
        body: vec![
            NodeSpec::new("header").class("header").at(0.0, 80.0),
            NodeSpec::new("section").id("about").class("reveal").at(1200.0, 400.0),
            NodeSpec::new("form").id("contactForm").children([
                NodeSpec::new("input").attr("name", "name"),
                NodeSpec::new("input").attr("name", "email").value("prefill@example.com"),
                NodeSpec::new("textarea").attr("name", "message"),
                NodeSpec::new("div").id("formStatus").class("form-status"),
            ]),
        ],
    })
}

#[test]
fn finds_nodes_in_document_order() {
    let document = contact_page();
    let inputs = document.find_all("input, textarea").expect("query");
    assert_eq!(inputs.len(), 3);
    assert!(inputs.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(document.tag(inputs[2]), Some("textarea"));
}

#[test]
fn find_reports_missing_and_invalid_selectors() {
    let document = contact_page();
    assert!(matches!(
        document.find("#missing-id"),
        Err(PageError::NoMatch(selector)) if selector == "#missing-id"
    ));
    assert!(matches!(document.find("ul >"), Err(PageError::Selector(_))));
}

#[test]
fn class_edits_keep_the_class_attribute_consistent() {
    let mut document = contact_page();
    let header = document.find(".header").expect("header");

    document.add_class(header, "scrolled");
    document.add_class(header, "scrolled");
    assert_eq!(document.classes(header), vec!["header", "scrolled"]);
    assert_eq!(document.attribute(header, "class"), Some("header scrolled"));

    document.remove_class(header, "scrolled");
    assert_eq!(document.classes(header), vec!["header"]);

    document.set_class_name(header, "form-status error");
    assert!(document.has_class(header, "error"));
    assert!(!document.has_class(header, "header"));
}

#[test]
fn empty_style_value_removes_the_property() {
    let mut document = contact_page();
    let body = document.body_id();
    document.set_style(body, "overflow", "hidden");
    assert_eq!(document.style(body, "overflow"), Some("hidden"));
    document.set_style(body, "overflow", "");
    assert_eq!(document.style(body, "overflow"), None);
}

#[test]
fn form_values_and_reset_follow_control_defaults() {
    let mut document = contact_page();
    let form = document.find("#contactForm").expect("form");
    let name = document.find("input[name=\"name\"]").expect("name input");

    assert_eq!(document.form_value(form, "name"), Some(String::new()));
    assert_eq!(document.form_value(form, "phone"), None);

    document.set_value(name, "Ada").expect("set value");
    assert_eq!(document.form_value(form, "name"), Some("Ada".to_string()));

    document.reset_form(form);
    assert_eq!(document.form_value(form, "name"), Some(String::new()));
    assert_eq!(
        document.form_value(form, "email"),
        Some("prefill@example.com".to_string())
    );
}

#[test]
fn bounding_top_and_scroll_requests_track_viewport() {
    let mut document = contact_page();
    let about = document.find("#about").expect("about");
    assert_eq!(document.bounding_top(about), 1200.0);

    document.scroll_to(300.0, ScrollBehavior::Smooth);
    assert_eq!(document.scroll_offset(), 300.0);
    assert_eq!(document.bounding_top(about), 900.0);
    assert_eq!(
        document.scroll_requests(),
        &[ScrollRequest {
            top: 300.0,
            behavior: ScrollBehavior::Smooth
        }]
    );

    document.scroll_to(-50.0, ScrollBehavior::Instant);
    assert_eq!(document.scroll_offset(), 0.0);
}

#[test]
fn intersection_ratio_reflects_visible_fraction() {
    let mut document = contact_page();
    let about = document.find("#about").expect("about");
    assert_eq!(document.intersection(about), (0.0, false));

    document.set_scroll_y(500.0);
    let (ratio, intersecting) = document.intersection(about);
    assert!(intersecting);
    assert!((ratio - 0.25).abs() < f64::EPSILON);

    document.set_scroll_y(1200.0);
    assert_eq!(document.intersection(about), (1.0, true));
}

#[test]
fn translate_animation_fills_forwards() {
    let mut document = contact_page();
    let header = document.find(".header").expect("header");
    document.animate_translate(header, Point::new(10.0, 20.0), Duration::from_millis(400));
    assert_eq!(document.style(header, "translate"), Some("10px 20px"));
    assert_eq!(document.animations()[0].duration_ms, 400);
}

#[test]
fn page_spec_loads_from_toml_fixture() {
    let spec: PageSpec = toml::from_str(
        r##"
        [viewport]
        width = 390.0
        height = 844.0

        [[body]]
        tag = "button"
        class = "hamburger"
        attributes = { "aria-expanded" = "false" }

        [[body]]
        tag = "nav"
        class = "navbar"
        "##,
    )
    .expect("fixture should parse");
    let document = Document::from_spec(&spec);
    assert_eq!(document.viewport().width, 390.0);
    let toggle = document.find(".hamburger").expect("toggle");
    assert_eq!(document.attribute(toggle, "aria-expanded"), Some("false"));
}
