use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::selector::Selector;

/// Every constant the behavior units use, overridable from settings files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub cursor: CursorConfig,
    pub reveal: RevealConfig,
    pub header: HeaderConfig,
    pub filter: FilterConfig,
    pub contact: ContactConfig,
    pub menu: MenuConfig,
    pub anchors: AnchorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub dot: Selector,
    pub outline: Selector,
    pub interactive: Selector,
    pub trail_ms: u64,
    pub rest_size_px: f64,
    pub hover_size_px: f64,
    pub hover_background: String,
}

impl CursorConfig {
    pub fn trail(&self) -> Duration {
        Duration::from_millis(self.trail_ms)
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            dot: selector("#cursor-dot"),
            outline: selector("#cursor-outline"),
            interactive: selector(
                "a, button, .work-card, .service-card, .solution-card, input, textarea",
            ),
            trail_ms: 400,
            rest_size_px: 40.0,
            hover_size_px: 60.0,
            hover_background: "rgba(99, 102, 241, 0.1)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub targets: Selector,
    pub threshold: f64,
    pub root_margin: String,
    pub active_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            targets: selector(".reveal"),
            threshold: 0.15,
            root_margin: "0px".into(),
            active_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub header: Selector,
    pub threshold_px: f64,
    pub scrolled_class: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            header: selector(".header"),
            threshold_px: 100.0,
            scrolled_class: "scrolled".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub buttons: Selector,
    pub items: Selector,
    pub filter_attribute: String,
    pub category_attribute: String,
    pub active_class: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            buttons: selector(".filter-btn"),
            items: selector(".work-item"),
            filter_attribute: "data-filter".into(),
            category_attribute: "data-category".into(),
            active_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form: Selector,
    pub status: Selector,
    pub status_hide_after_ms: u64,
}

impl ContactConfig {
    pub fn status_hide_after(&self) -> Duration {
        Duration::from_millis(self.status_hide_after_ms)
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form: selector("#contactForm"),
            status: selector("#formStatus"),
            status_hide_after_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle: Selector,
    pub panel: Selector,
    pub links: Selector,
    pub breakpoint_px: f64,
    pub active_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle: selector(".hamburger"),
            panel: selector(".navbar"),
            links: selector(".nav-links li a"),
            breakpoint_px: 1024.0,
            active_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub anchors: Selector,
    pub header_offset_px: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            anchors: selector("a[href^=\"#\"]"),
            header_offset_px: 80.0,
        }
    }
}

fn selector(raw: &str) -> Selector {
    Selector::parse(raw).expect("valid built-in selector")
}
