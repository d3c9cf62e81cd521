use std::{fmt, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use interaction_core::{ContactSubmitter, ControllerConfig, EventLoop, PageEvent, PageSurface};
use page_model::{Browser, Document, PageSpec, ScrollRequest};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{MenuState, NodeId},
    selector::Selector,
};
use tracing::{debug, info};

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Scroll { y: f64 },
    Resize { width: f64 },
    PointerMove { x: f64, y: f64 },
    Hover { selector: String },
    Unhover { selector: String },
    Click { selector: String },
    Fill { selector: String, value: String },
    Submit { selector: String },
    Wait { ms: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub text: String,
    pub class_name: String,
    pub visible: bool,
}

/// Page state after a replay, keyed by element ids where the markup has them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub active_units: Vec<&'static str>,
    pub steps: usize,
    pub prevented_defaults: usize,
    pub scroll_y: f64,
    pub header_scrolled: Option<bool>,
    pub menu: Option<MenuState>,
    pub filter: Option<String>,
    pub visible_items: Vec<String>,
    pub revealed: Vec<String>,
    pub status: Option<StatusSnapshot>,
    pub scroll_requests: Vec<ScrollRequest>,
    pub status_hide_pending: bool,
}

pub fn load_page(path: &Path) -> Result<PageSpec> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read page fixture '{}'", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let spec = if is_json {
        serde_json::from_str(&raw).map_err(anyhow::Error::from)
    } else {
        toml::from_str(&raw).map_err(anyhow::Error::from)
    };
    spec.with_context(|| format!("invalid page fixture '{}'", path.display()))
}

pub fn load_script(path: &Path) -> Result<Script> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid script '{}'", path.display()))
}

struct Replay<C> {
    event_loop: EventLoop<Document, C>,
    browser: Browser,
    prevented_defaults: usize,
}

impl<C: ContactSubmitter + 'static> Replay<C> {
    fn deliver(&mut self, events: Vec<PageEvent>) {
        let mut pending = events;
        // Programmatic scrolls feed back as scroll and intersection events.
        while !pending.is_empty() {
            for event in pending {
                let outcome = self.event_loop.dispatch(event);
                if outcome.default_prevented {
                    self.prevented_defaults += 1;
                }
            }
            pending = self.browser.sync(self.event_loop.surface());
        }
    }

    fn resolve(&self, selector: &str) -> Result<NodeId> {
        Ok(self.event_loop.surface().find(selector)?)
    }

    async fn perform(&mut self, step: &Step) -> Result<()> {
        let events = match step {
            Step::Scroll { y } => self.browser.scroll(self.event_loop.surface_mut(), *y),
            Step::Resize { width } => self.browser.resize(self.event_loop.surface_mut(), *width),
            Step::PointerMove { x, y } => self.browser.move_pointer(*x, *y),
            Step::Hover { selector } => self.browser.hover(self.resolve(selector)?),
            Step::Unhover { selector } => self.browser.unhover(self.resolve(selector)?),
            Step::Click { selector } => {
                let target = self.resolve(selector)?;
                self.browser.click(self.event_loop.surface(), target)
            }
            Step::Fill { selector, value } => {
                let control = self.resolve(selector)?;
                self.browser
                    .fill(self.event_loop.surface_mut(), control, value)?;
                Vec::new()
            }
            Step::Submit { selector } => self.browser.submit(self.resolve(selector)?),
            Step::Wait { ms } => {
                self.event_loop.idle(Duration::from_millis(*ms)).await;
                Vec::new()
            }
        };
        debug!(?step, events = events.len(), "replaying step");
        self.deliver(events);
        Ok(())
    }

    fn report(&self, config: &ControllerConfig, steps: usize) -> ReplayReport {
        let document = self.event_loop.surface();
        let controller = self.event_loop.controller();
        let status = document
            .query_one(&config.contact.status)
            .map(|node| StatusSnapshot {
                text: document.text(node).unwrap_or_default().to_string(),
                class_name: document.attribute(node, "class").unwrap_or_default().to_string(),
                visible: document.style(node, "display") == Some("block"),
            });
        ReplayReport {
            active_units: controller.active_units(),
            steps,
            prevented_defaults: self.prevented_defaults,
            scroll_y: document.viewport().scroll_y,
            header_scrolled: controller.header().map(|header| header.is_scrolled()),
            menu: controller.menu().map(|menu| menu.state()),
            filter: controller.filter().map(|filter| filter.selection().to_string()),
            visible_items: visible_items(document, &config.filter.items),
            revealed: controller
                .reveal()
                .map(|reveal| reveal.revealed().map(|node| label(document, node)).collect())
                .unwrap_or_default(),
            status,
            scroll_requests: document.scroll_requests().to_vec(),
            status_hide_pending: self.event_loop.has_pending_hide(),
        }
    }
}

/// Drives `script` against a fresh document built from `page`.
pub async fn run_replay<C: ContactSubmitter + 'static>(
    page: &PageSpec,
    script: &Script,
    config: &ControllerConfig,
    submitter: C,
) -> Result<ReplayReport> {
    let event_loop = EventLoop::attach(Document::from_spec(page), config, submitter);
    let browser = Browser::new(&event_loop.subscriptions());
    let mut replay = Replay {
        event_loop,
        browser,
        prevented_defaults: 0,
    };
    let initial = replay
        .browser
        .intersection_events(replay.event_loop.surface());
    replay.deliver(initial);

    for (index, step) in script.steps.iter().enumerate() {
        replay
            .perform(step)
            .await
            .with_context(|| format!("step {} ({step:?}) failed", index + 1))?;
    }

    replay.event_loop.finish_submissions().await;
    let report = replay.report(config, script.steps.len());
    info!(
        steps = report.steps,
        prevented = report.prevented_defaults,
        "replay finished"
    );
    Ok(report)
}

fn visible_items(document: &Document, items: &Selector) -> Vec<String> {
    document
        .query_all(items)
        .into_iter()
        .filter(|item| document.style(*item, "display") != Some("none"))
        .map(|item| label(document, item))
        .collect()
}

fn label(document: &Document, node: NodeId) -> String {
    match document.attribute(node, "id") {
        Some(id) => format!("#{id}"),
        None => format!("{}@{}", document.tag(node).unwrap_or("node"), node.0),
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "units: {}", self.active_units.join(", "))?;
        writeln!(
            f,
            "steps: {} (default prevented {} times)",
            self.steps, self.prevented_defaults
        )?;
        writeln!(f, "scroll_y: {}", self.scroll_y)?;
        if let Some(scrolled) = self.header_scrolled {
            writeln!(f, "header scrolled: {scrolled}")?;
        }
        if let Some(menu) = self.menu {
            writeln!(f, "menu: {}", if menu.is_open() { "open" } else { "closed" })?;
        }
        if let Some(filter) = &self.filter {
            writeln!(f, "filter: {filter} -> {}", self.visible_items.join(" "))?;
        }
        writeln!(f, "revealed: {}", self.revealed.join(" "))?;
        if let Some(status) = &self.status {
            let state = if status.visible { "shown" } else { "hidden" };
            writeln!(f, "status ({state}, {}): {}", status.class_name, status.text)?;
        }
        for request in &self.scroll_requests {
            writeln!(f, "scroll request: {} ({:?})", request.top, request.behavior)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/replay_tests.rs"]
mod tests;
