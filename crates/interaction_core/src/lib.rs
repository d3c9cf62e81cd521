//! Interaction controller for the portfolio page.
//!
//! [`PageController`] attaches the behavior units to anything implementing
//! [`PageSurface`] and handles [`PageEvent`]s synchronously, so a browser
//! listener can decide `preventDefault` inline. [`EventLoop`] drives the same
//! controller natively and owns the async submission and status timer.

pub mod config;
pub mod controller;
#[cfg(feature = "runtime")]
pub mod event_loop;
pub mod status;
pub mod submit;
pub mod units;

pub use config::ControllerConfig;
pub use controller::PageController;
#[cfg(feature = "runtime")]
pub use event_loop::EventLoop;
pub use shared::{
    protocol::{EventOutcome, PageEvent, Subscription},
    surface::PageSurface,
};
pub use status::{StatusRegion, StatusTicket};
pub use submit::{ContactSubmitter, LoggingSubmitter};
#[cfg(feature = "http-submit")]
pub use submit::HttpSubmitter;
pub use units::{Behavior, Effect, Reaction};
