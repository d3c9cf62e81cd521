use once_cell::sync::Lazy;
use regex::Regex;
use shared::{
    domain::{ContactPayload, NodeId, StatusKind},
    error::{SubmitError, ValidationError},
    protocol::{EventKind, PageEvent, Subscription},
    surface::PageSurface,
};
use tracing::{debug, warn};

use super::{Behavior, Effect, Reaction};
use crate::{
    config::ContactConfig,
    status::{StatusRegion, StatusTicket},
};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Checks a submission in order: every field present, then the email shape.
pub fn validate_contact(
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
) -> Result<ContactPayload, ValidationError> {
    let (Some(name), Some(email), Some(message)) = (
        name.filter(|v| !v.is_empty()),
        email.filter(|v| !v.is_empty()),
        message.filter(|v| !v.is_empty()),
    ) else {
        return Err(ValidationError::MissingFields);
    };
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(ContactPayload {
        name,
        email,
        message,
    })
}

#[derive(Debug)]
pub struct ContactForm {
    form: NodeId,
    status: StatusRegion,
}

impl ContactForm {
    pub fn attach<S: PageSurface + ?Sized>(surface: &S, config: &ContactConfig) -> Option<Self> {
        let form = surface.query_one(&config.form)?;
        let status = surface.query_one(&config.status);
        if status.is_none() {
            warn!(selector = %config.status, "contact form has no status region");
        }
        Some(Self {
            form,
            status: StatusRegion::new(status, config.status_hide_after()),
        })
    }

    /// Applies the outcome of the submission seam for an accepted payload.
    pub fn finish_submission<S: PageSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        result: Result<(), SubmitError>,
    ) -> StatusTicket {
        match result {
            Ok(()) => {
                let ticket = self
                    .status
                    .show(surface, SUCCESS_MESSAGE, StatusKind::Success);
                surface.reset_form(self.form);
                ticket
            }
            Err(error) => {
                warn!(%error, "contact submission failed");
                self.status
                    .show(surface, SubmitError::USER_MESSAGE, StatusKind::Error)
            }
        }
    }

    pub fn expire_status<S: PageSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        ticket: StatusTicket,
    ) -> bool {
        self.status.expire(surface, ticket)
    }

    fn submit<S: PageSurface + ?Sized>(&mut self, surface: &mut S) -> Reaction {
        let field = |name: &str| surface.form_value(self.form, name);
        let validated = validate_contact(field("name"), field("email"), field("message"));

        match validated {
            Ok(payload) => {
                debug!(form = self.form.0, "contact form accepted");
                Reaction::prevent_default().with_effect(Effect::Submit {
                    form: self.form,
                    payload,
                })
            }
            Err(error) => {
                debug!(form = self.form.0, %error, "contact form rejected");
                let ticket = self
                    .status
                    .show(surface, &error.to_string(), StatusKind::Error);
                Reaction::prevent_default().with_effect(Effect::ScheduleStatusHide(ticket))
            }
        }
    }
}

impl Behavior for ContactForm {
    const NAME: &'static str = "contact";

    fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::Node {
            node: self.form,
            kind: EventKind::Submit,
        }]
    }

    fn handle<S: PageSurface + ?Sized>(&mut self, surface: &mut S, event: &PageEvent) -> Reaction {
        match event {
            PageEvent::Submit { form } if *form == self.form => self.submit(surface),
            _ => Reaction::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn missing_fields_win_over_email_shape() {
        assert_eq!(
            validate_contact(None, owned("not-an-email"), owned("hi")),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_contact(owned("Ada"), owned(""), owned("hi")),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn email_must_have_local_domain_and_tld() {
        for email in ["bob@@nodomain", "no-at-sign.com", "a b@example.com", "ada@example"] {
            assert_eq!(
                validate_contact(owned("Bob"), owned(email), owned("hi")),
                Err(ValidationError::InvalidEmail),
                "{email} should be rejected"
            );
        }
        for email in ["ada@example.com", "ada@mail.example.co.uk"] {
            assert!(validate_contact(owned("Ada"), owned(email), owned("hi")).is_ok());
        }
    }

    #[test]
    fn accepted_payload_keeps_fields_verbatim() {
        let payload = validate_contact(owned("Ada"), owned("ada@example.com"), owned("Hello"))
            .expect("valid payload");
        assert_eq!(
            payload,
            ContactPayload {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                message: "Hello".into(),
            }
        );
    }

    #[test]
    fn rejection_messages_match_status_copy() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Please fill in all fields."
        );
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address."
        );
    }
}
