//! Contact form validation and the send lifecycle.

use crate::config::ContactConfig;
use crate::error::FormError;
use crate::notify::NotificationCenter;
use crate::submit::{SubmitOutcome, Submitter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use std::rc::Rc;

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const SENT_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const FAILED_MESSAGE: &str = "Message could not be sent. Please try again.";

pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Checks run in order: every field present, email shape, message length.
    pub fn validate(&self, min_message_chars: usize) -> Result<(), FormError> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(FormError::MissingField);
        }
        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }
        // Counted in UTF-16 units, as the browser measures form input.
        if self.message.encode_utf16().count() < min_message_chars {
            return Err(FormError::MessageTooShort {
                min: min_message_chars,
            });
        }
        Ok(())
    }
}

/// What the view should do with the form and its submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// Disable the button and show the sending label.
    Sending,
    /// Clear the fields and restore the button.
    Sent,
    /// Restore the button, keep the fields.
    Failed,
}

pub struct ContactForm {
    config: ContactConfig,
    submitter: Rc<dyn Submitter<ContactMessage>>,
    notifications: NotificationCenter,
    sending: Rc<Cell<bool>>,
}

impl ContactForm {
    pub fn new(
        config: ContactConfig,
        submitter: Rc<dyn Submitter<ContactMessage>>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            config,
            submitter,
            notifications,
            sending: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending.get()
    }

    /// Validate and send. Invalid input raises an error notification and
    /// changes nothing else. A submit while a send is in flight is ignored.
    pub fn submit(
        &self,
        message: ContactMessage,
        on_event: impl Fn(FormEvent) + 'static,
    ) -> Result<(), FormError> {
        if self.sending.get() {
            log::debug!("Ignoring submit while a message is in flight");
            return Ok(());
        }
        if let Err(err) = message.validate(self.config.min_message_chars) {
            self.notifications.error(err.to_string());
            return Err(err);
        }

        self.sending.set(true);
        on_event(FormEvent::Sending);

        let sending = Rc::clone(&self.sending);
        let notifications = self.notifications.clone();
        self.submitter.submit(
            message,
            Box::new(move |outcome| {
                sending.set(false);
                match outcome {
                    SubmitOutcome::Success => {
                        notifications.success(SENT_MESSAGE);
                        on_event(FormEvent::Sent);
                    }
                    SubmitOutcome::Failure => {
                        notifications.error(FAILED_MESSAGE);
                        on_event(FormEvent::Failed);
                    }
                }
            }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::notify::NotificationKind;
    use crate::schedule::ManualClock;
    use crate::submit::SimulatedSubmitter;
    use std::cell::RefCell;

    fn valid() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "I enjoyed your portfolio.".to_string(),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn test_validation_order() {
        let mut m = valid();
        m.subject.clear();
        m.email = "broken".to_string();
        assert_eq!(m.validate(10), Err(FormError::MissingField));

        let mut m = valid();
        m.email = "broken".to_string();
        m.message = "short".to_string();
        assert_eq!(m.validate(10), Err(FormError::InvalidEmail));

        let mut m = valid();
        m.message = "short".to_string();
        assert_eq!(m.validate(10), Err(FormError::MessageTooShort { min: 10 }));
        assert_eq!(
            FormError::MessageTooShort { min: 10 }.to_string(),
            "Message must be at least 10 characters long"
        );

        assert_eq!(valid().validate(10), Ok(()));
    }

    #[test]
    fn test_message_length_counts_utf16_units() {
        let mut m = valid();
        m.message = "héllo wörld".to_string();
        assert_eq!(m.validate(11), Ok(()), "accented letters are one unit each");
        assert_eq!(m.validate(12), Err(FormError::MessageTooShort { min: 12 }));

        m.message = "🎉🎉🎉🎉🎉".to_string();
        assert_eq!(m.validate(10), Ok(()), "five emoji are ten UTF-16 units");
        assert_eq!(m.validate(11), Err(FormError::MessageTooShort { min: 11 }));
    }

    fn form(clock: &ManualClock) -> (ContactForm, NotificationCenter) {
        let scheduler: Rc<ManualClock> = Rc::new(clock.clone());
        let notifications =
            NotificationCenter::new(NotificationConfig::default(), scheduler.clone());
        let submitter = Rc::new(SimulatedSubmitter::reliable(scheduler, 2000));
        (
            ContactForm::new(ContactConfig::default(), submitter, notifications.clone()),
            notifications,
        )
    }

    #[test]
    fn test_invalid_submit_notifies_without_sending() {
        let clock = ManualClock::new();
        let (form, notifications) = form(&clock);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut m = valid();
        m.email = "nope".to_string();

        let result = form.submit(m, move |e| sink.borrow_mut().push(e));
        assert_eq!(result, Err(FormError::InvalidEmail));
        assert!(events.borrow().is_empty());
        assert!(!form.is_sending());
        let toast = notifications.current().unwrap();
        assert_eq!(toast.kind, NotificationKind::Error);
        assert_eq!(toast.message, "Please enter a valid email address");
    }

    #[test]
    fn test_successful_send_lifecycle() {
        let clock = ManualClock::new();
        let (form, notifications) = form(&clock);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        form.submit(valid(), move |e| sink.borrow_mut().push(e)).unwrap();
        assert!(form.is_sending());
        assert_eq!(*events.borrow(), vec![FormEvent::Sending]);

        // A second submit while sending is ignored
        form.submit(valid(), |_| panic!("should not run")).unwrap();

        clock.advance(2000);
        assert!(!form.is_sending());
        assert_eq!(*events.borrow(), vec![FormEvent::Sending, FormEvent::Sent]);
        let toast = notifications.current().unwrap();
        assert_eq!(toast.kind, NotificationKind::Success);
        assert_eq!(toast.message, SENT_MESSAGE);
    }
}
