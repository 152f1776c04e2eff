//! Certification cards: simulated verification and category filtering.

use crate::config::CertificateConfig;
use crate::notify::NotificationCenter;
use crate::schedule::Scheduler;
use crate::submit::{SubmitOutcome, Submitter};
use std::cell::Cell;
use std::rc::Rc;

pub const VERIFIED_MESSAGE: &str = "Certificate verification successful!";
pub const VERIFY_FAILED_MESSAGE: &str = "Certificate verification failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyState {
    #[default]
    Idle,
    Verifying,
    Verified,
    Failed,
}

impl VerifyState {
    /// Button label while not idle; idle restores the original markup.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            VerifyState::Idle => None,
            VerifyState::Verifying => Some("Verifying..."),
            VerifyState::Verified => Some("Verified"),
            VerifyState::Failed => Some("Verification Failed"),
        }
    }
}

/// One verify button. Clones share state.
#[derive(Debug, Clone)]
pub struct VerifyButton {
    cert_id: String,
    state: Rc<Cell<VerifyState>>,
}

impl VerifyButton {
    pub fn new(cert_id: impl Into<String>) -> Self {
        Self {
            cert_id: cert_id.into(),
            state: Rc::new(Cell::new(VerifyState::Idle)),
        }
    }

    pub fn cert_id(&self) -> &str {
        &self.cert_id
    }

    pub fn state(&self) -> VerifyState {
        self.state.get()
    }
}

pub struct CertificateVerifier {
    config: CertificateConfig,
    scheduler: Rc<dyn Scheduler>,
    submitter: Rc<dyn Submitter<String>>,
    notifications: NotificationCenter,
}

impl CertificateVerifier {
    pub fn new(
        config: CertificateConfig,
        scheduler: Rc<dyn Scheduler>,
        submitter: Rc<dyn Submitter<String>>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            config,
            scheduler,
            submitter,
            notifications,
        }
    }

    /// Start verifying. Clicks are ignored until the button has reset to
    /// idle, including while it shows the result. Returns whether the click
    /// was accepted.
    pub fn click(&self, button: &VerifyButton, on_change: impl Fn(VerifyState) + 'static) -> bool {
        if button.state() != VerifyState::Idle {
            return false;
        }
        let on_change: Rc<dyn Fn(VerifyState)> = Rc::new(on_change);
        button.state.set(VerifyState::Verifying);
        on_change(VerifyState::Verifying);

        let state = Rc::clone(&button.state);
        let scheduler = Rc::clone(&self.scheduler);
        let notifications = self.notifications.clone();
        let reset_after_ms = self.config.reset_after_ms;
        self.submitter.submit(
            button.cert_id.clone(),
            Box::new(move |outcome| {
                let result = match outcome {
                    SubmitOutcome::Success => {
                        notifications.success(VERIFIED_MESSAGE);
                        VerifyState::Verified
                    }
                    SubmitOutcome::Failure => {
                        notifications.error(VERIFY_FAILED_MESSAGE);
                        VerifyState::Failed
                    }
                };
                state.set(result);
                on_change(result);

                scheduler.after(
                    reset_after_ms,
                    Box::new(move || {
                        state.set(VerifyState::Idle);
                        on_change(VerifyState::Idle);
                    }),
                );
            }),
        );
        true
    }
}

/// Certification category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CertFilter {
    #[default]
    All,
    Category(String),
}

impl CertFilter {
    /// `"all"` (or an empty value) selects everything.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => CertFilter::All,
            other => CertFilter::Category(other.to_string()),
        }
    }

    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CertFilter::All => true,
            CertFilter::Category(wanted) => category == Some(wanted.as_str()),
        }
    }

    /// Human label, e.g. "Cloud Certifications".
    pub fn label(&self) -> String {
        match self {
            CertFilter::All => "All Certifications".to_string(),
            CertFilter::Category(name) => {
                let mut chars = name.chars();
                let capitalized: String = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
                format!("{} Certifications", capitalized)
            }
        }
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

    fn verifier(clock: &ManualClock, draw: f64) -> (CertificateVerifier, NotificationCenter) {
        let scheduler: Rc<ManualClock> = Rc::new(clock.clone());
        let notifications =
            NotificationCenter::new(NotificationConfig::default(), scheduler.clone());
        let config = CertificateConfig::default();
        let submitter = Rc::new(SimulatedSubmitter::new(
            scheduler.clone(),
            config.verify_delay_ms,
            config.failure_rate,
            Rc::new(move || draw),
        ));
        (
            CertificateVerifier::new(config, scheduler, submitter, notifications.clone()),
            notifications,
        )
    }

    #[test]
    fn test_success_then_reset() {
        let clock = ManualClock::new();
        let (verifier, notifications) = verifier(&clock, 0.9);
        let button = VerifyButton::new("cert-0");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        assert!(verifier.click(&button, move |s| sink.borrow_mut().push(s)));
        assert_eq!(button.state(), VerifyState::Verifying);
        clock.advance(1500);
        assert_eq!(button.state(), VerifyState::Verified);
        assert_eq!(notifications.current().unwrap().kind, NotificationKind::Success);
        clock.advance(3000);
        assert_eq!(button.state(), VerifyState::Idle);
        assert_eq!(
            *seen.borrow(),
            vec![VerifyState::Verifying, VerifyState::Verified, VerifyState::Idle]
        );
    }

    #[test]
    fn test_failure_surfaces_error_and_resets() {
        let clock = ManualClock::new();
        let (verifier, notifications) = verifier(&clock, 0.05);
        let button = VerifyButton::new("cert-1");
        verifier.click(&button, |_| {});
        clock.advance(1500);
        assert_eq!(button.state(), VerifyState::Failed);
        let toast = notifications.current().unwrap();
        assert_eq!(toast.kind, NotificationKind::Error);
        assert_eq!(toast.message, VERIFY_FAILED_MESSAGE);
        clock.advance(3000);
        assert_eq!(button.state(), VerifyState::Idle);
    }

    #[test]
    fn test_clicks_ignored_until_reset() {
        let clock = ManualClock::new();
        let (verifier, _) = verifier(&clock, 0.9);
        let button = VerifyButton::new("cert-2");
        assert!(verifier.click(&button, |_| {}));
        assert!(!verifier.click(&button, |_| {}), "ignored while verifying");
        clock.advance(1500);
        assert!(!verifier.click(&button, |_| {}), "ignored while showing result");
        clock.advance(3000);
        assert!(verifier.click(&button, |_| {}), "accepted again after reset");
    }

    #[test]
    fn test_filter_matching_and_labels() {
        let all = CertFilter::parse("all");
        let cloud = CertFilter::parse("cloud");
        assert!(all.matches(None));
        assert!(all.matches(Some("security")));
        assert!(cloud.matches(Some("cloud")));
        assert!(!cloud.matches(Some("security")));
        assert!(!cloud.matches(None));
        assert_eq!(all.label(), "All Certifications");
        assert_eq!(cloud.label(), "Cloud Certifications");
    }
}
