//! Typewriter animation for the hero name.

use crate::config::TypingConfig;
use crate::schedule::{after_while, Lifetime, Scheduler};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeStep {
    /// Clear the element and show the cursor.
    Begin,
    /// Replace the element's text.
    Text(String),
    CursorOff,
}

/// Every step with its offset in milliseconds from the moment typing is
/// scheduled. One character per interval; the cursor stays for
/// `cursor_hold_ms` after the interval that follows the last character.
/// Offsets saturate at `u32::MAX` rather than wrapping.
pub fn timeline(text: &str, config: &TypingConfig) -> Vec<(u32, TypeStep)> {
    let start = config.start_delay_ms;
    let interval = config.char_interval_ms;
    let mut steps = vec![(start, TypeStep::Begin)];
    let mut typed = String::new();
    let mut count: u32 = 0;
    for ch in text.chars() {
        typed.push(ch);
        let at = start.saturating_add(count.saturating_mul(interval));
        steps.push((at, TypeStep::Text(typed.clone())));
        count = count.saturating_add(1);
    }
    let done = start
        .saturating_add(count.saturating_mul(interval))
        .saturating_add(config.cursor_hold_ms);
    steps.push((done, TypeStep::CursorOff));
    steps
}

/// Schedule the whole timeline. Steps are dropped once `lifetime` ends.
pub fn typewrite(
    scheduler: &dyn Scheduler,
    lifetime: &Lifetime,
    config: &TypingConfig,
    text: &str,
    apply: impl Fn(TypeStep) + 'static,
) {
    let apply: Rc<dyn Fn(TypeStep)> = Rc::new(apply);
    for (at, step) in timeline(text, config) {
        let apply = Rc::clone(&apply);
        after_while(scheduler, lifetime, at, move || apply(step));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualClock;
    use std::cell::RefCell;

    #[test]
    fn test_timeline_prefixes_and_cursor() {
        let steps = timeline("Ana", &TypingConfig::default());
        assert_eq!(
            steps,
            vec![
                (1000, TypeStep::Begin),
                (1000, TypeStep::Text("A".to_string())),
                (1100, TypeStep::Text("An".to_string())),
                (1200, TypeStep::Text("Ana".to_string())),
                (2300, TypeStep::CursorOff),
            ]
        );
    }

    #[test]
    fn test_multibyte_characters_typed_whole() {
        let steps = timeline("Zoë", &TypingConfig::default());
        assert_eq!(steps[3].1, TypeStep::Text("Zoë".to_string()));
    }

    #[test]
    fn test_empty_text_only_toggles_cursor() {
        let steps = timeline("", &TypingConfig::default());
        assert_eq!(steps, vec![(1000, TypeStep::Begin), (2000, TypeStep::CursorOff)]);
    }

    #[test]
    fn test_huge_interval_clamps_instead_of_overflowing() {
        let config = TypingConfig {
            char_interval_ms: 2_000_000_000,
            ..TypingConfig::default()
        };
        let steps = timeline("abc", &config);
        let offsets: Vec<u32> = steps.iter().map(|(at, _)| *at).collect();
        assert_eq!(
            offsets[..4],
            [1000, 1000, 2_000_001_000, 4_000_001_000],
            "every character still fits in u32"
        );
        assert_eq!(
            steps.last(),
            Some(&(u32::MAX, TypeStep::CursorOff)),
            "cursor offset should clamp"
        );
        assert!(
            offsets.windows(2).all(|w| w[0] <= w[1]),
            "offsets must never go backwards: {:?}",
            offsets
        );
    }

    #[test]
    fn test_typewrite_runs_in_order_on_clock() {
        let clock = ManualClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        typewrite(&clock, &Lifetime::new(), &TypingConfig::default(), "Hi", move |s| {
            sink.borrow_mut().push(s)
        });
        clock.advance(999);
        assert!(seen.borrow().is_empty());
        clock.run_until_idle(10_000);
        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&TypeStep::Begin));
        assert_eq!(seen[2], TypeStep::Text("Hi".to_string()));
        assert_eq!(seen.last(), Some(&TypeStep::CursorOff));
    }
}
