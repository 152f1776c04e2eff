//! Stand-ins for network calls: asynchronous operations that resolve to
//! success or failure after a delay.

use crate::schedule::Scheduler;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure,
}

/// Callback-style asynchronous submission.
pub trait Submitter<P> {
    fn submit(&self, payload: P, done: Box<dyn FnOnce(SubmitOutcome)>);
}

/// Uniform random source in `0..1`.
pub type RandomSource = Rc<dyn Fn() -> f64>;

/// Resolves after `delay_ms`; fails when the random draw is at or below
/// `failure_rate`.
pub struct SimulatedSubmitter {
    scheduler: Rc<dyn Scheduler>,
    delay_ms: u32,
    failure_rate: f64,
    random: RandomSource,
}

impl SimulatedSubmitter {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        delay_ms: u32,
        failure_rate: f64,
        random: RandomSource,
    ) -> Self {
        Self {
            scheduler,
            delay_ms,
            failure_rate,
            random,
        }
    }

    /// Never fails.
    pub fn reliable(scheduler: Rc<dyn Scheduler>, delay_ms: u32) -> Self {
        Self::new(scheduler, delay_ms, 0.0, Rc::new(|| 1.0))
    }
}

impl<P: 'static> Submitter<P> for SimulatedSubmitter {
    fn submit(&self, _payload: P, done: Box<dyn FnOnce(SubmitOutcome)>) {
        let random = Rc::clone(&self.random);
        let failure_rate = self.failure_rate;
        self.scheduler.after(
            self.delay_ms,
            Box::new(move || {
                let outcome = if random() > failure_rate {
                    SubmitOutcome::Success
                } else {
                    SubmitOutcome::Failure
                };
                done(outcome);
            }),
        );
    }
}
