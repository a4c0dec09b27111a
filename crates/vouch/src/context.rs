//! A ready-made [`TestingT`] for plain `#[test]` functions.
//!
//! The standard harness has no test-context object: a test fails by
//! panicking. [`T`] bridges the two. Non-fatal failures are collected and
//! reported when the context is dropped at the end of the test; a fatal
//! failure panics right away with everything collected so far.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tracing::debug;

use crate::assert::{Severity, TestingT};

/// A failure recorded by [`T`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Call site of the failing assertion, if it reported one.
    pub location: Option<&'static Location<'static>>,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(
                f,
                "{}:{}: {}",
                location.file(),
                location.line(),
                self.message
            ),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// Pending call site per thread, set by `helper` and consumed by the
    /// next failure recorded on the same thread.
    callers: HashMap<ThreadId, &'static Location<'static>>,
    failures: Vec<Failure>,
}

/// Test context for a single test.
///
/// Dropping a `T` that still holds failures panics, which fails the
/// surrounding `#[test]`. Use [`T::take_failures`] to inspect failures
/// without failing the test.
#[derive(Debug)]
pub struct T {
    name: String,
    state: Mutex<State>,
}

impl T {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any failure has been recorded.
    pub fn failed(&self) -> bool {
        !self.state().failures.is_empty()
    }

    /// Snapshot of the recorded failures, oldest first.
    pub fn failures(&self) -> Vec<Failure> {
        self.state().failures.clone()
    }

    /// Drains the recorded failures. The context no longer counts as failed.
    pub fn take_failures(&self) -> Vec<Failure> {
        mem::take(&mut self.state().failures)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a failure and returns the report for all failures so far.
    fn record(&self, severity: Severity, args: fmt::Arguments<'_>) -> String {
        let mut state = self.state();
        let location = state.callers.remove(&thread::current().id());

        debug!(
            event = "assert.failure_recorded",
            test = %self.name,
            severity = ?severity,
            location = %location.map_or_else(|| "unknown".to_string(), ToString::to_string),
        );

        state.failures.push(Failure {
            location,
            message: args.to_string(),
            severity,
        });
        render(&self.name, &state.failures)
    }
}

impl TestingT for T {
    fn helper(&self, caller: &'static Location<'static>) {
        self.state().callers.insert(thread::current().id(), caller);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.record(Severity::Continue, args);
    }

    fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        let report = self.record(Severity::Abort, args);
        panic!("{report}");
    }
}

impl Drop for T {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !state.failures.is_empty() {
            panic!("{}", render(&self.name, &state.failures));
        }
    }
}

fn render(name: &str, failures: &[Failure]) -> String {
    let mut out = format!("test {name} failed:");
    for failure in failures {
        out.push_str("\n    ");
        out.push_str(&failure.to_string().replace('\n', "\n        "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{Abort, Continue};
    use crate::equal;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn test_error_records_and_continues() {
        let t = T::new("records");

        equal!(Continue, &t, 1, 2);
        equal!(Continue, &t, 3, 4);

        assert!(t.failed());
        let failures = t.take_failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].severity, Severity::Continue);
        assert_eq!(failures[0].message, "\ngot\t1\nwant\t2");
        assert_eq!(failures[1].message, "\ngot\t3\nwant\t4");
        assert!(!t.failed());
    }

    #[test]
    fn test_failure_points_at_call_site() {
        let t = T::new("location");
        let line = line!() + 1;
        equal!(Continue, &t, "a", "b");

        let failures = t.take_failures();
        let location = failures[0].location.expect("helper should record the caller");
        assert!(location.file().ends_with("context.rs"));
        assert_eq!(location.line(), line);
    }

    #[test]
    fn test_call_site_is_kept_per_thread() {
        let t = T::new("threads");
        let main_site = Location::caller();

        t.helper(main_site);
        thread::scope(|s| {
            s.spawn(|| {
                let other_site = Location::caller();
                t.helper(other_site);
                t.error(format_args!("other"));
            });
        });
        t.error(format_args!("main"));

        let failures = t.take_failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].message, "other");
        assert_ne!(failures[0].location, Some(main_site));
        assert!(failures[0].location.is_some());
        assert_eq!(failures[1].message, "main");
        assert_eq!(failures[1].location, Some(main_site));
    }

    #[test]
    fn test_fatal_stops_execution() {
        let t = T::new("fatal");
        let mut reached = false;

        let result = catch_unwind(AssertUnwindSafe(|| {
            equal!(Abort, &t, vec![1, 2], vec![1, 2, 3]);
            reached = true;
        }));

        let payload = result.expect_err("fatal failure should unwind");
        let report = payload
            .downcast_ref::<String>()
            .expect("panic payload should be the report");
        assert!(report.starts_with("test fatal failed:"));
        assert!(report.contains("got\t[1, 2]"));
        assert!(!reached);

        let failures = t.take_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].severity, Severity::Abort);
    }

    #[test]
    fn test_fatal_report_includes_earlier_failures() {
        let t = T::new("accumulates");

        let result = catch_unwind(AssertUnwindSafe(|| {
            equal!(Continue, &t, 1, 2, "first");
            equal!(Abort, &t, 3, 4, "second");
        }));

        let payload = result.expect_err("fatal failure should unwind");
        let report = payload.downcast_ref::<String>().unwrap();
        assert!(report.contains("first"));
        assert!(report.contains("second"));
        assert_eq!(t.take_failures().len(), 2);
    }

    #[test]
    #[should_panic(expected = "test dropped failed:")]
    fn test_drop_with_failures_panics() {
        let t = T::new("dropped");
        t.error(format_args!("late failure"));
    }

    #[test]
    fn test_drop_without_failures_is_silent() {
        let t = T::new("clean");
        equal!(Abort, &t, "same", "same");
        assert!(!t.failed());
        assert_eq!(t.name(), "clean");
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure {
            location: None,
            message: "boom".to_string(),
            severity: Severity::Continue,
        };
        assert_eq!(failure.to_string(), "boom");

        let rendered = render("multi", &[failure.clone(), failure]);
        assert_eq!(rendered, "test multi failed:\n    boom\n    boom");
    }

    #[test]
    fn test_render_indents_continuation_lines() {
        let failure = Failure {
            location: None,
            message: "\ngot\t1\nwant\t2".to_string(),
            severity: Severity::Continue,
        };
        assert_eq!(
            render("indent", &[failure]),
            "test indent failed:\n    \n        got\t1\n        want\t2"
        );
    }
}
