use std::future::Future;
use std::time::Instant;

use log::{debug, Level};

use crate::member::{Member, Timed};
use crate::reporter::{ReportFn, Reporter};
use crate::ConfigurationError;

macro_rules! timed_section {
    ($body:expr) => {{
        let start = Instant::now();
        let result = $body;
        (result, start.elapsed().as_secs_f64() * 1000.0)
    }};
}

/// Builds a timer from an optional reporting callback. `None` selects the
/// stdout reporter.
pub fn make_timer(callback: Option<ReportFn>) -> Timer {
    match callback {
        Some(callback) => Timer::with_reporter(Reporter::Callback(callback)),
        None => Timer::new(),
    }
}

/// Measures the wall-clock duration of an operation and hands it to a
/// [`Reporter`]. Timestamps are local to each call, so one timer can serve
/// any number of concurrent invocations.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    reporter: Reporter,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reporter(reporter: Reporter) -> Self {
        Self { reporter }
    }

    pub fn with_callback<F, R>(callback: F) -> Self
    where
        F: Fn(f64) -> R + Send + Sync + 'static,
    {
        Self::with_reporter(Reporter::callback(callback))
    }

    pub fn with_log(level: Level) -> Self {
        Self::with_reporter(Reporter::Log(level))
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn report(&self, name: &str, elapsed_ms: f64) {
        self.reporter.report(name, elapsed_ms);
    }

    /// Times a synchronous operation. A panic unwinds past the report.
    pub fn run<F, R>(&self, name: &str, op: F) -> R
    where
        F: FnOnce() -> R,
    {
        let (result, elapsed_ms) = timed_section!(op());
        self.report(name, elapsed_ms);
        result
    }

    /// Like [`Timer::run`], but an `Err` outcome is returned without a report.
    pub fn run_fallible<F, T, E>(&self, name: &str, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let (result, elapsed_ms) = timed_section!(op());
        self.finish(name, result, elapsed_ms)
    }

    /// Times an asynchronous operation up to its resolution. Dropping the
    /// returned future before it resolves emits nothing.
    pub async fn run_async<Fut>(&self, name: &str, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        let (result, elapsed_ms) = timed_section!(fut.await);
        self.report(name, elapsed_ms);
        result
    }

    pub async fn run_async_fallible<Fut, T, E>(&self, name: &str, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let (result, elapsed_ms) = timed_section!(fut.await);
        self.finish(name, result, elapsed_ms)
    }

    /// Attaches this timer to a function value.
    pub fn wrap<F>(self, name: &'static str, op: F) -> Timed<F> {
        Timed::new(name, self, op)
    }

    /// Attaches this timer to a member, rejecting anything that is not a
    /// method before it can ever be called.
    pub fn decorate<F, V>(
        self,
        name: &'static str,
        member: Member<F, V>,
    ) -> Result<Timed<F>, ConfigurationError> {
        match member {
            Member::Method(op) => Ok(self.wrap(name, op)),
            Member::Field(_) => Err(ConfigurationError::not_a_method(name)),
        }
    }

    fn finish<T, E>(&self, name: &str, result: Result<T, E>, elapsed_ms: f64) -> Result<T, E> {
        match result {
            Ok(value) => {
                self.report(name, elapsed_ms);
                Ok(value)
            }
            Err(err) => {
                debug!(target: "timekeeper", "{} failed, not reporting elapsed time", name);
                Err(err)
            }
        }
    }
}
