use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use log::Level;

pub type ReportFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Where an elapsed duration goes once a timed call completes.
#[derive(Clone, Default)]
pub enum Reporter {
    /// One line per call on standard output.
    #[default]
    Stdout,
    /// One record per call through the `log` facade.
    Log(Level),
    /// Caller-supplied callback receiving elapsed milliseconds.
    Callback(ReportFn),
}

impl Reporter {
    /// Wraps any `Fn(f64) -> R`; the callback's return value is discarded.
    pub fn callback<F, R>(f: F) -> Self
    where
        F: Fn(f64) -> R + Send + Sync + 'static,
    {
        Reporter::Callback(Arc::new(move |elapsed_ms: f64| {
            let _ = f(elapsed_ms);
        }))
    }

    pub fn report(&self, name: &str, elapsed_ms: f64) {
        match self {
            Reporter::Stdout => {
                let stdout = io::stdout();
                let color = stdout.is_terminal();
                let mut out = stdout.lock();
                // Write failures never reach the caller.
                let _ = write_report(&mut out, name, elapsed_ms, color);
            }
            Reporter::Log(level) => {
                log::log!(
                    target: "timekeeper",
                    *level,
                    "Time taken by {}: {:.3}ms",
                    name,
                    elapsed_ms
                );
            }
            Reporter::Callback(callback) => callback(elapsed_ms),
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::Stdout => write!(f, "Stdout"),
            Reporter::Log(level) => f.debug_tuple("Log").field(level).finish(),
            Reporter::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

/// Writes the default report line, optionally highlighting the name and the
/// number with ANSI colors.
pub fn write_report<W: Write>(
    out: &mut W,
    name: &str,
    elapsed_ms: f64,
    color: bool,
) -> io::Result<()> {
    if color {
        writeln!(
            out,
            "Time taken by \x1b[36m{}\x1b[0m: \x1b[33m{:.3}\x1b[0mms",
            name, elapsed_ms
        )
    } else {
        writeln!(out, "Time taken by {}: {:.3}ms", name, elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_plain_report_line() {
        let mut buf = Vec::new();
        write_report(&mut buf, "syncMethod", 1.5, false).unwrap();
        let line = String::from_utf8(buf).unwrap();

        assert_eq!(line, "Time taken by syncMethod: 1.500ms\n");
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_colored_report_line_keeps_substrings() {
        let mut buf = Vec::new();
        write_report(&mut buf, "asyncMethod", 10.25, true).unwrap();
        let line = String::from_utf8(buf).unwrap();

        assert!(line.contains("Time taken by"));
        assert!(line.contains("asyncMethod"));
        assert!(line.contains("10.250"));
        assert!(line.contains("ms"));
        assert!(line.contains("\x1b[36m"));
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_callback_receives_elapsed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = Reporter::callback(move |ms| sink.lock().unwrap().push(ms));

        reporter.report("ignored", 4.0);
        reporter.report("ignored", 2.0);

        assert_eq!(*seen.lock().unwrap(), vec![4.0, 2.0]);
    }

    #[test]
    fn test_callback_return_value_is_discarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let reporter = Reporter::callback(move |_| counter.fetch_add(1, Ordering::SeqCst));

        reporter.report("ignored", 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_is_stdout() {
        assert!(matches!(Reporter::default(), Reporter::Stdout));
        assert_eq!(format!("{:?}", Reporter::Log(Level::Debug)), "Log(Debug)");
        assert_eq!(format!("{:?}", Reporter::callback(|_| ())), "Callback(..)");
    }
}
