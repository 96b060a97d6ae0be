//! Wall-clock timing for methods.
//!
//! Put `#[time]` on a method (sync or `async`) to report how long each call
//! took, either as a line on stdout or through a callback:
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use timekeeper::time;
//!
//! static CALLS: AtomicUsize = AtomicUsize::new(0);
//!
//! fn record(_elapsed_ms: f64) {
//!     CALLS.fetch_add(1, Ordering::SeqCst);
//! }
//!
//! struct Summer;
//!
//! impl Summer {
//!     #[time(record)]
//!     fn sum(&self, n: u64) -> u64 {
//!         (0..n).sum()
//!     }
//! }
//!
//! assert_eq!(Summer.sum(1000), 499500);
//! assert_eq!(CALLS.load(Ordering::SeqCst), 1);
//! ```
//!
//! When several `#[time]` attributes are stacked, the one closest to `fn`
//! wraps all the others: it starts first and reports last.

pub mod aop;
pub mod err;
pub mod member;
pub mod reporter;

pub use aop::{make_timer, Timer};
pub use err::{ConfigurationError, NOT_A_METHOD};
pub use member::{Member, Timed};
pub use reporter::{write_report, ReportFn, Reporter};

// Expansions of `#[time(log = "...")]` name the level through this path.
pub use log;

// Re-export the proc macro
pub use timekeeper_macros::time;
