use std::sync::{Mutex, Once};

use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log, Metadata, Record};
use timekeeper::time;

struct CaptureLogger {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            record.level(),
            record.target().to_string(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

lazy_static! {
    static ref CAPTURE: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };
}

static INIT: Once = Once::new();

fn init_capture() {
    INIT.call_once(|| {
        log::set_logger(&*CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

// Records whose text mentions `needle`.
fn records_mentioning(needle: &str) -> Vec<(Level, String, String)> {
    CAPTURE
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, _, text)| text.contains(needle))
        .cloned()
        .collect()
}

struct Gauge;

impl Gauge {
    #[time(log = "debug")]
    fn logged(&self) -> bool {
        true
    }

    #[time(log)]
    fn logged_at_info(&self) -> u8 {
        3
    }

    #[time(log = "warn")]
    fn checked_parse(&self, raw: &str) -> Result<u32, std::num::ParseIntError> {
        raw.parse()
    }
}

#[test]
fn test_log_reporter_emits_one_record() {
    init_capture();

    assert!(Gauge.logged());

    let records = records_mentioning("Time taken by logged:");
    assert_eq!(records.len(), 1);
    let (level, target, text) = &records[0];
    assert_eq!(*level, Level::Debug);
    assert_eq!(target, "timekeeper");
    assert!(text.ends_with("ms"));
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_log_reporter_defaults_to_info() {
    init_capture();

    assert_eq!(Gauge.logged_at_info(), 3);

    let records = records_mentioning("Time taken by logged_at_info:");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Level::Info);
}

#[test]
fn test_failed_call_logs_no_timing_record() {
    init_capture();

    assert!(Gauge.checked_parse("nope").is_err());
    assert!(records_mentioning("Time taken by checked_parse:").is_empty());

    let skipped = records_mentioning("checked_parse failed, not reporting elapsed time");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, Level::Debug);
    assert_eq!(skipped[0].1, "timekeeper");

    assert_eq!(Gauge.checked_parse("12").unwrap(), 12);
    let records = records_mentioning("Time taken by checked_parse:");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Level::Warn);
}
