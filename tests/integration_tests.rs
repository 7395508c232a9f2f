use chrono::{TimeZone, Utc};
use ratelog::infrastructure::mocks::{CaptureWriter, MockClock, RecordingCounter};
use ratelog::{CallSite, Format, JsonFields, LogTimeZone, Logger, LoggerBuilder, Severity};
use std::sync::Arc;
use std::thread;

struct Harness {
    logger: Arc<Logger>,
    output: CaptureWriter,
    counter: RecordingCounter,
}

fn harness(builder: LoggerBuilder) -> Harness {
    let output = CaptureWriter::new();
    let counter = RecordingCounter::new();
    let clock = MockClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap());
    let logger = builder
        .with_clock(Arc::new(clock))
        .with_counter(Arc::new(counter.clone()))
        .build()
        .unwrap();
    logger.set_output_for_tests(Box::new(output.clone()));
    Harness {
        logger: Arc::new(logger),
        output,
        counter,
    }
}

#[test]
fn test_text_line_with_timestamp() {
    let h = harness(Logger::builder());

    let line = line!() + 1;
    h.logger.infof(format_args!("started on port {}", 8080));

    let output = h.output.contents();
    assert!(output.ends_with('\n'));
    assert_eq!(output.matches('\n').count(), 1);

    let fields: Vec<_> = output.trim_end_matches('\n').split('\t').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0], "2024-03-01T12:30:45.000Z");
    assert_eq!(fields[1], "INFO");
    assert_eq!(fields[2], format!("{}:{}", file!(), line));
    assert_eq!(fields[3], "started on port 8080");
}

#[test]
fn test_json_line_without_timestamp() {
    let h = harness(
        Logger::builder()
            .with_format(Format::Json)
            .with_timestamps_disabled(true),
    );

    let line = line!() + 1;
    h.logger.warnf(format_args!("retry {}", 3));

    assert_eq!(
        h.output.contents(),
        format!(
            "{{\"level\":\"WARN\",\"caller\":\"{}:{}\",\"msg\":\"retry 3\"}}\n",
            file!(),
            line
        )
    );
}

#[test]
fn test_warn_limit_of_two_in_one_window() {
    let h = harness(
        Logger::builder()
            .with_timestamps_disabled(true)
            .with_warns_per_second_limit(2),
    );

    let line = line!() + 2;
    for _ in 0..3 {
        h.logger.warnf(format_args!("x"));
    }

    let loc = format!("{}:{}", file!(), line);
    assert_eq!(
        h.output.lines(),
        vec![
            format!("WARN\t{}\tx", loc),
            format!("WARN\t{}\tx", loc),
            format!("WARN\t{}\tsuppressing log message with rate limit=2: x", loc),
        ]
    );
    assert_eq!(h.counter.count_for(Severity::Warn, &loc), 3);
}

#[test]
fn test_suppressed_messages_are_not_counted() {
    let h = harness(
        Logger::builder()
            .with_timestamps_disabled(true)
            .with_errors_per_second_limit(3),
    );
    let site = CallSite::new("src/db.rs", 17);

    for _ in 0..100 {
        h.logger.errorf_at(site, format_args!("connection refused"));
    }

    assert_eq!(h.output.lines().len(), 4);
    assert_eq!(h.counter.count_for(Severity::Error, "src/db.rs:17"), 4);
}

#[test]
fn test_window_reset_restarts_cycle() {
    let h = harness(
        Logger::builder()
            .with_timestamps_disabled(true)
            .with_warns_per_second_limit(1),
    );
    let site = CallSite::new("src/db.rs", 17);

    for _ in 0..3 {
        h.logger.warnf_at(site, format_args!("x"));
    }
    h.logger.reset_limiter();
    for _ in 0..3 {
        h.logger.warnf_at(site, format_args!("x"));
    }

    let lines = h.output.lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "WARN\tsrc/db.rs:17\tx");
    assert!(lines[1].ends_with("rate limit=1: x"));
    assert_eq!(lines[2], "WARN\tsrc/db.rs:17\tx");
    assert!(lines[3].ends_with("rate limit=1: x"));
}

#[test]
fn test_zero_limit_never_suppresses() {
    let h = harness(Logger::builder().with_timestamps_disabled(true));
    let site = CallSite::new("src/hot.rs", 1);

    for _ in 0..5000 {
        h.logger.warnf_at(site, format_args!("flood"));
    }

    assert_eq!(h.output.lines().len(), 5000);
    assert!(h.logger.limiter().is_empty());
}

#[test]
fn test_below_min_level_writes_and_counts_nothing() {
    let h = harness(Logger::builder().with_min_level(Severity::Error));

    h.logger.infof(format_args!("quiet"));
    h.logger.warnf(format_args!("quiet"));
    h.logger
        .warnf_at(CallSite::new("src/a.rs", 1), format_args!("quiet"));

    assert!(h.output.is_empty());
    assert_eq!(h.counter.count(), 0);

    h.logger.errorf(format_args!("loud"));
    assert_eq!(h.output.lines().len(), 1);
    assert_eq!(h.counter.count(), 1);
}

#[test]
fn test_trailing_newlines_collapse() {
    let h = harness(Logger::builder().with_timestamps_disabled(true));

    h.logger.infof(format_args!("first\n\n\n"));
    h.logger.infof(format_args!("second\n"));

    let output = h.output.contents();
    assert!(!output.contains("\n\n"));
    assert_eq!(output.matches('\n').count(), 2);
}

#[test]
fn test_json_output_is_valid_for_arbitrary_messages() {
    let h = harness(Logger::builder().with_format(Format::Json));
    let messages = [
        "plain ascii",
        "quotes \" and \\ backslashes",
        "tabs\tand\nnewlines\r",
        "control \u{0}\u{1b}[31m",
        "ünïcödé ✓ 日本語 🚀",
    ];

    for message in messages {
        h.logger.errorf(format_args!("{}", message));
    }

    let lines = h.output.lines();
    assert_eq!(lines.len(), messages.len());
    for (line, message) in lines.iter().zip(messages) {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(value["ts"], "2024-03-01T12:30:45.000Z");
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["msg"], message);
    }
}

#[test]
fn test_json_key_order_and_renames() {
    let fields = JsonFields::parse("ts:time,caller:source").unwrap();
    let h = harness(
        Logger::builder()
            .with_format(Format::Json)
            .with_json_fields(fields),
    );

    h.logger
        .errorf_at(CallSite::new("src/x.rs", 2), format_args!("m"));

    assert_eq!(
        h.output.contents(),
        "{\"time\":\"2024-03-01T12:30:45.000Z\",\"level\":\"ERROR\",\"source\":\"src/x.rs:2\",\"msg\":\"m\"}\n"
    );
}

#[test]
fn test_timestamp_in_configured_zone() {
    let h = harness(
        Logger::builder().with_timezone(LogTimeZone::resolve("America/New_York").unwrap()),
    );

    h.logger.infof(format_args!("x"));

    assert!(h
        .output
        .contents()
        .starts_with("2024-03-01T07:30:45.000-0500\tINFO\t"));
}

#[test]
fn test_concurrent_callers_never_interleave() {
    let h = harness(Logger::builder().with_format(Format::Json));
    let mut handles = vec![];

    for t in 0..8 {
        let logger = Arc::clone(&h.logger);
        handles.push(thread::spawn(move || {
            let payload = t.to_string().repeat(500);
            for i in 0..100 {
                logger.infof(format_args!("{} {}", payload, i));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let lines = h.output.lines();
    assert_eq!(lines.len(), 800);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let msg = value["msg"].as_str().unwrap();
        let first = msg.chars().next().unwrap();
        assert!(msg.chars().take(500).all(|c| c == first));
    }
    assert_eq!(h.counter.count(), 800);
}

#[test]
fn test_concurrent_rate_limit_single_announcement() {
    let h = harness(
        Logger::builder()
            .with_timestamps_disabled(true)
            .with_warns_per_second_limit(10),
    );
    let site = CallSite::new("src/shared.rs", 5);
    let mut handles = vec![];

    for _ in 0..8 {
        let logger = Arc::clone(&h.logger);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                logger.warnf_at(site, format_args!("busy"));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let lines = h.output.lines();
    assert_eq!(lines.len(), 11);
    assert_eq!(
        lines
            .iter()
            .filter(|l| l.contains("suppressing log message with rate limit=10: "))
            .count(),
        1
    );
}

#[test]
fn test_locations_are_limited_independently() {
    let h = harness(
        Logger::builder()
            .with_timestamps_disabled(true)
            .with_errors_per_second_limit(1),
    );

    for _ in 0..5 {
        h.logger.errorf(format_args!("a"));
        h.logger.errorf(format_args!("b"));
    }

    // Two lines (plain + announced) per call site
    assert_eq!(h.output.lines().len(), 4);
    assert_eq!(h.logger.limiter().len(), 2);
}
