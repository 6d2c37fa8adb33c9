mod common;

use std::sync::{Arc, Barrier, Mutex, MutexGuard};
use std::thread;

use common::Buffer;
use serde_json::Value;
use sugarlog::{Encoding, Field, Level, Options};

// Every test here reconfigures the process-wide logger.
static GLOBAL: Mutex<()> = Mutex::new(());

fn lock_global() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(|e| e.into_inner())
}

fn install(options: Options) -> Buffer {
    let buffer = Buffer::default();
    sugarlog::set_options(options.with_writer(buffer.clone()));
    buffer
}

#[test]
fn test_info_writes_one_console_line() {
    let _guard = lock_global();
    let buffer = install(Options::new());

    sugarlog::info("started");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let cols: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(cols.len(), 4, "{:?}", cols);
    assert!(cols[0].contains('T'), "ISO-8601 timestamp: {}", cols[0]);
    assert_eq!(cols[1], "INFO");
    assert!(cols[2].starts_with("tests/facade_tests.rs:"), "{}", cols[2]);
    assert_eq!(cols[3], "started");
}

#[test]
fn test_errorf_writes_one_json_line() {
    let _guard = lock_global();
    let buffer = install(Options::new().with_encoding("json"));

    sugarlog::errorf!("failed to open {}", "orders.db");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\"level\":\"error\""), "{}", lines[0]);
    let entry: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry["msg"], "failed to open orders.db");
    assert!(entry["ts"].as_f64().unwrap() > 1_600_000_000.0);
    assert!(
        entry["caller"]
            .as_str()
            .unwrap()
            .starts_with("tests/facade_tests.rs:")
    );
}

#[test]
fn test_free_functions_respect_level() {
    let _guard = lock_global();
    let buffer = install(Options::new().with_level_str("Warn"));

    sugarlog::debug("no");
    sugarlog::info("no");
    sugarlog::infof(format_args!("no {}", 1));
    sugarlog::warn("yes");
    sugarlog::errorf(format_args!("yes {}", 2));

    let levels: Vec<String> = buffer
        .lines()
        .iter()
        .map(|line| line.split('\t').nth(1).unwrap().to_string())
        .collect();
    assert_eq!(levels, ["WARN", "ERROR"]);
}

#[test]
fn test_unknown_level_name_means_info() {
    let _guard = lock_global();
    let buffer = install(Options::new().with_level_str("verbose"));

    sugarlog::debug("dropped");
    sugarlog::info("kept");

    assert_eq!(sugarlog::logger().level(), Level::Info);
    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("\tkept"));
}

#[test]
fn test_macros_concatenate_and_format() {
    let _guard = lock_global();
    let buffer = install(Options::new().with_level(Level::Debug));

    let shard = 7;
    sugarlog::debug!("shard ", shard, " ready");
    sugarlog::info!("ok");
    sugarlog::warn!(1.5, "x");
    sugarlog::error!("code=", 500,);
    sugarlog::debugf!("{} of {}", 1, 2);
    sugarlog::warnf!("{shard}");

    let messages: Vec<String> = buffer
        .lines()
        .iter()
        .map(|line| line.rsplit('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(
        messages,
        ["shard 7 ready", "ok", "1.5x", "code=500", "1 of 2", "7"]
    );
}

#[test]
fn test_set_logger_returns_previous_instance() {
    let _guard = lock_global();
    let first = Buffer::default();
    let second = Buffer::default();

    sugarlog::set_logger(Options::new().with_writer(first.clone()).build());
    let previous = sugarlog::set_logger(
        Options::new()
            .with_writer(second.clone())
            .with_encoding(Encoding::Json)
            .build(),
    );

    previous.info("through the old instance", &[Field::bool("old", true)]);
    sugarlog::info("through the new instance");
    sugarlog::sync().unwrap();

    assert_eq!(first.lines().len(), 1);
    assert!(first.lines()[0].contains("{\"old\":true}"));
    assert_eq!(second.lines().len(), 1);
    assert!(second.lines()[0].contains("\"msg\":\"through the new instance\""));
}

#[test]
fn test_reconfigure_while_logging() {
    let _guard = lock_global();
    const THREADS: usize = 8;
    const PER_THREAD: usize = 200;

    let buffers: Vec<Buffer> = (0..4).map(|_| Buffer::default()).collect();
    sugarlog::set_options(Options::new().with_writer(buffers[0].clone()));

    let start = Arc::new(Barrier::new(THREADS + 1));
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                for i in 0..PER_THREAD {
                    sugarlog::infof!("worker {} line {}", t, i);
                }
            })
        })
        .collect();

    start.wait();
    for buffer in buffers.iter().cycle().skip(1).take(40) {
        let encoding = if buffer.lines().len() % 2 == 0 {
            Encoding::Json
        } else {
            Encoding::Console
        };
        sugarlog::set_options(
            Options::new()
                .with_writer(buffer.clone())
                .with_encoding(encoding),
        );
        thread::yield_now();
    }
    for worker in workers {
        worker.join().unwrap();
    }

    let lines: Vec<String> = buffers.iter().flat_map(|b| b.lines()).collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in &lines {
        let complete = if line.starts_with('{') {
            serde_json::from_str::<Value>(line)
                .map(|v| v["level"] == "info" && v["msg"].as_str().unwrap().starts_with("worker "))
                .unwrap_or(false)
        } else {
            let cols: Vec<&str> = line.split('\t').collect();
            cols.len() == 4 && cols[1] == "INFO" && cols[3].starts_with("worker ")
        };
        assert!(complete, "partial entry: {:?}", line);
    }
}
