//! Integration tests for the logging system
//!
//! The global subscriber can be installed only once per process, so a single
//! test owns `init_logging` and checks everything that depends on it.

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use core_runtime::Error;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CapturingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_init_logging_installs_sink_once() {
    let sink = Arc::new(CapturingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config).unwrap();

    tracing::info!(target: "core_library::store", song_id = "a1", "Song added");
    tracing::trace!(target: "core_library::store", "below the sink level");
    tracing::info!(target: "sqlx::query", "filtered out by default directives");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Song added");
        assert_eq!(entries[0].fields.get("song_id"), Some(&"a1".to_string()));
    }

    let second = init_logging(LoggingConfig::default());
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_file_paths_are_reduced_to_names() {
    let uri = "content://com.android.providers.media.documents/document/audio%3A1234";
    assert_eq!(strip_path(uri), "audio%3A1234");
    assert_eq!(strip_path("/sdcard/Music/Track One.mp3"), "Track One.mp3");
    assert_eq!(strip_path("Track One.mp3"), "Track One.mp3");
}
