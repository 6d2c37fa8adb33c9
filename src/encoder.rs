//! Encoder profiles.
//!
//! The console profile renders
//! `2026-01-09T10:30:05.123Z\tINFO\tsrc/main.rs:12\tstarted\t{"port":80}`;
//! the JSON profile renders
//! `{"level":"info","ts":1767954605.123,"caller":"src/main.rs:12","msg":"started","port":80}`.

use std::fmt;

use serde_json::{Map, Number, Value};
use time::{OffsetDateTime, UtcOffset};
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::{Encoding, Level};

/// The local UTC offset, or UTC when it cannot be determined.
pub(crate) fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// A single entry, ready to be encoded.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub level: Level,
    /// When the entry was logged, in the offset it is rendered with.
    pub time: OffsetDateTime,
    /// `dir/file.rs:line` of the logging call, empty when unknown.
    pub caller: &'a str,
    pub message: &'a str,
    /// Text of a JSON object holding the user fields, empty when there are
    /// none.
    pub fields: &'a str,
}

/// ISO-8601 with millisecond precision, `Z` for UTC and `+hhmm` otherwise.
pub fn iso8601(time: OffsetDateTime) -> Result<String, time::error::Format> {
    let mut out = time.format(time::macros::format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
    ))?;
    if time.offset().is_utc() {
        out.push('Z');
    } else {
        out.push_str(&time.format(time::macros::format_description!(
            "[offset_hour sign:mandatory][offset_minute]"
        ))?);
    }
    Ok(out)
}

/// Seconds since the Unix epoch, with fractional nanoseconds.
pub fn epoch_seconds(time: OffsetDateTime) -> f64 {
    time.unix_timestamp_nanos() as f64 / 1_000_000_000.0
}

impl Encoding {
    /// How this profile spells a level.
    pub fn encode_level(&self, level: Level) -> &'static str {
        match self {
            Encoding::Console => level.capital(),
            Encoding::Json => level.as_str(),
        }
    }

    /// Render one entry as a single line, including the trailing newline.
    pub fn encode(&self, entry: &Entry<'_>, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Encoding::Console => {
                let time = iso8601(entry.time).map_err(|_| fmt::Error)?;
                write!(out, "{}\t{}", time, self.encode_level(entry.level))?;
                if !entry.caller.is_empty() {
                    write!(out, "\t{}", entry.caller)?;
                }
                write!(out, "\t{}", entry.message)?;
                if !entry.fields.is_empty() {
                    write!(out, "\t{}", entry.fields)?;
                }
                writeln!(out)
            }
            Encoding::Json => {
                let mut object = Map::with_capacity(4);
                object.insert(
                    "level".to_string(),
                    Value::String(self.encode_level(entry.level).to_string()),
                );
                let ts = Number::from_f64(epoch_seconds(entry.time)).ok_or(fmt::Error)?;
                object.insert("ts".to_string(), Value::Number(ts));
                if !entry.caller.is_empty() {
                    object.insert("caller".to_string(), Value::String(entry.caller.to_string()));
                }
                object.insert("msg".to_string(), Value::String(entry.message.to_string()));
                let line = serde_json::to_string(&object).map_err(|_| fmt::Error)?;
                writeln!(out, "{}", join_objects(&line, entry.fields))
            }
        }
    }
}

/// Append the members of the JSON object text `extra` to the object text
/// `base`. A key present in both appears twice; readers keep the last one.
fn join_objects(base: &str, extra: &str) -> String {
    let members = extra
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
        .unwrap_or_default();
    if members.is_empty() {
        return base.to_string();
    }
    let head = base.strip_suffix('}').unwrap_or(base);
    if head.trim_end().ends_with('{') {
        format!("{}{}}}", head, members)
    } else {
        format!("{},{}}}", head, members)
    }
}

/// Adapts an [`Encoding`] to the `tracing-subscriber` formatting pipeline.
#[derive(Debug, Clone)]
pub(crate) struct EntryFormat {
    encoding: Encoding,
    offset: UtcOffset,
}

impl EntryFormat {
    pub(crate) fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            offset: local_offset(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for EntryFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let level = visitor
            .severity
            .unwrap_or_else(|| Level::from_tracing(metadata.level()));
        let caller = match (visitor.caller, metadata.file(), metadata.line()) {
            (Some(caller), _, _) => caller,
            (None, Some(file), Some(line)) => format!("{}:{}", file, line),
            _ => String::new(),
        };

        // Only entries from a `Logger` carry pre-rendered fields; anything
        // else called `fields` is an ordinary value.
        let mut extra = visitor.extra;
        let rendered = match visitor.fields {
            Some(fields) if visitor.severity.is_some() => fields,
            Some(fields) => {
                extra.insert("fields".to_string(), Value::String(fields));
                String::new()
            }
            None => String::new(),
        };
        let fields = if extra.is_empty() {
            rendered
        } else {
            let extra = serde_json::to_string(&extra).map_err(|_| fmt::Error)?;
            if rendered.is_empty() {
                extra
            } else {
                join_objects(&rendered, &extra)
            }
        };

        let entry = Entry {
            level,
            time: OffsetDateTime::now_utc().to_offset(self.offset),
            caller: &caller,
            message: &visitor.message,
            fields: &fields,
        };
        self.encoding.encode(&entry, &mut writer)
    }
}

/// Collects the well-known entry parts from an event. Anything else becomes
/// an extra field, so events not emitted by a [`crate::Logger`] still render.
#[derive(Default)]
struct EntryVisitor {
    message: String,
    severity: Option<Level>,
    caller: Option<String>,
    fields: Option<String>,
    extra: Map<String, Value>,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "severity" => self.severity = value.parse().ok(),
            "caller" => self.caller = Some(value.to_string()),
            "fields" => self.fields = Some(value.to_string()),
            name => {
                self.extra
                    .insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.extra.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.extra.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.extra.insert(field.name().to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn encode(encoding: Encoding, entry: &Entry<'_>) -> String {
        let mut out = String::new();
        encoding.encode(entry, &mut out).unwrap();
        out
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(
            iso8601(datetime!(2024-01-02 13:04:05.678 UTC)).unwrap(),
            "2024-01-02T13:04:05.678Z"
        );
        assert_eq!(
            iso8601(datetime!(2024-01-02 13:04:05.678 +8)).unwrap(),
            "2024-01-02T13:04:05.678+0800"
        );
        assert_eq!(
            iso8601(datetime!(2024-01-02 13:04:05 -5:30)).unwrap(),
            "2024-01-02T13:04:05.000-0530"
        );
    }

    #[test]
    fn test_epoch_seconds() {
        let ts = epoch_seconds(datetime!(2024-01-02 13:04:05.678 UTC));
        assert!((ts - 1_704_200_645.678).abs() < 1e-5, "{}", ts);
        assert_eq!(epoch_seconds(datetime!(1970-01-01 0:00 UTC)), 0.0);
    }

    #[test]
    fn test_level_casing_per_profile() {
        for level in Level::ALL {
            assert_eq!(Encoding::Console.encode_level(level), level.capital());
            assert_eq!(Encoding::Json.encode_level(level), level.as_str());
        }
    }

    #[test]
    fn test_console_layout() {
        let entry = Entry {
            level: Level::Info,
            time: datetime!(2024-01-02 13:04:05.678 UTC),
            caller: "src/main.rs:7",
            message: "started",
            fields: "",
        };
        assert_eq!(
            encode(Encoding::Console, &entry),
            "2024-01-02T13:04:05.678Z\tINFO\tsrc/main.rs:7\tstarted\n"
        );
    }

    #[test]
    fn test_console_layout_with_fields_and_no_caller() {
        let fields = crate::field::render_fields(&[
            crate::Field::string("user", "alice"),
            crate::Field::u16("port", 80),
        ]);
        let entry = Entry {
            level: Level::Fatal,
            time: datetime!(2024-01-02 13:04:05.678 UTC),
            caller: "",
            message: "bye",
            fields: &fields,
        };
        assert_eq!(
            encode(Encoding::Console, &entry),
            "2024-01-02T13:04:05.678Z\tFATAL\tbye\t{\"user\":\"alice\",\"port\":80}\n"
        );
    }

    #[test]
    fn test_json_layout() {
        let fields = crate::field::render_fields(&[crate::Field::bool("ok", true)]);
        let entry = Entry {
            level: Level::Error,
            time: datetime!(2024-01-02 13:04:05.5 UTC),
            caller: "src/lib.rs:1",
            message: "failed: 42",
            fields: &fields,
        };
        let line = encode(Encoding::Json, &entry);
        assert!(line.ends_with('\n'));
        assert!(line.starts_with("{\"level\":\"error\",\"ts\":1704200645.5,"));

        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(
            value,
            json!({
                "level": "error",
                "ts": 1704200645.5,
                "caller": "src/lib.rs:1",
                "msg": "failed: 42",
                "ok": true
            })
        );
    }

    #[test]
    fn test_join_objects() {
        assert_eq!(join_objects("{\"a\":1}", ""), "{\"a\":1}");
        assert_eq!(join_objects("{\"a\":1}", "{}"), "{\"a\":1}");
        assert_eq!(join_objects("{}", "{\"b\":2}"), "{\"b\":2}");
        assert_eq!(
            join_objects("{\"a\":1}", "{\"b\":{\"c\":2}}"),
            "{\"a\":1,\"b\":{\"c\":2}}"
        );
    }

    #[test]
    fn test_json_user_field_shadows_reserved_key() {
        let fields = crate::field::render_fields(&[crate::Field::string("msg", "from field")]);
        let entry = Entry {
            level: Level::Info,
            time: datetime!(2024-01-02 13:04:05.5 UTC),
            caller: "",
            message: "from call",
            fields: &fields,
        };
        let line = encode(Encoding::Json, &entry);
        assert!(line.contains("\"msg\":\"from call\",\"msg\":\"from field\""));
        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["msg"], "from field");
    }

    #[test]
    fn test_visitor_uses_event_metadata_for_foreign_events() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(move || writer.clone())
            .event_format(EntryFormat::new(Encoding::Json))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(attempt = 3, fields = "not json", "plain tracing event");
        });

        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let value: Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["msg"], "plain tracing event");
        assert_eq!(value["attempt"], 3);
        assert_eq!(value["fields"], "not json");
        assert!(value["caller"].as_str().unwrap().contains("encoder.rs:"));
    }
}
