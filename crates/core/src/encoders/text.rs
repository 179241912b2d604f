use std::io::Write;

use chrono::SecondsFormat;

use crate::{
    encoders::{Encoder, payload_properties},
    error::Result,
    events::Entry,
};

/// One line per entry: the optional message, then `key="value"` pairs.
///
/// Fixed keys come first (`schema`, `root`, `id`, `parent` when present,
/// `time`), followed by the payload properties in key order.
///
/// Values use JSON string escaping. The message is escaped the same way but
/// written without quotes, so neither can break the line. Property keys are
/// written bare unless they contain whitespace, `=`, `"` or control
/// characters, in which case they are quoted like values.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let props = payload_properties(entry.event())?;

        if let Some(msg) = entry.event().message() {
            let escaped = quote(msg)?;
            write!(buf, "{} ", &escaped[1..escaped.len() - 1])?;
        }
        write!(buf, "schema={}", quote(entry.schema())?)?;
        write!(buf, " root=\"{}\" id=\"{}\"", entry.root(), entry.id())?;
        if let Some(parent) = entry.parent() {
            write!(buf, " parent=\"{parent}\"")?;
        }
        let time = entry.time().to_rfc3339_opts(SecondsFormat::Secs, true);
        write!(buf, " time=\"{time}\"")?;

        for (key, value) in props.iter() {
            if is_bare_key(key) {
                write!(buf, " {key}={}", quote(value)?)?;
            } else {
                write!(buf, " {}={}", quote(key)?, quote(value)?)?;
            }
        }
        buf.push(b'\n');
        Ok(())
    }
}

fn quote(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

#[cfg(test)]
mod tests {
    use std::{any::Any, collections::BTreeMap, sync::Arc};

    use chrono::{TimeZone, Utc};
    use serde::Serialize;

    use super::*;
    use crate::{
        events::{Event, Message, Metadata, ProcessIdentity, Properties},
        ids::{EventId, Id},
    };

    fn entry(id: EventId, event: Arc<dyn Event>) -> Entry {
        let process = Arc::new(ProcessIdentity::new("web-1", None, 7));
        let metadata = Metadata {
            schema: event.schema().to_owned(),
            time: Utc.with_ymd_and_hms(2014, 4, 23, 12, 15, 32).unwrap(),
            process,
        };
        Entry::new(id, metadata, event)
    }

    fn line(e: &Entry) -> String {
        String::from_utf8(TextEncoder.to_bytes(e).unwrap()).unwrap()
    }

    fn child_id() -> EventId {
        EventId {
            root: Id::new(100),
            id: Id::new(200),
            parent: Some(Id::new(150)),
        }
    }

    #[test]
    fn full_line() {
        let mut p = Properties::new("type").with_message("msg");
        p.add("yay", "whee").add("abc", "first");
        let e = entry(child_id(), Arc::new(p));
        assert_eq!(
            line(&e),
            "msg schema=\"type\" root=\"0000000000000064\" id=\"00000000000000c8\" \
             parent=\"0000000000000096\" time=\"2014-04-23T12:15:32Z\" abc=\"first\" yay=\"whee\"\n"
        );
    }

    #[test]
    fn root_line_omits_parent() {
        let id = EventId {
            parent: None,
            ..child_id()
        };
        let e = entry(id, Arc::new(Message::new("hello")));
        assert_eq!(
            line(&e),
            "hello schema=\"message\" root=\"0000000000000064\" id=\"00000000000000c8\" \
             time=\"2014-04-23T12:15:32Z\"\n"
        );
    }

    #[test]
    fn values_are_escaped() {
        let mut p = Properties::new("q");
        p.add("quote", "say \"hi\"\n");
        let e = entry(child_id(), Arc::new(p));
        assert!(line(&e).ends_with(" quote=\"say \\\"hi\\\"\\n\"\n"));
    }

    #[test]
    fn message_stays_on_one_line() {
        let e = entry(child_id(), Arc::new(Message::new("line one\r\nline \"two\"")));
        let out = line(&e);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("line one\\r\\nline \\\"two\\\" schema=\"message\" "), "{out}");
    }

    #[test]
    fn awkward_keys_are_quoted() {
        let mut p = Properties::new("q");
        p.add("plain", "a").add("has space", "b").add("k=v", "c").add("", "d");
        let out = line(&entry(child_id(), Arc::new(p)));
        assert!(
            out.ends_with(" \"\"=\"d\" \"has space\"=\"b\" \"k=v\"=\"c\" plain=\"a\"\n"),
            "{out}"
        );
    }

    #[test]
    fn control_characters_use_json_escapes() {
        let mut p = Properties::new("q");
        p.add("esc", "\u{1b}[0m");
        let e = entry(child_id(), Arc::new(p));
        assert!(line(&e).ends_with(" esc=\"\\u001b[0m\"\n"));
    }

    #[derive(Serialize)]
    struct Query {
        sql: String,
        rows: u32,
        tags: BTreeMap<String, bool>,
    }

    impl Event for Query {
        fn schema(&self) -> &str {
            "db.query"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn structured_payload_is_flattened() {
        let q = Query {
            sql: "SELECT 1".into(),
            rows: 3,
            tags: BTreeMap::from([("slow".to_owned(), true)]),
        };
        let e = entry(child_id(), Arc::new(q));
        assert!(line(&e).ends_with(" rows=\"3\" sql=\"SELECT 1\" tags.slow=\"true\"\n"));
    }
}
