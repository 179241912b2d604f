use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::{
    encoders::{Encoder, flatten},
    error::Result,
    events::{Entry, entry::serialize_envelope},
};

/// Newline-delimited JSON, one object per entry, payload under `event`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        serde_json::to_writer(&mut *buf, entry)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Like [`JsonEncoder`], but the payload is flattened into dotted-path keys
/// with string values, for sinks that only take flat key/value telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatJsonEncoder;

struct FlatEntry<'a> {
    entry: &'a Entry,
    event: BTreeMap<String, String>,
}

impl Serialize for FlatEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_envelope(self.entry, "event", &self.event, serializer)
    }
}

impl Encoder for FlatJsonEncoder {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let value = serde_json::to_value(entry.event())?;
        let flat = FlatEntry {
            entry,
            event: flatten(&value),
        };
        serde_json::to_writer(&mut *buf, &flat)?;
        buf.push(b'\n');
        Ok(())
    }
}
