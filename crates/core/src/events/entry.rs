use std::{fmt, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{
    Deserialize, Serialize, Serializer,
    de::DeserializeOwned,
    ser::SerializeStruct,
};
use serde_json::value::RawValue;

use crate::{
    error::Result,
    events::{Event, Metadata},
    ids::{EventId, Id, event_id::nonzero_parent},
};

/// An event together with its identity and metadata. Never mutated once built.
#[derive(Clone)]
pub struct Entry {
    id: EventId,
    metadata: Metadata,
    event: Arc<dyn Event>,
}

impl Entry {
    pub(crate) fn new(id: EventId, metadata: Metadata, event: Arc<dyn Event>) -> Self {
        Self {
            id,
            metadata,
            event,
        }
    }

    pub fn event_id(&self) -> &EventId {
        &self.id
    }

    pub fn root(&self) -> Id {
        self.id.root
    }

    pub fn id(&self) -> Id {
        self.id.id
    }

    pub fn parent(&self) -> Option<Id> {
        self.id.parent()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn schema(&self) -> &str {
        &self.metadata.schema
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.metadata.time
    }

    pub fn event(&self) -> &dyn Event {
        self.event.as_ref()
    }

    pub fn event_as<T: 'static>(&self) -> Option<&T> {
        self.event.as_any().downcast_ref::<T>()
    }

    /// RFC 3339 timestamp with nanosecond precision.
    pub fn time_rfc3339(&self) -> String {
        self.metadata.time.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_envelope(self, "event", self.event(), serializer)
    }
}

/// Writes the fixed entry fields followed by `payload` under `key`.
pub(crate) fn serialize_envelope<S, P>(
    entry: &Entry,
    key: &'static str,
    payload: &P,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize + ?Sized,
{
    let meta = &entry.metadata;
    let mut s = serializer.serialize_struct("Entry", 9)?;
    s.serialize_field("schema", &meta.schema)?;
    s.serialize_field("time", &entry.time_rfc3339())?;
    s.serialize_field("host", meta.host())?;
    match meta.deploy() {
        Some(deploy) => s.serialize_field("deploy", deploy)?,
        None => s.skip_field("deploy")?,
    }
    s.serialize_field("pid", &meta.pid())?;
    s.serialize_field("root", &entry.root())?;
    s.serialize_field("id", &entry.id())?;
    match entry.parent() {
        Some(parent) => s.serialize_field("parent", &parent)?,
        None => s.skip_field("parent")?,
    }
    s.serialize_field(key, payload)?;
    s.end()
}

/// A decoded entry whose payload is kept as raw JSON, so it can be read
/// without knowing the payload's schema.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    pub schema: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub deploy: Option<String>,
    pub pid: u32,
    pub root: Id,
    pub id: Id,
    #[serde(default, deserialize_with = "nonzero_parent")]
    pub parent: Option<Id>,
    pub event: Box<RawValue>,
}

impl RawEntry {
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn event_id(&self) -> EventId {
        EventId {
            root: self.root,
            id: self.id,
            parent: self.parent,
        }
    }

    pub fn raw_event(&self) -> &str {
        self.event.get()
    }

    pub fn decode_event<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(self.event.get())?)
    }
}
