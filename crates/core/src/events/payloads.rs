use std::{any::Any, collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    events::{Event, RawEntry},
};

static NO_PROPERTIES: BTreeMap<String, String> = BTreeMap::new();

/// A free-form human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub const SCHEMA: &'static str = "message";

    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl Event for Message {
    fn schema(&self) -> &str {
        Self::SCHEMA
    }

    fn message(&self) -> Option<&str> {
        Some(&self.msg)
    }

    fn properties(&self) -> Option<&BTreeMap<String, String>> {
        Some(&NO_PROPERTIES)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A generic event: a caller-chosen schema, an optional message and a bag of
/// string properties.
///
/// The schema lives on the envelope, not in the payload JSON. Decode with
/// [`Properties::from_raw`] to get it back; plain deserialization leaves it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(skip)]
    schema: String,
    #[serde(rename = "msg", default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(rename = "p", default)]
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            message: None,
            values: BTreeMap::new(),
        }
    }

    /// Decodes the payload of a raw entry, taking the schema from the entry.
    pub fn from_raw(raw: &RawEntry) -> Result<Self> {
        let mut props: Self = raw.decode_event()?;
        props.schema = raw.schema.clone();
        Ok(props)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Associates `key` with the `Display` form of `value`, replacing any
    /// previous value.
    pub fn add(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl Event for Properties {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn properties(&self) -> Option<&BTreeMap<String, String>> {
        Some(&self.values)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
