pub mod flatten;
pub mod json;
pub mod tabular;
pub mod text;

pub use flatten::*;
pub use json::*;
pub use tabular::*;
pub use text::*;

use std::{borrow::Cow, collections::BTreeMap};

use crate::{
    error::Result,
    events::{Entry, Event},
};

/// Serializes one entry. Fails only when the payload cannot be serialized.
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()>;

    fn to_bytes(&self, entry: &Entry) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(entry, &mut buf)?;
        Ok(buf)
    }
}

/// The key/value view of a payload used by the text and tabular encoders:
/// its explicit properties, or else its flattened JSON form.
pub fn payload_properties(event: &dyn Event) -> Result<Cow<'_, BTreeMap<String, String>>> {
    match event.properties() {
        Some(props) => Ok(Cow::Borrowed(props)),
        None => {
            let value = serde_json::to_value(event)?;
            Ok(Cow::Owned(flatten(&value)))
        }
    }
}
