use std::{any::Any, collections::BTreeMap};

use erased_serde::Serialize as ErasedSerialize;

/// A record of the occurrence of something.
///
/// Payloads are opaque to the core: they only need a stable schema tag and a
/// serde representation. The line and tabular encoders project them into
/// string key/value pairs.
pub trait Event: Send + Sync + ErasedSerialize + 'static {
    /// Stable identifier of the payload's shape.
    fn schema(&self) -> &str;

    /// Human-readable message placed at the head of a text line.
    fn message(&self) -> Option<&str> {
        None
    }

    /// Explicit key/value properties. When `None`, encoders flatten the
    /// serialized payload instead.
    fn properties(&self) -> Option<&BTreeMap<String, String>> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

erased_serde::serialize_trait_object!(Event);

pub fn downcast_ref<T: 'static>(e: &dyn Event) -> Option<&T> {
    e.as_any().downcast_ref::<T>()
}
