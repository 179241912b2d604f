//! Tracelink Core Library
//!
//! Unique 64-bit event IDs, causal event trees (root → parent → child), and
//! encoders and sinks for shipping the resulting entries as JSON, text lines,
//! or CSV, plus an HTTP header for carrying ancestry across processes.

pub mod config;
pub mod encoders;
pub mod error;
pub mod events;
pub mod ids;
pub mod sinks;
pub mod web;

// Re-export commonly used items at crate root
pub use config::TracerConfig;
pub use encoders::{Encoder, FlatJsonEncoder, JsonEncoder, TextEncoder, flatten};
pub use error::{Result, TraceError};
pub use events::{Entry, Event, Message, Metadata, ProcessIdentity, Properties, RawEntry, Tracer};
pub use ids::{EventId, Id, IdGenerator};
pub use sinks::{AsyncSink, DenormalizedCsvRecorder, NormalizedCsvRecorder, Sink, WriterSink};
pub use web::{EVENT_ID_HEADER, HttpRequest, get_event_id, set_event_id};
