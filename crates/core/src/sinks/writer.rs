use std::io::Write;

use parking_lot::Mutex;

use crate::{
    encoders::{Encoder, FlatJsonEncoder, JsonEncoder, TextEncoder},
    error::Result,
    events::Entry,
    sinks::Sink,
};

/// Encodes each entry and writes it to an `io::Write` in one call.
///
/// Entries are encoded outside the lock, so a payload that fails to serialize
/// leaves no partial output behind.
pub struct WriterSink<W, E> {
    writer: Mutex<W>,
    encoder: E,
}

impl<W: Write + Send, E: Encoder> WriterSink<W, E> {
    pub fn new(writer: W, encoder: E) -> Self {
        Self {
            writer: Mutex::new(writer),
            encoder,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> WriterSink<W, JsonEncoder> {
    pub fn json(writer: W) -> Self {
        Self::new(writer, JsonEncoder)
    }
}

impl<W: Write + Send> WriterSink<W, FlatJsonEncoder> {
    pub fn flat_json(writer: W) -> Self {
        Self::new(writer, FlatJsonEncoder)
    }
}

impl<W: Write + Send> WriterSink<W, TextEncoder> {
    pub fn text(writer: W) -> Self {
        Self::new(writer, TextEncoder)
    }
}

impl<W: Write + Send, E: Encoder> Sink for WriterSink<W, E> {
    fn write(&self, entry: &Entry) -> Result<()> {
        let buf = self.encoder.to_bytes(entry)?;
        self.writer.lock().write_all(&buf)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
