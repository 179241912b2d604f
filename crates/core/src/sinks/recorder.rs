use std::io::Write;

use csv::WriterBuilder;
use parking_lot::Mutex;

use crate::{
    encoders::{denormalized_rows, event_row, property_rows},
    error::{Result, TraceError},
    events::Entry,
    sinks::Sink,
};

/// CSV-encodes `rows` into a scratch buffer, so nothing reaches a stream
/// until every row of the entry has been built.
fn encode_rows<I>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator,
    I::Item: IntoIterator,
    <I::Item as IntoIterator>::Item: AsRef<[u8]>,
{
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for row in rows {
        w.write_record(row)?;
    }
    w.into_inner().map_err(|e| TraceError::Io(e.into_error()))
}

/// Writes one row per entry to an events stream and one row per payload
/// property to a properties stream.
///
/// Each stream receives an entry's rows in a single `write_all`. The two
/// streams are independent though: if the properties stream fails, the event
/// row is already written and the error is returned.
pub struct NormalizedCsvRecorder<E: Write, P: Write> {
    streams: Mutex<(E, P)>,
}

impl<E: Write + Send, P: Write + Send> NormalizedCsvRecorder<E, P> {
    pub fn new(events: E, props: P) -> Self {
        Self {
            streams: Mutex::new((events, props)),
        }
    }

    pub fn into_inner(self) -> (E, P) {
        self.streams.into_inner()
    }
}

impl<E: Write + Send, P: Write + Send> Sink for NormalizedCsvRecorder<E, P> {
    fn write(&self, entry: &Entry) -> Result<()> {
        let events = encode_rows([&event_row(entry)])?;
        let props = encode_rows(&property_rows(entry)?)?;

        let mut streams = self.streams.lock();
        streams.0.write_all(&events)?;
        if !props.is_empty() {
            streams.1.write_all(&props)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut streams = self.streams.lock();
        streams.0.flush()?;
        streams.1.flush()?;
        Ok(())
    }
}

/// Writes every property as one row, with the event columns repeated. All
/// rows of an entry go out in one `write_all`.
pub struct DenormalizedCsvRecorder<W: Write> {
    stream: Mutex<W>,
}

impl<W: Write + Send> DenormalizedCsvRecorder<W> {
    pub fn new(w: W) -> Self {
        Self {
            stream: Mutex::new(w),
        }
    }

    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }
}

impl<W: Write + Send> Sink for DenormalizedCsvRecorder<W> {
    fn write(&self, entry: &Entry) -> Result<()> {
        let rows = encode_rows(&denormalized_rows(entry)?)?;
        self.stream.lock().write_all(&rows)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.stream.lock().flush()?;
        Ok(())
    }
}
