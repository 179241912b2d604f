pub mod async_sink;
pub mod recorder;
pub mod writer;

pub use async_sink::*;
pub use recorder::*;
pub use writer::*;

use std::sync::Arc;

use crate::{error::Result, events::Entry};

/// Destination for finished entries. Implementations are shared between
/// threads; failures are returned, never retried.
pub trait Sink: Send + Sync {
    fn write(&self, entry: &Entry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, entry: &Entry) -> Result<()> {
        (**self).write(entry)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&self, entry: &Entry) -> Result<()> {
        (**self).write(entry)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
