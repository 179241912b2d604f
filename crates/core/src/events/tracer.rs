use std::sync::Arc;

use crate::{
    events::{Entry, Event, Metadata, ProcessIdentity},
    ids::{EventId, IdGenerator},
};

/// Builds entries: mints identities and attaches process metadata.
#[derive(Clone)]
pub struct Tracer {
    inner: Arc<TracerInner>,
}

struct TracerInner {
    ids: IdGenerator,
    process: Arc<ProcessIdentity>,
}

impl Tracer {
    pub fn new(ids: IdGenerator, process: ProcessIdentity) -> Self {
        Self {
            inner: Arc::new(TracerInner {
                ids,
                process: Arc::new(process),
            }),
        }
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.inner.ids
    }

    pub fn process(&self) -> &ProcessIdentity {
        &self.inner.process
    }

    pub fn root_id(&self) -> EventId {
        EventId::new_root(&self.inner.ids)
    }

    pub fn child_id(&self, parent: &EventId) -> EventId {
        parent.derive(&self.inner.ids)
    }

    /// An entry for an event with no known predecessor.
    pub fn root<E: Event>(&self, event: E) -> Entry {
        self.entry(self.root_id(), Arc::new(event))
    }

    /// An entry for an event caused by `parent`.
    pub fn child<E: Event>(&self, parent: &EventId, event: E) -> Entry {
        self.entry(self.child_id(parent), Arc::new(event))
    }

    /// An entry under an identity minted by the caller.
    pub fn entry(&self, id: EventId, event: Arc<dyn Event>) -> Entry {
        let metadata = Metadata::capture(event.schema(), &self.inner.process);
        Entry::new(id, metadata, event)
    }
}
