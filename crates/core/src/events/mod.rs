pub mod entry;
pub mod event;
pub mod metadata;
pub mod payloads;
pub mod tracer;

pub use entry::*;
pub use event::*;
pub use metadata::*;
pub use payloads::*;
pub use tracer::*;
