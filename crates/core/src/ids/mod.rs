pub mod event_id;
pub mod generator;
pub mod id;

pub use event_id::*;
pub use generator::*;
pub use id::*;
