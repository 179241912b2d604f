pub mod propagation;
pub mod request;

pub use propagation::*;
pub use request::*;
