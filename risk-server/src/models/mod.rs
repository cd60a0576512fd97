//! Request and response bodies

pub mod batch;
pub mod prediction;
pub mod status;

pub use batch::*;
pub use prediction::*;
pub use status::*;
