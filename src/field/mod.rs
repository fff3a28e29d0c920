pub mod artifact;
pub mod spec;

pub use artifact::*;
pub use spec::*;
