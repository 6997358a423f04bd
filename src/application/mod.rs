pub mod artifacts;
pub mod inference;
pub mod ml;
