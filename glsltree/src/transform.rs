//! Tree transformations built on the scope registries

mod rename;
pub use rename::*;
