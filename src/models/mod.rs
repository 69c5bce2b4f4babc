//! Domain models
//!
//! Value types flowing through the execution core.

pub mod execution;
pub mod test_case;
pub mod verdict;

pub use execution::*;
pub use test_case::*;
pub use verdict::*;
