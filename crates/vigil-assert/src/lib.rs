//! Shape assertions over JSON response bodies.
//!
//! Rules never panic and never return errors: a missing field or a value of
//! the wrong type is reported as a failed [`AssertionOutcome`].
//!
//! [`AssertionOutcome`]: vigil_models::AssertionOutcome

pub mod compare;
pub mod engine;
pub mod number;
pub mod path;

pub use compare::compare_across;
pub use engine::{assert_shape, evaluate};
pub use path::{json_kind, resolve, PathMiss};
