//! Document transforms.
//!
//! - `Transform` - one processing step over a `Document`
//! - `IdentityTransform` - the no-op step
//! - `Pipeline` - fluent wrapper that runs steps in order
//!
//! Composition steps live in [`crate::compose`].

mod core;
mod pipeline;

pub use core::{IdentityTransform, Transform};
pub use pipeline::Pipeline;
