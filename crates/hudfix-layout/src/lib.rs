//! HUD layout transforms
//!
//! A [`Transform`] rewrites one layout entry's payload for a given target
//! resolution. Transforms are pure: no I/O, same output for the same input.
//! [`CentralReanchor`] is the transform hudfix applies to `.ini` layout
//! entries.

pub mod error;
pub mod reanchor;

pub use error::{Error, Result};
pub use reanchor::CentralReanchor;

/// Suffix of the entries layout transforms apply to
pub const LAYOUT_SUFFIX: &str = ".ini";

/// Rewrites a layout payload for a target resolution.
pub trait Transform {
    fn apply(&self, payload: &[u8], target: u32) -> Result<Vec<u8>>;
}

impl<F> Transform for F
where
    F: Fn(&[u8], u32) -> Result<Vec<u8>>,
{
    fn apply(&self, payload: &[u8], target: u32) -> Result<Vec<u8>> {
        self(payload, target)
    }
}
