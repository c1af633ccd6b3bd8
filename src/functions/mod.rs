//! The built-in operation catalog.
//!
//! Direct functions deal with `null` themselves (coercions, boolean folds, defaults and sequence
//! slicing). Everything else is registered through [`Maybe`](crate::registry::Maybe) and never
//! sees a `null`. Values of the wrong kind are a data problem, not an error: those operations
//! return `null`. Only a wrong argument count fails the transformation.
pub mod coerce;
mod hash;
mod math;
pub(crate) mod sequence;
mod text;

use crate::errors::{Error, Result};
use crate::registry::Registry;
use serde_json::Value;

pub(crate) fn install(registry: &mut Registry) {
    coerce::install(registry);
    sequence::install(registry);
    text::install(registry);
    math::install(registry);
    hash::install(registry);
}

#[inline]
pub(crate) fn arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::invalid_arguments(format!(
            "expected {} argument(s), received {}",
            expected,
            args.len()
        )))
    }
}

#[inline]
pub(crate) fn at_most(args: &[Value], max: usize) -> Result<()> {
    if args.len() <= max {
        Ok(())
    } else {
        Err(Error::invalid_arguments(format!(
            "expected at most {} argument(s), received {}",
            max,
            args.len()
        )))
    }
}
