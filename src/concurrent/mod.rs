//! Wait for several futures, then continue
//!
//! This module provides [`join`] and [`join_then`], the [`Join`] future they
//! return, and the [`JoinInputs`] shapes a join accepts.

mod inputs;
mod join;

pub use inputs::JoinInputs;
pub use join::{join, join_then, Join, Joiner};
