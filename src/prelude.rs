//! Commonly used imports
//!
//! Use `use conjoin::prelude::*;` for quick access to the most common types and functions.

// Joining
pub use crate::concurrent::{join, join_then, Joiner};
pub use crate::compose::decorated_join;

// Inputs
pub use crate::promise::promise;
pub use crate::{rejected, resolved, Awaitable};

// Outcomes
pub use crate::{FailureOrigin, JoinError};

// Traits, for naming bounds
pub use crate::compose::Decorator;
pub use crate::{Continuation, JoinInputs};
