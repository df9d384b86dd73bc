//! Decorating join inputs
//!
//! A decorator maps each raw input of a join to a future before the join
//! waits on it. This module provides the [`Decorator`] trait, decorator
//! chaining, and [`decorated_join`], which builds a join that decorates
//! every input it is given.

mod chain;
mod decorated;
mod decorator;
mod map;

pub use chain::{then, Then, ThenFuture};
pub use decorated::{decorated_join, DecoratedJoin};
pub use decorator::{fallible, Decorator, Fallible};
pub use map::DecorateInputs;
