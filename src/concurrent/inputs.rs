//! Aggregation of a join's inputs.
//!
//! [`JoinInputs`] turns an ordered set of futures into one future of their
//! ordered values, failing as soon as any input fails. The all-of-N work is
//! done by the `futures` crate (`try_join`, `try_join3`..`try_join5`,
//! `try_join_all`); this module only picks the right one for each shape.

use futures::future::{self, MapOk, Ready, TryJoinAll};
use futures::{TryFuture, TryFutureExt};

/// An ordered set of futures that a join waits on.
///
/// Implemented for:
///
/// - `()`, no inputs at all,
/// - tuples of one to five futures sharing an error type,
/// - `Vec<F>`, any number of futures of the same type.
///
/// `E` is the shared error type. For `()` it is left open and picked up
/// from the continuation.
pub trait JoinInputs<E> {
    /// Resolved values, in input order.
    type Values;

    /// Future of all values, or of the first failure.
    type Aggregate: TryFuture<Ok = Self::Values, Error = E>;

    /// Number of inputs.
    fn arity(&self) -> usize;

    /// Wait for all inputs together.
    fn aggregate(self) -> Self::Aggregate;
}

impl<E> JoinInputs<E> for () {
    type Values = ();
    type Aggregate = Ready<Result<(), E>>;

    fn arity(&self) -> usize {
        0
    }

    fn aggregate(self) -> Self::Aggregate {
        future::ok(())
    }
}

fn single<T>(value: T) -> (T,) {
    (value,)
}

impl<F1> JoinInputs<F1::Error> for (F1,)
where
    F1: TryFuture,
{
    type Values = (F1::Ok,);
    type Aggregate = MapOk<F1, fn(F1::Ok) -> (F1::Ok,)>;

    fn arity(&self) -> usize {
        1
    }

    fn aggregate(self) -> Self::Aggregate {
        self.0.map_ok(single as fn(F1::Ok) -> (F1::Ok,))
    }
}

macro_rules! tuple_inputs {
    ($(($arity:literal, $TryJoin:ident, $try_join:ident, $F1:ident $(, $F:ident)+),)*) => {
        $(
            #[allow(non_snake_case)]
            impl<$F1 $(, $F)+> JoinInputs<$F1::Error> for ($F1 $(, $F)+)
            where
                $F1: TryFuture,
                $($F: TryFuture<Error = $F1::Error>,)+
            {
                type Values = ($F1::Ok $(, $F::Ok)+);
                type Aggregate = future::$TryJoin<$F1 $(, $F)+>;

                fn arity(&self) -> usize {
                    $arity
                }

                fn aggregate(self) -> Self::Aggregate {
                    let ($F1 $(, $F)+) = self;
                    future::$try_join($F1 $(, $F)+)
                }
            }
        )*
    };
}

tuple_inputs! {
    (2, TryJoin, try_join, F1, F2),
    (3, TryJoin3, try_join3, F1, F2, F3),
    (4, TryJoin4, try_join4, F1, F2, F3, F4),
    (5, TryJoin5, try_join5, F1, F2, F3, F4, F5),
}

impl<F> JoinInputs<F::Error> for Vec<F>
where
    F: TryFuture,
{
    type Values = Vec<F::Ok>;
    type Aggregate = TryJoinAll<F>;

    fn arity(&self) -> usize {
        self.len()
    }

    fn aggregate(self) -> Self::Aggregate {
        future::try_join_all(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rejected, resolved};
    use futures::executor::block_on;

    #[test]
    fn test_empty_inputs_resolve_to_unit() {
        let aggregate = JoinInputs::<&str>::aggregate(());
        assert_eq!(block_on(aggregate), Ok(()));
    }

    #[test]
    fn test_tuple_values_keep_input_order() {
        let inputs = (
            resolved::<_, &str>(1_u8),
            resolved("two"),
            resolved(3.0_f64),
            resolved('4'),
            resolved(String::from("five")),
        );
        assert_eq!(inputs.arity(), 5);

        let values = block_on(inputs.aggregate()).unwrap();
        assert_eq!(values, (1, "two", 3.0, '4', "five".to_string()));
    }

    #[test]
    fn test_single_input_is_wrapped_in_a_tuple() {
        let values = block_on((resolved::<_, ()>(9),).aggregate());
        assert_eq!(values, Ok((9,)));
    }

    #[test]
    fn test_first_failure_is_passed_through() {
        let inputs = (resolved(1), rejected::<i32, _>("bad"), rejected::<i32, _>("worse"));
        assert_eq!(block_on(inputs.aggregate()), Err("bad"));
    }

    #[test]
    fn test_vec_inputs() {
        let inputs: Vec<_> = (1..=4).map(resolved::<u32, ()>).collect();
        assert_eq!(inputs.arity(), 4);
        assert_eq!(block_on(inputs.aggregate()), Ok(vec![1, 2, 3, 4]));

        let empty: Vec<futures::future::Ready<Result<u32, ()>>> = Vec::new();
        assert_eq!(block_on(empty.aggregate()), Ok(vec![]));
    }
}
