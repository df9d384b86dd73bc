//! Mapping a decorator over every input of a join.

use crate::compose::Decorator;

/// Raw inputs that a decorator can be mapped over, keeping length and order.
///
/// Implemented for `()`, tuples of one to five raw values and `Vec<X>`.
/// The result is something [`JoinInputs`](crate::concurrent::JoinInputs)
/// accepts.
pub trait DecorateInputs<D> {
    /// The decorated futures, same shape as `Self`.
    type Decorated;

    fn decorate_with(self, decorator: &D) -> Self::Decorated;
}

impl<D> DecorateInputs<D> for () {
    type Decorated = ();

    fn decorate_with(self, _decorator: &D) -> Self::Decorated {}
}

macro_rules! tuple_decorate {
    ($(($($X:ident),+),)*) => {
        $(
            #[allow(non_snake_case)]
            impl<D, $($X),+> DecorateInputs<D> for ($($X,)+)
            where
                $(D: Decorator<$X>,)+
            {
                type Decorated = ($(<D as Decorator<$X>>::Future,)+);

                fn decorate_with(self, decorator: &D) -> Self::Decorated {
                    let ($($X,)+) = self;
                    ($(<D as Decorator<$X>>::decorate(decorator, $X),)+)
                }
            }
        )*
    };
}

tuple_decorate! {
    (X1),
    (X1, X2),
    (X1, X2, X3),
    (X1, X2, X3, X4),
    (X1, X2, X3, X4, X5),
}

impl<D, X> DecorateInputs<D> for Vec<X>
where
    D: Decorator<X>,
{
    type Decorated = Vec<D::Future>;

    fn decorate_with(self, decorator: &D) -> Self::Decorated {
        self.into_iter().map(|raw| decorator.decorate(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrent::JoinInputs;
    use crate::resolved;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[test]
    fn test_decorator_sees_every_input_in_order() {
        let seen = RefCell::new(Vec::new());
        let tag = |raw: &'static str| {
            seen.borrow_mut().push(raw);
            resolved::<_, ()>(raw.to_uppercase())
        };

        let decorated = ("a", "b", "c").decorate_with(&tag);
        assert_eq!(&*seen.borrow(), &["a", "b", "c"]);

        let values = block_on(decorated.aggregate());
        assert_eq!(
            values,
            Ok(("A".to_string(), "B".to_string(), "C".to_string()))
        );
    }

    #[test]
    fn test_empty_inputs_are_never_decorated() {
        let calls = RefCell::new(0);
        let count = |x: u8| {
            *calls.borrow_mut() += 1;
            resolved::<_, ()>(x)
        };

        ().decorate_with(&count);
        Vec::<u8>::new().decorate_with(&count);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_vec_keeps_length_and_order() {
        let square = |x: u32| resolved::<_, ()>(x * x);
        let decorated = vec![1, 2, 3].decorate_with(&square);
        assert_eq!(decorated.len(), 3);
        assert_eq!(block_on(decorated.aggregate()), Ok(vec![1, 4, 9]));
    }
}
