use super::Pledge;
use crate::Value;

/// What a handler hands back to the walk that invoked it.
///
/// `V` is the type flowing through the queue being walked: the value `T`
/// for fulfillment handlers, the reason `E` for rejection handlers.
pub enum Chain<V, T, E> {
    /// Leave the current result as it is. This is a handler that returns
    /// nothing.
    Keep,
    /// Replace the current result. The next handler in the same queue
    /// receives this value.
    Value(V),
    /// Pause the chain and follow this pledge. The handlers not yet invoked
    /// resume once it settles, with its value or reason.
    Adopt(Pledge<T, E>),
}

impl<V, T, E> From<Pledge<T, E>> for Chain<V, T, E> {
    #[inline]
    fn from(pledge: Pledge<T, E>) -> Self {
        Chain::Adopt(pledge)
    }
}

/// A fulfillment handler. Returning `Err` is a synchronous failure: the
/// pledge is rejected with that reason.
pub type OnFulfilled<T, E> = Box<dyn FnOnce(T) -> Result<Chain<T, T, E>, E>>;

/// A rejection handler. Returning `Err` is NOT turned into a rejection, it
/// escapes to whatever triggered the rejection walk.
pub type OnRejected<T, E> = Box<dyn FnOnce(E) -> Result<Chain<E, T, E>, E>>;

/// Either a plain value or a pledge that will produce one.
pub enum MaybePledge<T, E> {
    Value(T),
    Pledge(Pledge<T, E>),
}

impl<T, E> MaybePledge<T, E>
where
    T: Value,
    E: Value,
{
    pub fn is_pledge(&self) -> bool {
        matches!(self, MaybePledge::Pledge(_))
    }

    /// Plain values are lifted with [`Pledge::resolve`].
    pub fn into_pledge(self) -> Pledge<T, E> {
        match self {
            MaybePledge::Value(value) => Pledge::resolve(value),
            MaybePledge::Pledge(pledge) => pledge,
        }
    }
}

impl<T, E> From<Pledge<T, E>> for MaybePledge<T, E> {
    #[inline]
    fn from(pledge: Pledge<T, E>) -> Self {
        MaybePledge::Pledge(pledge)
    }
}
