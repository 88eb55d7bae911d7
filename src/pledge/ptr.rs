use by_address::ByAddress;
use std::{hash::Hash, ops::Deref, rc::Rc};

/// This type is a thin wrapper around T to enable cheap clone and comparisons.
/// Internally it is an Rc that is compared by address instead of by the
/// implementation of the pointed to value. Two pledges are the same pledge
/// exactly when their Ptrs are equal.
#[repr(transparent)]
pub(crate) struct Ptr<T> {
    inner: ByAddress<Rc<T>>,
}

impl<T> Ptr<T> {
    #[inline]
    pub fn new(wrapped: T) -> Self {
        Self {
            inner: ByAddress(Rc::new(wrapped)),
        }
    }

    #[cfg(test)]
    pub fn strong_count(this: &Self) -> usize {
        Rc::strong_count(&this.inner.0)
    }
}

impl<T> Deref for Ptr<T> {
    type Target = T;
    #[inline]
    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

impl<T> Hash for Ptr<T> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}

impl<T> PartialEq for Ptr<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<T> Eq for Ptr<T> {}

impl<T> Clone for Ptr<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
