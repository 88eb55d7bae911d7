use super::Pledge;
use crate::Value;
use std::{cell::Cell, rc::Rc};

// Both capabilities share one flag: whichever is called first settles the
// pledge, and every later call on either is ignored.
pub(crate) fn capabilities<T, E>(pledge: &Pledge<T, E>) -> (Fulfill<T, E>, Reject<T, E>) {
    let used = Rc::new(Cell::new(false));
    (
        Fulfill {
            pledge: pledge.clone(),
            used: used.clone(),
        },
        Reject {
            pledge: pledge.clone(),
            used,
        },
    )
}

/// The producer's capability to settle a pledge successfully.
pub struct Fulfill<T, E> {
    pledge: Pledge<T, E>,
    used: Rc<Cell<bool>>,
}

impl<T, E> Fulfill<T, E>
where
    T: Value,
    E: Value,
{
    /// Fulfill the pledge with `value` and run its fulfillment handlers.
    ///
    /// The `Err` case carries an error thrown by a rejection handler that ran
    /// because a fulfillment handler failed.
    pub fn fulfill(&self, value: T) -> Result<(), E> {
        if self.used.replace(true) {
            return Ok(());
        }
        self.pledge.settle_fulfilled(value)
    }

    /// Settle the pledge with the eventual outcome of `pledge`. Until that
    /// settles, this pledge stays pending.
    pub fn adopt(&self, pledge: Pledge<T, E>) -> Result<(), E> {
        if self.used.replace(true) {
            return Ok(());
        }
        self.pledge.adopt(pledge)
    }

    /// Whether this pledge's fulfill or reject capability has been called.
    pub fn is_used(&self) -> bool {
        self.used.get()
    }
}

/// The producer's capability to settle a pledge with a failure.
pub struct Reject<T, E> {
    pledge: Pledge<T, E>,
    used: Rc<Cell<bool>>,
}

impl<T, E> Reject<T, E>
where
    T: Value,
    E: Value,
{
    /// Reject the pledge with `reason` and run its rejection handlers. An
    /// error thrown by one of them is returned as is.
    pub fn reject(&self, reason: E) -> Result<(), E> {
        if self.used.replace(true) {
            return Ok(());
        }
        self.pledge.settle_rejected(reason)
    }

    /// Whether this pledge's fulfill or reject capability has been called.
    pub fn is_used(&self) -> bool {
        self.used.get()
    }
}

impl<T, E> Clone for Fulfill<T, E> {
    fn clone(&self) -> Self {
        Self {
            pledge: self.pledge.clone(),
            used: self.used.clone(),
        }
    }
}

impl<T, E> Clone for Reject<T, E> {
    fn clone(&self) -> Self {
        Self {
            pledge: self.pledge.clone(),
            used: self.used.clone(),
        }
    }
}
