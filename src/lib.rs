//! Deferred values for a single thread of control.
//!
//! A [`Pledge`] represents the outcome of an operation that has not
//! completed yet. The producer settles it exactly once through the
//! [`Fulfill`] and [`Reject`] capabilities handed to its resolver; consumers
//! register handlers with [`Pledge::then`] and [`Pledge::catch`], before or
//! after settlement.
//!
//! Chaining happens in place: every `then` returns the same pledge, and the
//! value a handler hands back becomes the input of the next handler in the
//! queue. A handler that hands back another pledge pauses the chain until
//! that pledge settles.
//!
//! ```
//! use pledge::{Chain, Pledge, State};
//!
//! let pledge = Pledge::<u32, String>::resolve(1)
//!     .then(|v| Ok(Chain::Value(v + 1)))?
//!     .then(|v| Ok(Chain::Value(v * 2)))?;
//!
//! assert_eq!(pledge.state(), State::Fulfilled);
//! assert_eq!(pledge.result(), Some(Ok(4)));
//! # Ok::<(), String>(())
//! ```

mod combinators;
mod error;
mod handlers;
mod pledge;

pub use combinators::*;
pub use error::{Closed, PledgeError};
pub use pledge::*;

/// Bound shared by every value and reason carried by a pledge.
///
/// Handlers receive clones of the current result, so values need to be
/// `Clone`. Nothing is required to be `Send`: pledges never leave the thread
/// that created them.
pub trait Value: 'static + Clone {}

impl<T> Value for T where T: 'static + Clone {}
