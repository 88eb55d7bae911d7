use thiserror::Error;

/// Returned when awaiting a pledge whose state was dropped before it
/// settled. Every producer capability is gone, so nothing can settle it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("pledge dropped before it settled")]
pub struct Closed;

/// Returned by [`Pledge::try_new`](crate::Pledge::try_new) when no resolver is given.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum PledgeError {
    #[error("resolver must be a function")]
    ResolverNotCallable,
}
