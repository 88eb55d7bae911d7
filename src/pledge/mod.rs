mod chain;
mod pledge;
mod ptr;
mod settle;
mod settled;
mod shared_state;
mod walk;

pub(self) use ptr::Ptr;

pub use {
    chain::{Chain, MaybePledge, OnFulfilled, OnRejected},
    pledge::{is_pledge, Pledge, State},
    settle::{Fulfill, Reject},
    settled::Settled,
};
