//! Quote poller module
//!
//! Drives the fetch-normalize cycle on a fixed delay, holds the last good
//! series and price observation, and fans snapshots out to subscribers.

mod quote_poller;
mod state;
mod subscribers;

pub use quote_poller::{PollerHandle, QuotePoller, DEFAULT_SUBSCRIBER_BUFFER};
pub use state::{
    direction, Direction, NormalizedUpdate, PriceObservation, QuoteSnapshot, QuoteState,
};
pub use subscribers::{Subscription, SubscriptionId};
