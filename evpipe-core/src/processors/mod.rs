//! Processors of the propagator pipeline.
//!
//! - `Propagator`: on every tick picks a catalog event and hands it to the sender
//! - `EventSender`: delivers one event to the consumer and reports a `SendOutcome`

pub mod event_sender;
pub mod propagator;

pub use event_sender::{EventSender, SendOutcome};
pub use propagator::{Propagator, PropagatorState, PropagatorSummary};
