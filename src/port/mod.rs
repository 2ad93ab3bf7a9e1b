//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement them to plug the engine into a live service, an
//! offline simulation, or a logging sink.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  (decide, select, run)  │
//!                    └─────────────────────────┘
//!                                │
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!   ┌─────────────┐       ┌─────────────┐       ┌───────────┐
//!   │  Backend    │       │    Clock    │       │ Notifier  │
//!   │ live / sim  │       │             │       │           │
//!   └─────────────┘       └─────────────┘       └───────────┘
//! ```

pub mod outbound;

pub use outbound::backend::{Ack, BoostOutcome, BoostRejection, ContestBackend, VoteBatch};
pub use outbound::clock::{Clock, SystemClock};
pub use outbound::notifier::{
    DecisionEvent, Event, Notifier, NotifierRegistry, NullNotifier, VoteEvent,
};
