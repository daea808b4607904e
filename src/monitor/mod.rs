//! Polling consumer for the readings endpoint
//!
//! Provides:
//! - Explicit dashboard state updated one poll at a time (`state`)
//! - The HTTP client that produces poll outcomes (`poller`)

pub mod poller;
pub mod state;

pub use poller::Poller;
pub use state::{AnomalyEvent, ConnectionStatus, MonitorState, PollOutcome};
