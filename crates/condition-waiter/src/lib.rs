//! Condition Waiter
//!
//! A generic polling engine for eventually-consistent APIs. After a mutating
//! request has been accepted, a caller hands a probe (one read of the
//! resource's current state) to [`StateWaiter`], which polls it until the
//! observed state reaches a target label, the resource disappears (for
//! deletions), a terminal error occurs, or the timeout elapses.
//!
//! # Example
//!
//! ```no_run
//! use condition_waiter::{Probe, StateWaiter, WaitConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WaitConfig::new(Duration::from_secs(300))
//!     .pending(["Creating", ""])
//!     .target(["Succeeded"]);
//!
//! let resolved = StateWaiter::new(config)
//!     .wait(|| async {
//!         // Read the resource here.
//!         Ok::<_, std::io::Error>(Probe::found("Succeeded", 42_u32))
//!     })
//!     .await?;
//! assert_eq!(resolved.into_value(), Some(42));
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod error;
pub mod poller;

pub use backoff::{FibonacciBackoff, PollInterval};
pub use error::WaitError;
pub use poller::{Probe, Resolved, StateWaiter, WaitConfig, WaitState, wait_for_condition};
