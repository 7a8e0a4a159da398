//! KubeVirt API Client
//!
//! Thin typed access to the KubeVirt and CDI resources the provider manages:
//! create, get, merge-patch and delete, keyed by namespace and name.
//!
//! # Example
//!
//! ```no_run
//! use kubevirt_client::{KubeVirtClient, KubeVirtClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubeVirtClient::try_default().await?;
//!
//! match client.get_virtual_machine("default", "testvm").await? {
//!     Some(vm) => println!("found {:?}", vm.status),
//!     None => println!("not found"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Not found is not an error**: `get_*` returns `Ok(None)` on HTTP 404
//! - **Mocking**: `MockKubeVirtClient` (feature `test-util`) keeps objects in
//!   memory, replays scripted reads and counts reads and writes

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod kubevirt_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeVirtClient;
pub use error::ClientError;
pub use kubevirt_trait::KubeVirtClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockKubeVirtClient, MockRead};
