//! In-memory implementations of the saga's collaborator ports.
//!
//! For tests and examples only; real deployments wire the ports to a
//! document store, a queue service, the subscription feed and a delivery
//! transport. Every adapter records what it received and can inject
//! transient failures via `fail_next(n)` to exercise the retry policy:
//!
//! - [`MemoryStore`] - versioned profile chains, idempotent
//!   service-preference creation, and the token table
//! - [`MemoryQueue`] - named queues of JSON payloads
//! - [`MemoryFeed`] - recorded subscription events
//! - [`MemoryTransport`] - recorded outbound messages

mod failure;
mod feed;
mod queue;
mod store;
mod transport;

pub use feed::MemoryFeed;
pub use queue::MemoryQueue;
pub use store::MemoryStore;
pub use transport::MemoryTransport;
