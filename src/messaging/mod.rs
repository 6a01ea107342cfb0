//! AMQP RPC surface.
//!
//! Five operation queues bind to one direct exchange whose arguments
//! advertise the analyzer to the platform. Each queue gets a single
//! long-lived consumer; deliveries fan out to short-lived worker
//! tasks. A delivery is acked only after its handler succeeded and the
//! reply (when requested) was published, so at-least-once redelivery
//! is safe: indexing overwrites by id, analysis is pure, deletes are
//! idempotent.

pub mod consumer;
pub mod error;

pub use consumer::{connect, declare_topology, ConsumerPool, Operation};
pub use error::{MessagingError, MessagingResult};
