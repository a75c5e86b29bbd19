// src/transport.rs

//! Transport/identity capability consumed by the alerting client.
//!
//! The concrete implementation owns everything network-shaped: the secure
//! registration protocol, store-and-forward buffering, retry, back-pressure.
//! This crate only drives the lifecycle below and never inspects what happens
//! on the wire.
//!
//! Contract highlights:
//! - [`Transport::create`] hands back an exclusive [`Connection`]; there is
//!   no way to observe a half-built connection.
//! - [`Connection::send`] is one-way.  With the asynchronous delivery flags
//!   set, the implementation must queue the message and return immediately;
//!   delivery confirmation is never reported back to this layer.
//! - [`Connection::shutdown`] consumes the connection, so release happens at
//!   most once per connection by construction.

use thiserror::Error;

use crate::idmef::{AnalyzerDescriptor, IdmefMessage};

/// Opaque failure reported by the transport collaborator.
///
/// The client maps these into its own taxonomy (see [`crate::error`]); the
/// inner text is only ever used for logging.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Delivery-mode flags, set once right after connection creation and
/// immutable afterwards.  Both are forced on by the client so the detection
/// pipeline is never blocked by alert delivery, even under network stall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryFlags {
    pub async_timer: bool,
    pub async_send: bool,
}

/// Status reported to the manager when a connection is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

/// Process-wide entry points of the transport library.
pub trait Transport {
    type Conn: Connection;

    /// Initialize the library's process-wide state (environment, profile
    /// directories).  Must be called before [`Transport::create`].
    fn init(&self) -> Result<(), TransportError>;

    /// Create a connection object bound to `profile`, the name used to locate
    /// the cryptographic identity registered with the manager.
    fn create(&self, profile: &str) -> Result<Self::Conn, TransportError>;
}

/// One established (or in-progress) connection to the manager.
///
/// Implementations must be safe for concurrent `send` calls from multiple
/// producer threads; the client holds no lock around them.
pub trait Connection: Send + Sync {
    fn set_delivery_flags(&mut self, flags: DeliveryFlags) -> Result<(), TransportError>;

    /// Install the analyzer identity advertised to the manager during the
    /// handshake and attached to every alert.
    fn set_analyzer(&mut self, analyzer: AnalyzerDescriptor) -> Result<(), TransportError>;

    /// Perform the registration handshake with the manager.  May block for a
    /// network round trip; called once, at startup, off the hot path.
    fn start(&mut self) -> Result<(), TransportError>;

    /// Queue one alert for asynchronous delivery and return immediately.
    /// Ownership of the message moves to the transport; the caller holds no
    /// reference afterwards.
    fn send(&self, message: IdmefMessage);

    /// Release the connection, reporting `status` to the manager.
    fn shutdown(self, status: ExitStatus);
}
