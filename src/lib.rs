// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for host applications and
// integration tests.

//! Alerting client that bridges a local motion-detection pipeline to a remote
//! security-event manager.
//!
//! The host application creates one [`ClientContext`] at startup, calls
//! [`ClientContext::submit_alert`] once per qualifying detection event, and
//! consumes the context with [`ClientContext::destroy`] at shutdown.  All
//! network I/O, buffering and retry live behind the [`transport`] traits; the
//! delivery flags forced at initialization guarantee that `submit_alert`
//! never blocks on network state.

pub mod client;
pub mod config;
pub mod error;
pub mod idmef;
pub mod logging;
pub mod transport;

pub use client::{ClientContext, DetectionEvent};
pub use config::Config;
pub use error::AlertError;
