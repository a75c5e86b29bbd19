// src/idmef.rs

//! IDMEF-equivalent alert records.
//!
//! This module defines the structured schema exchanged with the manager
//! (analyzer identity, classification, timestamps) and the stepwise builder
//! used to populate it.  Records are ephemeral: one is built per detection
//! event, handed to the transport, and never referenced again.
//!
//! ## Formats Supported
//! - `serde` for JSON serialization (logging, persistence, test assertions)
//!
//! ## Builder discipline
//! Construction mirrors the envelope nesting: message → alert →
//! classification → text, then detect/create times.  Every step is fallible
//! and short-circuits the rest; a partially built record is simply dropped,
//! never leaked and never sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed identity metadata describing the sending application to the manager.
///
/// The four strings are advertised during the registration handshake and must
/// match what existing manager deployments expect, so they are treated as
/// interoperability constants (see [`crate::client`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerDescriptor {
    pub model: String,
    pub class: String,
    pub manufacturer: String,
    pub version: String,
}

/// Human-readable event kind carried inside an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub text: String,
}

/// One alert envelope: what was detected, and when.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub classification: Option<Classification>,
    pub detect_time: Option<DateTime<Utc>>,
    pub create_time: Option<DateTime<Utc>>,
}

/// Top-level message envelope sent to the manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdmefMessage {
    pub alert: Option<Alert>,
}

impl IdmefMessage {
    /// Encode the record as a JSON payload.  Used by transports that speak
    /// JSON on the wire and by test assertions.
    pub fn to_json(&self) -> Result<String, MessageBuildError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A construction step failed.  Fatal for the record being built, harmless
/// for the client that requested it.
#[derive(Debug, Error)]
pub enum MessageBuildError {
    #[error("no alert envelope in message; call new_alert first")]
    MissingAlert,
    #[error("no classification in alert; call new_classification first")]
    MissingClassification,
    #[error("classification text must not be empty")]
    EmptyText,
    #[error("alert is missing its classification text")]
    IncompleteRecord,
    #[error("failed to encode alert payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Stepwise builder for one [`IdmefMessage`].
///
/// Steps must be called in nesting order; calling one before its parent
/// envelope exists is an error rather than a panic, matching the fallible
/// construction chain of the wire schema.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    message: IdmefMessage,
}

impl MessageBuilder {
    /// Start an empty message envelope.
    pub fn new_message() -> Self {
        Self::default()
    }

    /// Add the alert envelope to the message.
    pub fn new_alert(&mut self) -> &mut Self {
        self.message.alert.get_or_insert_with(Alert::default);
        self
    }

    /// Add an (empty) classification to the alert.
    pub fn new_classification(&mut self) -> Result<&mut Self, MessageBuildError> {
        let alert = self.message.alert.as_mut().ok_or(MessageBuildError::MissingAlert)?;
        alert.classification.get_or_insert_with(|| Classification { text: String::new() });
        Ok(self)
    }

    /// Set the classification text.  Empty text is rejected so a record can
    /// never reach the manager without a readable event kind.
    pub fn set_text(&mut self, text: &str) -> Result<&mut Self, MessageBuildError> {
        if text.is_empty() {
            return Err(MessageBuildError::EmptyText);
        }
        let class = self
            .message
            .alert
            .as_mut()
            .and_then(|a| a.classification.as_mut())
            .ok_or(MessageBuildError::MissingClassification)?;
        class.text = text.to_owned();
        Ok(self)
    }

    /// Record when the underlying event was detected.
    pub fn new_detect_time(&mut self, at: DateTime<Utc>) -> Result<&mut Self, MessageBuildError> {
        let alert = self.message.alert.as_mut().ok_or(MessageBuildError::MissingAlert)?;
        alert.detect_time = Some(at);
        Ok(self)
    }

    /// Record when the alert record itself was created.
    pub fn set_create_time(&mut self, at: DateTime<Utc>) -> Result<&mut Self, MessageBuildError> {
        let alert = self.message.alert.as_mut().ok_or(MessageBuildError::MissingAlert)?;
        alert.create_time = Some(at);
        Ok(self)
    }

    /// Validate completeness and hand the finished record to the caller.
    pub fn finish(self) -> Result<IdmefMessage, MessageBuildError> {
        let complete = self
            .message
            .alert
            .as_ref()
            .and_then(|a| a.classification.as_ref())
            .is_some_and(|c| !c.text.is_empty());
        if !complete {
            return Err(MessageBuildError::IncompleteRecord);
        }
        Ok(self.message)
    }
}
