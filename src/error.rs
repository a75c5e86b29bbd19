// src/error.rs

//! Error taxonomy of the alerting client.
//!
//! Every variant except [`AlertError::MessageBuild`] is fatal to
//! initialization and triggers full rollback of whatever the transport had
//! already handed out; `MessageBuild` is fatal to one alert only and leaves
//! the client context untouched.

use thiserror::Error;

use crate::idmef::MessageBuildError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("unable to initialize the transport library: {0}")]
    LibraryInit(#[source] TransportError),

    #[error("unable to create a client connection for profile '{profile}': {source}")]
    ConnectionCreate {
        profile: String,
        #[source]
        source: TransportError,
    },

    #[error("unable to force asynchronous delivery flags: {0}")]
    FlagConfig(#[source] TransportError),

    #[error("unable to set up the analyzer descriptor: {0}")]
    AnalyzerSetup(#[source] TransportError),

    #[error("unable to start the client connection: {0}")]
    ConnectionStart(#[source] TransportError),

    #[error("unable to build the alert record: {0}")]
    MessageBuild(#[from] MessageBuildError),
}
