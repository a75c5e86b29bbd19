// src/client.rs

//! Client context lifecycle and per-event alert submission.
//!
//! One [`ClientContext`] is created at host startup, threaded explicitly
//! through the detection pipeline (no ambient global), used for every
//! qualifying event, and consumed once at shutdown.  Initialization is
//! all-or-nothing: either the caller gets a fully registered context, or
//! every resource acquired along the way has been released and the caller
//! gets nothing.

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::AlertError;
use crate::idmef::{AnalyzerDescriptor, MessageBuilder};
use crate::transport::{Connection, DeliveryFlags, ExitStatus, Transport};

// ───── analyzer identity ────────────────────────────────────────────────────
// Advertised verbatim to the manager; existing deployments key on these.

pub const ANALYZER_MODEL: &str = "Motion";
pub const ANALYZER_CLASS: &str = "MIDS";
pub const ANALYZER_MANUFACTURER: &str = "http://www.lavrsen.dk/foswiki/bin/view/Motion/WebHome";
pub const ANALYZER_VERSION: &str = "3.2.12";

/// Profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "motion";

/// Classification text attached to every alert.  Deliberately constant: the
/// event descriptor signals *that* an alert is warranted, not *what* to say.
pub const CLASSIFICATION_TEXT: &str = "Motion detected !";

impl AnalyzerDescriptor {
    /// The fixed identity of this sensor application.
    pub fn motion() -> Self {
        Self {
            model: ANALYZER_MODEL.to_owned(),
            class: ANALYZER_CLASS.to_owned(),
            manufacturer: ANALYZER_MANUFACTURER.to_owned(),
            version: ANALYZER_VERSION.to_owned(),
        }
    }
}

/// Opaque descriptor handed in by the detection pipeline for each qualifying
/// event.  Only its presence matters today; the fields are carried for
/// logging and for a future richer payload mapping.
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    /// Video source that triggered the detection.
    pub camera: u32,
    /// When the pipeline observed the event.
    pub occurred_at: DateTime<Utc>,
}

/// Established, registered client connection plus its write-once identity.
///
/// `submit_alert` takes `&self` and may be called concurrently from one
/// thread per video source; the only mutable state lives behind the
/// transport, which is required to be multi-producer safe.
#[derive(Debug)]
pub struct ClientContext<C: Connection> {
    profile: String,
    flags: DeliveryFlags,
    analyzer: AnalyzerDescriptor,
    conn: C,
}

impl<C: Connection> ClientContext<C> {
    /// Initialize the alerting client: library setup, connection creation,
    /// asynchronous delivery flags, analyzer identity, then the registration
    /// handshake with the manager.
    ///
    /// Returns `None` on any failure.  The host should treat that as
    /// "alerting disabled" and skip [`ClientContext::submit_alert`] calls;
    /// every failure path has already been logged with its reason and has
    /// released anything acquired before it.
    pub fn initialize<T>(transport: &T, config: &ClientConfig) -> Option<Self>
    where
        T: Transport<Conn = C>,
    {
        match Self::try_initialize(transport, config) {
            Ok(ctx) => {
                info!(
                    "alert client registered with manager (profile '{}')",
                    ctx.profile
                );
                Some(ctx)
            }
            Err(_) => None,
        }
    }

    /// Same sequence as [`ClientContext::initialize`], but carries the typed
    /// error for hosts that want to report it themselves.
    pub fn try_initialize<T>(transport: &T, config: &ClientConfig) -> Result<Self, AlertError>
    where
        T: Transport<Conn = C>,
    {
        let profile = config.profile.clone();

        transport.init().map_err(|e| {
            error!("unable to initialize the transport library: {e}");
            AlertError::LibraryInit(e)
        })?;

        // From here on, `conn` must be released on every failure path.
        let mut conn = transport.create(&profile).map_err(|e| {
            error!("unable to create a client connection for profile '{profile}': {e}");
            AlertError::ConnectionCreate {
                profile: profile.clone(),
                source: e,
            }
        })?;

        // Force fully asynchronous delivery: the detection pipeline must
        // never stall behind alert traffic, even with the manager down.
        let flags = DeliveryFlags {
            async_timer: true,
            async_send: true,
        };
        if let Err(e) = conn.set_delivery_flags(flags) {
            error!("unable to force asynchronous delivery flags: {e}");
            conn.shutdown(ExitStatus::Success);
            return Err(AlertError::FlagConfig(e));
        }

        let analyzer = AnalyzerDescriptor::motion();
        if let Err(e) = conn.set_analyzer(analyzer.clone()) {
            error!("unable to set up the analyzer descriptor: {e}");
            conn.shutdown(ExitStatus::Success);
            return Err(AlertError::AnalyzerSetup(e));
        }

        if let Err(e) = conn.start() {
            error!("unable to start the client connection: {e}");
            conn.shutdown(ExitStatus::Success);
            return Err(AlertError::ConnectionStart(e));
        }

        Ok(Self {
            profile,
            flags,
            analyzer,
            conn,
        })
    }

    /// Build one alert record for `event` and queue it for asynchronous
    /// delivery.  Never blocks beyond local computation: the transport is
    /// contractually required (via the flags set at initialization) to
    /// queue and return.
    ///
    /// A build failure drops this one event and leaves the context valid
    /// for the next; nothing is sent in that case.
    pub fn submit_alert(&self, event: &DetectionEvent) -> Result<(), AlertError> {
        self.submit_with_classification(event, CLASSIFICATION_TEXT)
    }

    pub(crate) fn submit_with_classification(
        &self,
        event: &DetectionEvent,
        classification: &str,
    ) -> Result<(), AlertError> {
        debug!(
            "building alert for camera {} (event observed at {})",
            event.camera, event.occurred_at
        );

        // Create time mirrors detect time; the event's own timestamp is not
        // consulted here.
        let now = Utc::now();

        let mut builder = MessageBuilder::new_message();
        builder.new_alert();
        builder.new_classification()?;
        builder.set_text(classification)?;
        builder.new_detect_time(now)?;
        builder.set_create_time(now)?;
        let message = builder.finish()?;

        // Fire-and-forget hand-off; ownership of the record moves to the
        // transport and no completion is observed at this layer.
        self.conn.send(message);
        Ok(())
    }

    /// Release the connection, reporting a clean exit to the manager.
    /// Consuming `self` makes double-destroy unrepresentable.
    pub fn destroy(self) {
        info!("shutting down alert client (profile '{}')", self.profile);
        self.conn.shutdown(ExitStatus::Success);
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn delivery_flags(&self) -> DeliveryFlags {
        self.flags
    }

    pub fn analyzer(&self) -> &AnalyzerDescriptor {
        &self.analyzer
    }
}
