//! End-to-end exercise of the alerting client against a fake manager
//! endpoint: register, submit a handful of alerts, shut down, and verify
//! everything the manager side observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use idmef_alerter::client::{ClientContext, DetectionEvent, CLASSIFICATION_TEXT};
use idmef_alerter::config::ClientConfig;
use idmef_alerter::idmef::{AnalyzerDescriptor, IdmefMessage};
use idmef_alerter::transport::{
    Connection, DeliveryFlags, ExitStatus, Transport, TransportError,
};

/// Everything the fake manager endpoint records.
#[derive(Default)]
struct ManagerSide {
    handshakes: AtomicUsize,
    shutdowns: AtomicUsize,
    exit_statuses: Mutex<Vec<ExitStatus>>,
    received: Mutex<Vec<IdmefMessage>>,
}

/// In-process transport: `send` pushes onto an unbounded channel and returns
/// immediately; a background task plays the manager and drains the queue.
struct ChannelTransport {
    manager: Arc<ManagerSide>,
    tx: mpsc::UnboundedSender<IdmefMessage>,
}

struct ChannelConnection {
    manager: Arc<ManagerSide>,
    tx: mpsc::UnboundedSender<IdmefMessage>,
}

impl Transport for ChannelTransport {
    type Conn = ChannelConnection;

    fn init(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn create(&self, profile: &str) -> Result<ChannelConnection, TransportError> {
        if profile.is_empty() {
            return Err(TransportError("empty profile".into()));
        }
        Ok(ChannelConnection {
            manager: self.manager.clone(),
            tx: self.tx.clone(),
        })
    }
}

impl Connection for ChannelConnection {
    fn set_delivery_flags(&mut self, flags: DeliveryFlags) -> Result<(), TransportError> {
        if !(flags.async_timer && flags.async_send) {
            return Err(TransportError("synchronous delivery not supported".into()));
        }
        Ok(())
    }

    fn set_analyzer(&mut self, _analyzer: AnalyzerDescriptor) -> Result<(), TransportError> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), TransportError> {
        self.manager.handshakes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn send(&self, message: IdmefMessage) {
        // fire-and-forget; delivery happens on the manager task
        let _ = self.tx.send(message);
    }

    fn shutdown(self, status: ExitStatus) {
        self.manager.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.manager.exit_statuses.lock().unwrap().push(status);
    }
}

fn spawn_manager(manager: Arc<ManagerSide>) -> (ChannelTransport, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<IdmefMessage>();
    let side = manager.clone();
    let task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            side.received.lock().unwrap().push(msg);
        }
    });
    (ChannelTransport { manager, tx }, task)
}

#[tokio::test]
async fn three_alerts_reach_the_manager_in_order() {
    let manager = Arc::new(ManagerSide::default());
    let (transport, task) = spawn_manager(manager.clone());

    let ctx = ClientContext::initialize(&transport, &ClientConfig::default())
        .expect("handshake accepted");
    assert_eq!(manager.handshakes.load(Ordering::SeqCst), 1);

    for camera in 0..3u32 {
        let event = DetectionEvent {
            camera,
            occurred_at: Utc::now(),
        };
        ctx.submit_alert(&event).expect("alert submitted");
        // space the records out so their timestamps differ
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    ctx.destroy();
    drop(transport); // last sender gone, manager task drains and exits
    task.await.unwrap();

    let received = manager.received.lock().unwrap();
    assert_eq!(received.len(), 3);

    // three distinct payloads, non-decreasing detect time, constant text
    let mut payloads: Vec<String> = Vec::new();
    let mut last_detect = None;
    for msg in received.iter() {
        let alert = msg.alert.as_ref().expect("alert envelope");
        assert_eq!(
            alert.classification.as_ref().unwrap().text,
            CLASSIFICATION_TEXT
        );
        let detect = alert.detect_time.expect("detect time set");
        if let Some(prev) = last_detect {
            assert!(detect >= prev, "detect times must not go backwards");
        }
        last_detect = Some(detect);
        payloads.push(msg.to_json().unwrap());
    }
    payloads.sort();
    payloads.dedup();
    assert_eq!(payloads.len(), 3, "payloads must be distinct");

    assert_eq!(manager.shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(
        manager.exit_statuses.lock().unwrap().as_slice(),
        &[ExitStatus::Success]
    );
}

#[tokio::test]
async fn submit_returns_even_when_delivery_never_completes() {
    let manager = Arc::new(ManagerSide::default());
    // no manager task at all: messages queue forever and nobody acks them
    let (tx, _rx) = mpsc::unbounded_channel::<IdmefMessage>();
    let transport = ChannelTransport {
        manager: manager.clone(),
        tx,
    };

    let ctx = ClientContext::initialize(&transport, &ClientConfig::default()).unwrap();
    let event = DetectionEvent {
        camera: 7,
        occurred_at: Utc::now(),
    };

    // must come back without any delivery confirmation
    ctx.submit_alert(&event).expect("submission is fire-and-forget");
    ctx.destroy();
    assert_eq!(manager.shutdowns.load(Ordering::SeqCst), 1);
}
