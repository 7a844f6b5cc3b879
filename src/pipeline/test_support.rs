//! Fakes shared by pipeline tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{FetchError, PersistError, SendError};
use crate::models::SentAlertSet;
use crate::notify::{Embed, MessageSender};
use crate::services::AlertSource;
use crate::storage::{SentAlertStore, keys};

/// Build a feed document from `(id, event)` pairs.
pub fn feed_json(alerts: &[(&str, &str)]) -> String {
    let features: Vec<_> = alerts
        .iter()
        .map(|(id, event)| {
            serde_json::json!({
                "id": id,
                "properties": {
                    "event": event,
                    "headline": format!("{event} issued"),
                    "severity": "Severe",
                    "urgency": "Immediate",
                    "areaDesc": "Polk, IA",
                    "senderName": "NWS Des Moines IA",
                    "effective": "2025-05-06T14:05:00-05:00",
                    "expires": "2025-05-06T14:45:00-05:00"
                }
            })
        })
        .collect();
    serde_json::json!({ "features": features }).to_string()
}

enum Reply {
    Body(String),
    Status(u16),
}

/// Source that answers with a canned body or status.
pub struct FakeSource {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(Reply::Body(body.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_body(&self, body: impl Into<String>) {
        *self.reply.lock().unwrap() = Reply::Body(body.into());
    }

    pub fn set_status(&self, status: u16) {
        *self.reply.lock().unwrap() = Reply::Status(status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertSource for FakeSource {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.reply.lock().unwrap() {
            Reply::Body(body) => Ok(body.clone().into_bytes()),
            Reply::Status(code) => Err(FetchError::BadStatus(*code)),
        }
    }
}

/// Source that blocks until released.
pub struct GatedSource {
    pub gate: Notify,
    body: String,
}

impl GatedSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            gate: Notify::new(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl AlertSource for GatedSource {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        self.gate.notified().await;
        Ok(self.body.clone().into_bytes())
    }
}

/// Sender that records every embed and can refuse chosen channels.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, Embed)>>,
    refuse: Mutex<Vec<String>>,
}

impl RecordingSender {
    pub fn refuse_channel(&self, channel: &str) {
        self.refuse.lock().unwrap().push(channel.to_string());
    }

    pub fn sent(&self) -> Vec<(String, Embed)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn channels(&self) -> Vec<String> {
        self.sent().into_iter().map(|(c, _)| c).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), SendError> {
        if self.refuse.lock().unwrap().iter().any(|c| c == channel_id) {
            return Err(SendError::Status {
                status: 403,
                body: "Missing Permissions".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), embed.clone()));
        Ok(())
    }
}

/// Sent store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FaultySentStore {
    inner: Mutex<SentAlertSet>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    saves: AtomicUsize,
}

impl FaultySentStore {
    pub fn with_sent(sent: SentAlertSet) -> Self {
        Self {
            inner: Mutex::new(sent),
            ..Self::default()
        }
    }

    pub fn fail_load(&self) {
        self.fail_load.store(true, Ordering::SeqCst);
    }

    pub fn fail_save(&self) {
        self.fail_save.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> SentAlertSet {
        self.inner.lock().unwrap().clone()
    }

    /// Successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentAlertStore for FaultySentStore {
    async fn load_sent(&self) -> Result<SentAlertSet, PersistError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PersistError::read(keys::SENT_ALERTS, "expected value at line 1"));
        }
        Ok(self.sent())
    }

    async fn save_sent(&self, sent: &SentAlertSet) -> Result<(), PersistError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(PersistError::write(keys::SENT_ALERTS, "No space left on device"));
        }
        *self.inner.lock().unwrap() = sent.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
