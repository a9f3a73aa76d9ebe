//! Recording collaborator doubles.
//!
//! Useful in unit and integration tests — and in the CLI's `run` command —
//! where the real task/notification/integration services are unavailable or
//! irrelevant. Each double records every call it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::traits::{IntegrationSync, Notifier, OutboundMessage, SyncReport, TaskService};

/// Task-creation double that hands out sequential ids (`task-1`, `task-2`, …)
/// and records every payload it sees.
pub struct RecordingTaskService {
    /// All payloads seen by this service (in call order).
    pub calls: Arc<Mutex<Vec<Map<String, Value>>>>,
    fail_with: Option<String>,
}

impl RecordingTaskService {
    pub fn new() -> Self {
        Self { calls: Arc::new(Mutex::new(Vec::new())), fail_with: None }
    }

    /// Create a double that always fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { calls: Arc::new(Mutex::new(Vec::new())), fail_with: Some(message.into()) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_payload(&self) -> Option<Map<String, Value>> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Default for RecordingTaskService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskService for RecordingTaskService {
    async fn create_task(&self, payload: &Map<String, Value>) -> anyhow::Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(payload.clone());
        match &self.fail_with {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(format!("task-{}", calls.len())),
        }
    }
}

/// Delivery double that records messages and reports success.
pub struct RecordingNotifier {
    /// All messages seen by this notifier (in call order).
    pub deliveries: Arc<Mutex<Vec<OutboundMessage>>>,
    fail_with: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self { deliveries: Arc::new(Mutex::new(Vec::new())), fail_with: None }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { deliveries: Arc::new(Mutex::new(Vec::new())), fail_with: Some(message.into()) }
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<OutboundMessage> {
        self.deliveries.lock().unwrap().last().cloned()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<bool> {
        self.deliveries.lock().unwrap().push(message.clone());
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!("{msg}")),
            None => Ok(true),
        }
    }
}

/// Integration-sync double that returns a canned report.
pub struct RecordingIntegrationSync {
    /// Integration ids requested so far (in call order).
    pub requests: Arc<Mutex<Vec<String>>>,
    report: SyncReport,
    fail_with: Option<String>,
}

impl RecordingIntegrationSync {
    pub fn new() -> Self {
        Self::reporting(SyncReport {
            success: true,
            message: "sync complete".to_owned(),
            synced_items: 0,
        })
    }

    /// Create a double that answers every sync with `report`.
    pub fn reporting(report: SyncReport) -> Self {
        Self { requests: Arc::new(Mutex::new(Vec::new())), report, fail_with: None }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        let mut double = Self::new();
        double.fail_with = Some(message.into());
        double
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for RecordingIntegrationSync {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntegrationSync for RecordingIntegrationSync {
    async fn sync(&self, integration_id: &str) -> anyhow::Result<SyncReport> {
        self.requests.lock().unwrap().push(integration_id.to_owned());
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!("{msg}")),
            None => Ok(self.report.clone()),
        }
    }
}
