/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::consts::EVENT_CHANNEL_CAPACITY;

/// Outbound domain events for external consumers (compose pipeline,
/// notification mailer). Published after a transition has been persisted,
/// never before.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum DomainEvent {
    UpdateReadyForTesting {
        alias: String,
        release: String,
        builds: Vec<String>,
    },
    UpdateRequestTesting {
        alias: String,
        release: String,
        builds: Vec<String>,
    },
    UpdateRequestStable {
        alias: String,
        release: String,
        builds: Vec<String>,
    },
    UpdateRequestUnpush {
        alias: String,
        release: String,
        builds: Vec<String>,
    },
}

/// Fan-out sender for domain events. Publishing with no subscribers is not
/// an error; events are best-effort from the pipeline's point of view.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventSender {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: DomainEvent) {
        debug!(event = ?event, "Queueing domain event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventSender {
    fn default() -> Self {
        Self::new()
    }
}
