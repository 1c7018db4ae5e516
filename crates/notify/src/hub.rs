// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The process-wide notification fan-out point.
//!
//! `emit` appends the event to a bounded history, then hands it to every
//! standing subscriber followed by every call-scoped listener. Deliveries
//! run one after another, each under its own timeout. A failed or stalled
//! delivery is reported and fan-out continues with the next listener.
//!
//! The timeout is `tokio::time::timeout`, which only takes effect when the
//! delivery yields. Stores that block inside their futures, such as the
//! Diesel/SQLite adapter, are never cut short: a slow blocking write
//! finishes and counts as delivered. Only stores that await (a network
//! backend, a pooled async driver) are bounded by the timeout.

use crate::event::NotificationEvent;
use crate::listener::Listener;
use crate::store::{NotificationRecord, NotificationStore};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Default per-listener delivery timeout.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of events kept in the hub history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// Hub tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// How long a single listener may take to deliver.
    pub delivery_timeout: Duration,
    /// How many past events the history retains.
    pub history_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Why a single delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The listener did not finish within the delivery timeout.
    #[error("delivery timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },
    /// The notification store rejected the write.
    #[error("notification store error: {0}")]
    Store(String),
}

/// A delivery that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// The listener the event was handed to.
    pub listener: Listener,
    /// The event that was not delivered.
    pub event: NotificationEvent,
    /// What went wrong.
    pub error: DeliveryError,
}

/// The outcome of one or more emissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Records persisted by accepting listeners.
    pub delivered: Vec<NotificationRecord>,
    /// Listeners that ignored the event because it was not addressed to them.
    pub filtered: usize,
    /// Accepting listeners that had nobody to deliver to.
    pub skipped: usize,
    /// Deliveries that failed or timed out.
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// Folds another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.delivered.extend(other.delivered);
        self.filtered += other.filtered;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }

    /// Returns true if no delivery failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Handle returned by [`NotificationHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The notification fan-out dispatcher.
#[derive(Debug)]
pub struct NotificationHub {
    config: HubConfig,
    next_subscription: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Listener)>>,
    history: Mutex<VecDeque<NotificationEvent>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationHub {
    /// Creates a hub with no subscribers and an empty history.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            next_subscription: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
            history: Mutex::new(VecDeque::with_capacity(config.history_capacity.min(64))),
        }
    }

    /// Returns the hub configuration.
    #[must_use]
    pub const fn config(&self) -> HubConfig {
        self.config
    }

    /// Registers a standing listener that sees every future emission.
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id: SubscriptionId =
            SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push((id, listener));
        tracing::debug!(?id, %listener, "Listener subscribed");
        id
    }

    /// Removes the subscription `id`.
    ///
    /// Returns false if it was not registered; removing twice is harmless.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before: usize = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        before != subscribers.len()
    }

    /// Number of standing subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// A snapshot of the retained history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<NotificationEvent> {
        lock(&self.history).iter().cloned().collect()
    }

    fn record_history(&self, event: &NotificationEvent) {
        let capacity: usize = self.config.history_capacity;
        if capacity == 0 {
            return;
        }
        let mut history = lock(&self.history);
        while history.len() >= capacity {
            history.pop_front();
        }
        history.push_back(event.clone());
    }

    fn standing_listeners(&self) -> Vec<Listener> {
        lock(&self.subscribers)
            .iter()
            .map(|(_, listener)| *listener)
            .collect()
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.config.delivery_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Fans `event` out to the standing subscribers and then to `scoped`.
    ///
    /// Never fails as a whole: each listener's outcome is collected into the
    /// returned report.
    pub async fn emit<S: NotificationStore + Send>(
        &self,
        event: NotificationEvent,
        scoped: &[Listener],
        store: &mut S,
    ) -> DeliveryReport {
        self.record_history(&event);

        let mut report: DeliveryReport = DeliveryReport::default();
        let listeners: Vec<Listener> = self
            .standing_listeners()
            .into_iter()
            .chain(scoped.iter().copied())
            .collect();

        for listener in listeners {
            if !listener.accepts(&event) {
                report.filtered += 1;
                continue;
            }
            match self.redeliver(listener, &event, store).await {
                Ok(Some(record)) => report.delivered.push(record),
                Ok(None) => report.skipped += 1,
                Err(error) => {
                    tracing::warn!(
                        %listener,
                        kind = %event.kind,
                        error = %error,
                        "Notification delivery failed"
                    );
                    report.failures.push(DeliveryFailure {
                        listener,
                        event: event.clone(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            kind = %event.kind,
            delivered = report.delivered.len(),
            filtered = report.filtered,
            failed = report.failures.len(),
            "Notification emitted"
        );
        report
    }

    /// Delivers `event` to a single listener under the delivery timeout.
    ///
    /// Used by `emit` and to retry queued deliveries. Does not touch the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Timeout` if the listener stalls, or the
    /// listener's own error.
    pub async fn redeliver<S: NotificationStore + Send>(
        &self,
        listener: Listener,
        event: &NotificationEvent,
        store: &mut S,
    ) -> Result<Option<NotificationRecord>, DeliveryError> {
        match tokio::time::timeout(
            self.config.delivery_timeout,
            listener.deliver(event, store),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(DeliveryError::Timeout {
                timeout_ms: self.timeout_ms(),
            }),
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
