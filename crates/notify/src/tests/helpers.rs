// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{NewNotification, NotificationId, NotificationRecord, NotificationStore};
use campus_complaints_domain::UserId;
use std::time::Duration;

/// A vector-backed store. Writes addressed to `stall_for` sleep past any
/// reasonable test timeout; writes addressed to `block_for` block the
/// thread for as long without yielding; writes addressed to `reject_for`
/// fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub administrator: Option<UserId>,
    pub records: Vec<NotificationRecord>,
    pub stall_for: Option<UserId>,
    pub block_for: Option<UserId>,
    pub reject_for: Option<UserId>,
}

impl MemoryStore {
    pub fn with_administrator(id: i64) -> Self {
        Self {
            administrator: Some(UserId::new(id)),
            ..Self::default()
        }
    }

    pub fn recipients(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.recipient_id.value()).collect()
    }
}

impl NotificationStore for MemoryStore {
    type Error = String;

    async fn find_administrator(&mut self) -> Result<Option<UserId>, String> {
        Ok(self.administrator)
    }

    async fn insert_notification(
        &mut self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, String> {
        if self.stall_for == Some(notification.recipient_id) {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        if self.block_for == Some(notification.recipient_id) {
            std::thread::sleep(Duration::from_millis(150));
        }
        if self.reject_for == Some(notification.recipient_id) {
            return Err(String::from("disk full"));
        }
        let id: i64 = i64::try_from(self.records.len()).unwrap() + 1;
        let record: NotificationRecord = NotificationRecord {
            id: NotificationId::new(id),
            recipient_id: notification.recipient_id,
            kind: notification.kind,
            message: notification.message,
            timestamp: notification.timestamp,
            read: false,
        };
        self.records.push(record.clone());
        Ok(record)
    }
}
