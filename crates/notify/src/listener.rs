// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::{NotificationEvent, Recipient};
use crate::hub::DeliveryError;
use crate::store::{NewNotification, NotificationRecord, NotificationStore};
use campus_complaints_domain::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A recipient listener.
///
/// Listeners filter the events addressed to them and persist one
/// notification record per accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Listener {
    /// Accepts every event and addresses it to the administrator account.
    Administrator,
    /// Accepts events addressed to this submitter.
    User(UserId),
    /// Accepts events addressed to this handler.
    Handler(UserId),
}

impl Listener {
    /// Returns true if this listener delivers `event`.
    #[must_use]
    pub fn accepts(&self, event: &NotificationEvent) -> bool {
        match self {
            Self::Administrator => true,
            Self::User(id) | Self::Handler(id) => event.recipient == Recipient::User(*id),
        }
    }

    /// Persists `event` for this listener's recipient.
    ///
    /// Returns `Ok(None)` when the administrator listener finds no
    /// administrator account; that is a skip, not a failure.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Store` if the store rejects the write.
    pub async fn deliver<S: NotificationStore + Send>(
        &self,
        event: &NotificationEvent,
        store: &mut S,
    ) -> Result<Option<NotificationRecord>, DeliveryError> {
        let recipient_id: UserId = match self {
            Self::Administrator => {
                match store
                    .find_administrator()
                    .await
                    .map_err(|e| DeliveryError::Store(e.to_string()))?
                {
                    Some(id) => id,
                    None => {
                        tracing::debug!(kind = %event.kind, "No administrator account; skipping");
                        return Ok(None);
                    }
                }
            }
            Self::User(id) | Self::Handler(id) => *id,
        };

        let record: NotificationRecord = store
            .insert_notification(NewNotification {
                recipient_id,
                kind: event.kind,
                message: event.message.clone(),
                timestamp: event.emitted_at,
            })
            .await
            .map_err(|e| DeliveryError::Store(e.to_string()))?;
        Ok(Some(record))
    }
}

impl std::fmt::Display for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrator => f.write_str("administrator"),
            Self::User(id) => write!(f, "user:{id}"),
            Self::Handler(id) => write!(f, "handler:{id}"),
        }
    }
}

impl FromStr for Listener {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "administrator" {
            return Ok(Self::Administrator);
        }
        let (prefix, raw) = s
            .split_once(':')
            .ok_or_else(|| format!("Unknown listener: {s}"))?;
        let id: UserId = raw
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| format!("Unknown listener: {s}"))?;
        match prefix {
            "user" => Ok(Self::User(id)),
            "handler" => Ok(Self::Handler(id)),
            _ => Err(format!("Unknown listener: {s}")),
        }
    }
}
