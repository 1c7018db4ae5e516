// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::UserId;
use campus_complaints_notify::{NewNotification, NotificationRecord, NotificationStore};

use crate::Persistence;
use crate::error::PersistenceError;

impl NotificationStore for Persistence {
    type Error = PersistenceError;

    async fn find_administrator(&mut self) -> Result<Option<UserId>, PersistenceError> {
        self.find_administrator_id()
    }

    async fn insert_notification(
        &mut self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, PersistenceError> {
        self.create_notification(notification)
    }
}
