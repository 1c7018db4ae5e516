// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_notify::{Listener, NotificationEvent};

/// An event waiting to be emitted, with the listeners it is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    /// The event.
    pub event: NotificationEvent,
    /// The call-scoped listeners to hand it to.
    pub audience: Vec<Listener>,
}

/// Where lifecycle operations record the notifications they produce.
///
/// The lifecycle never emits directly. Callers drain the sink after the
/// mutated record has been stored.
pub trait EventSink {
    /// Records an event and its audience.
    fn record(&mut self, event: NotificationEvent, audience: Vec<Listener>);
}

impl EventSink for Vec<PendingNotification> {
    fn record(&mut self, event: NotificationEvent, audience: Vec<Listener>) {
        self.push(PendingNotification { event, audience });
    }
}
