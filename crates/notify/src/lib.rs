// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Notification events and their fan-out.
//!
//! Events are ephemeral. Their delivered effect is a [`NotificationRecord`]
//! persisted through a [`NotificationStore`] by a [`Listener`]. The
//! [`NotificationHub`] is created once per process and passed to whoever
//! needs to emit.

mod event;
mod hub;
mod listener;
mod store;

#[cfg(test)]
mod tests;

pub use event::{NotificationEvent, NotificationKind, Recipient};
pub use hub::{
    DEFAULT_DELIVERY_TIMEOUT, DEFAULT_HISTORY_CAPACITY, DeliveryError, DeliveryFailure,
    DeliveryReport, HubConfig, NotificationHub, SubscriptionId,
};
pub use listener::Listener;
pub use store::{NewNotification, NotificationId, NotificationRecord, NotificationStore};
