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

mod commands;
mod error;
mod lifecycle;
mod sink;

#[cfg(test)]
mod tests;

pub use commands::{announce_complaint, attach_feedback, file_complaint, remove_feedback};
pub use error::CoreError;
pub use lifecycle::{LifecycleController, LifecycleState, Transition};
pub use sink::{EventSink, PendingNotification};
