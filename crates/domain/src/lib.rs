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

mod complaint;
mod error;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use complaint::{Complaint, ComplaintDraft, Feedback, NewComplaint, Rating};
pub use error::DomainError;
pub use status::{ComplaintStatus, StatusTimestamps};
pub use types::{Account, AccountRole, Category, ComplaintId, UserId};
pub use validation::{
    MAX_TEXT_LEN, MAX_TITLE_LEN, validate_account_fields, validate_complaint_draft,
    validate_feedback_text,
};
