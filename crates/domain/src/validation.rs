// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::complaint::ComplaintDraft;
use crate::error::DomainError;

/// Maximum length of a complaint title.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum length of a complaint description or feedback text.
pub const MAX_TEXT_LEN: usize = 5000;

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(DomainError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Validates the fields of a complaint before it is filed.
///
/// # Errors
///
/// Returns an error if the title, category or description is empty, or if
/// any field is longer than permitted.
pub fn validate_complaint_draft(draft: &ComplaintDraft) -> Result<(), DomainError> {
    require_text("title", &draft.title, MAX_TITLE_LEN)?;
    require_text("category", &draft.category, MAX_TITLE_LEN)?;
    require_text("description", &draft.description, MAX_TEXT_LEN)?;
    if let Some(location) = &draft.location
        && location.chars().count() > MAX_TITLE_LEN
    {
        return Err(DomainError::FieldTooLong {
            field: "location",
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

/// Validates feedback text. Empty text is allowed; a rating alone is enough.
///
/// # Errors
///
/// Returns an error if the text is longer than permitted.
pub fn validate_feedback_text(text: &str) -> Result<(), DomainError> {
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::FieldTooLong {
            field: "feedback",
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Validates the fields of a new account.
///
/// # Errors
///
/// Returns an error if the name is empty or the email is malformed.
pub fn validate_account_fields(name: &str, email: &str) -> Result<(), DomainError> {
    require_text("name", name, MAX_TITLE_LEN)?;
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
