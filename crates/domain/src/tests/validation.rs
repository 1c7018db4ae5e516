// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ComplaintDraft, DomainError, MAX_TEXT_LEN, MAX_TITLE_LEN, validate_account_fields,
    validate_complaint_draft, validate_feedback_text,
};

fn draft() -> ComplaintDraft {
    ComplaintDraft {
        title: String::from("Broken heater"),
        category: String::from("Maintenance"),
        description: String::from("Room 204 heater does not turn on"),
        location: Some(String::from("Hall B")),
    }
}

#[test]
fn test_valid_draft_passes() {
    assert!(validate_complaint_draft(&draft()).is_ok());
}

#[test]
fn test_blank_title_rejected() {
    let mut d: ComplaintDraft = draft();
    d.title = String::from("   ");
    assert_eq!(
        validate_complaint_draft(&d),
        Err(DomainError::EmptyField { field: "title" })
    );
}

#[test]
fn test_blank_category_rejected() {
    let mut d: ComplaintDraft = draft();
    d.category = String::new();
    assert_eq!(
        validate_complaint_draft(&d),
        Err(DomainError::EmptyField { field: "category" })
    );
}

#[test]
fn test_overlong_description_rejected() {
    let mut d: ComplaintDraft = draft();
    d.description = "x".repeat(MAX_TEXT_LEN + 1);
    assert_eq!(
        validate_complaint_draft(&d),
        Err(DomainError::FieldTooLong {
            field: "description",
            max: MAX_TEXT_LEN
        })
    );
}

#[test]
fn test_overlong_location_rejected() {
    let mut d: ComplaintDraft = draft();
    d.location = Some("y".repeat(MAX_TITLE_LEN + 1));
    assert!(matches!(
        validate_complaint_draft(&d),
        Err(DomainError::FieldTooLong {
            field: "location",
            ..
        })
    ));
}

#[test]
fn test_missing_location_allowed() {
    let mut d: ComplaintDraft = draft();
    d.location = None;
    assert!(validate_complaint_draft(&d).is_ok());
}

#[test]
fn test_feedback_text_may_be_empty() {
    assert!(validate_feedback_text("").is_ok());
    assert!(validate_feedback_text(&"z".repeat(MAX_TEXT_LEN + 1)).is_err());
}

#[test]
fn test_account_fields() {
    assert!(validate_account_fields("Ada", "ada@campus.edu").is_ok());
    assert_eq!(
        validate_account_fields("", "ada@campus.edu"),
        Err(DomainError::EmptyField { field: "name" })
    );
    assert!(matches!(
        validate_account_fields("Ada", "ada.campus.edu"),
        Err(DomainError::InvalidEmail(_))
    ));
    assert!(validate_account_fields("Ada", "@campus.edu").is_err());
}
