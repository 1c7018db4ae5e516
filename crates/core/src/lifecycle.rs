// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The complaint lifecycle controller.
//!
//! A controller is built per request around a borrowed record. It applies
//! only legal edges, runs the entry behaviour of the new state and records
//! any resulting notification into the caller's sink. It never persists.

use crate::error::CoreError;
use crate::sink::EventSink;
use campus_complaints_domain::{Complaint, ComplaintStatus};
use campus_complaints_notify::{Listener, NotificationEvent};
use time::OffsetDateTime;

/// The lifecycle phase a complaint is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Filed, not yet picked up.
    Submitted,
    /// Being worked on.
    InProgress,
    /// Finished.
    Closed,
}

impl LifecycleState {
    /// The state matching a stored status.
    #[must_use]
    pub const fn from_status(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Received => Self::Submitted,
            ComplaintStatus::Resolving => Self::InProgress,
            ComplaintStatus::Closed => Self::Closed,
        }
    }

    /// The wire status this state stands for.
    #[must_use]
    pub const fn status(&self) -> ComplaintStatus {
        match self {
            Self::Submitted => ComplaintStatus::Received,
            Self::InProgress => ComplaintStatus::Resolving,
            Self::Closed => ComplaintStatus::Closed,
        }
    }

    /// Entry behaviour. Writes the status, stamps its timestamp, updates
    /// the completion flag and, for `InProgress` and `Closed`, records a
    /// status change for the submitter.
    ///
    /// Returns the stored timestamp.
    fn on_enter<E: EventSink>(
        &self,
        record: &mut Complaint,
        at: OffsetDateTime,
        sink: &mut E,
    ) -> OffsetDateTime {
        let status: ComplaintStatus = self.status();
        record.status = status;
        let stamped: OffsetDateTime = record.status_timestamps.stamp(status, at);
        record.completed = matches!(self, Self::Closed);

        match self {
            Self::Submitted => {}
            Self::InProgress | Self::Closed => {
                sink.record(
                    NotificationEvent::status_changed(record.submitter, record.id, status),
                    vec![Listener::User(record.submitter)],
                );
            }
        }
        stamped
    }
}

/// Summary of an applied transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The status before the transition.
    pub from: ComplaintStatus,
    /// The status after the transition.
    pub to: ComplaintStatus,
    /// The stored instant of entry into `to`.
    pub at: OffsetDateTime,
}

/// Drives one complaint record through its lifecycle.
#[derive(Debug)]
pub struct LifecycleController<'a> {
    record: &'a mut Complaint,
    state: LifecycleState,
}

impl<'a> LifecycleController<'a> {
    /// Wraps `record` in the state matching its stored status.
    ///
    /// Entry behaviour is not run: the record already reflects its state.
    #[must_use]
    pub fn initialize(record: &'a mut Complaint) -> Self {
        let state: LifecycleState = LifecycleState::from_status(record.status);
        Self { record, state }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// The wrapped record.
    #[must_use]
    pub const fn record(&self) -> &Complaint {
        self.record
    }

    /// Moves the record to `target` if the edge is legal.
    ///
    /// On failure the record is left untouched and nothing is recorded in
    /// `sink`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DomainViolation(DomainError::InvalidTransition)`
    /// if `target` is not reachable in one step from the current status.
    pub fn request_transition<E: EventSink>(
        &mut self,
        target: ComplaintStatus,
        at: OffsetDateTime,
        sink: &mut E,
    ) -> Result<Transition, CoreError> {
        let from: ComplaintStatus = self.state.status();
        from.validate_transition(target)?;

        let next: LifecycleState = LifecycleState::from_status(target);
        self.state = next;
        let stamped: OffsetDateTime = next.on_enter(self.record, at, sink);

        tracing::debug!(
            complaint = %self.record.id,
            %from,
            to = %target,
            "Complaint transitioned"
        );

        Ok(Transition {
            from,
            to: target,
            at: stamped,
        })
    }
}
