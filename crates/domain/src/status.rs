// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint status vocabulary and the lifecycle edge table.
//!
//! A complaint moves from `received` through `resolving` to `closed`.
//! `closed` is terminal. Status changes are always actor-initiated; the
//! system never advances a complaint on its own.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle status of a complaint.
///
/// The wire names (`received`, `resolving`, `closed`) map one to one onto
/// the Submitted, `InProgress` and Closed lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Filed by the submitter, not yet picked up.
    Received,
    /// A handler or administrator is working on it.
    Resolving,
    /// Finished. No further transitions are possible.
    Closed,
}

impl ComplaintStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Received, Self::Resolving, Self::Closed];

    /// Returns the wire representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Resolving => "resolving",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "received" => Ok(Self::Received),
            "resolving" => Ok(Self::Resolving),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Interprets a stored status value.
    ///
    /// Absent or unrecognized values fall back to `Received`. The fallback
    /// reflects the record as it is; it never re-enters the state.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(Self::parse_str) {
            Some(Ok(status)) => status,
            Some(Err(_)) | None => {
                tracing::warn!(
                    stored = value.unwrap_or("<absent>"),
                    "Unrecognized stored complaint status, treating as received"
                );
                Self::Received
            }
        }
    }

    /// Returns true if no transition may leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if `self -> target` is an edge of the lifecycle graph.
    ///
    /// Every `(current, target)` pair is listed so that adding a status
    /// forces this table to be revisited.
    #[must_use]
    pub const fn permits(&self, target: Self) -> bool {
        match (self, target) {
            (Self::Received, Self::Resolving | Self::Closed) | (Self::Resolving, Self::Closed) => {
                true
            }
            (Self::Received, Self::Received)
            | (Self::Resolving, Self::Received | Self::Resolving)
            | (Self::Closed, Self::Received | Self::Resolving | Self::Closed) => false,
        }
    }

    /// Statuses reachable in a single step from this one.
    #[must_use]
    pub fn allowed_targets(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.permits(*target))
            .collect()
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Self-transitions and any attempt to leave `Closed` are rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` carrying the attempted edge.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.permits(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The instant each status was first entered.
///
/// A slot is set if and only if the complaint has passed through that
/// status, and set slots are non-decreasing in lifecycle order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimestamps {
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    received: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    resolving: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    closed: Option<OffsetDateTime>,
}

impl StatusTimestamps {
    /// Rebuilds timestamps from stored values.
    #[must_use]
    pub const fn from_parts(
        received: Option<OffsetDateTime>,
        resolving: Option<OffsetDateTime>,
        closed: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            received,
            resolving,
            closed,
        }
    }

    /// Returns the instant `status` was entered, if it has been.
    #[must_use]
    pub const fn get(&self, status: ComplaintStatus) -> Option<OffsetDateTime> {
        match status {
            ComplaintStatus::Received => self.received,
            ComplaintStatus::Resolving => self.resolving,
            ComplaintStatus::Closed => self.closed,
        }
    }

    /// The most recent instant recorded in any slot.
    #[must_use]
    pub fn latest(&self) -> Option<OffsetDateTime> {
        [self.received, self.resolving, self.closed]
            .into_iter()
            .flatten()
            .max()
    }

    /// Records entry into `status` at `at` and returns the stored instant.
    ///
    /// The stored instant never precedes an earlier stamp, so a clock that
    /// steps backwards cannot break lifecycle ordering.
    pub fn stamp(&mut self, status: ComplaintStatus, at: OffsetDateTime) -> OffsetDateTime {
        let at: OffsetDateTime = self.latest().map_or(at, |latest| at.max(latest));
        let slot: &mut Option<OffsetDateTime> = match status {
            ComplaintStatus::Received => &mut self.received,
            ComplaintStatus::Resolving => &mut self.resolving,
            ComplaintStatus::Closed => &mut self.closed,
        };
        *slot = Some(at);
        at
    }
}
