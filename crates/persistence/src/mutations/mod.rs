// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Mutations use Diesel DSL, plus `get_last_insert_rowid()` from the
//! backend module where a new row's identifier is needed.

pub mod accounts;
pub mod complaints;
pub mod notifications;
pub mod outbox;
