// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries. All use Diesel DSL.

pub mod accounts;
pub mod complaints;
pub mod notifications;
pub mod outbox;
