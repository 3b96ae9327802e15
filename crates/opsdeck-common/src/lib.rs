// Opsdeck
// Copyright (C) 2025 Opsdeck

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Shared vocabulary types for the Opsdeck console
//!
//! This crate holds the types every other Opsdeck crate speaks in:
//! the authenticated principal, the coarse data domains used for
//! cross-component invalidation, and the auth-change event
//! classification consumed from the backend session service.

pub mod domain;
pub mod event;
pub mod principal;

pub use domain::*;
pub use event::*;
pub use principal::*;
