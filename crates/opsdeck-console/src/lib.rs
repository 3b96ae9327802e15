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

//! Opsdeck Console Core
//!
//! This crate provides the access-control and navigation core of the
//! Opsdeck facilities and inventory administration console: the session
//! guard, permission store, permission-gated route table, access gate
//! decision function, and the in-process data-invalidation bus that
//! tells mounted screens to re-fetch. All business rules (authorization
//! enforcement, stock availability, reservation consistency) live in the
//! backend service; this crate only decides what the current principal
//! may see and when cached screen data is stale.

pub mod bus;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod permissions;
pub mod preferences;
pub mod routes;
pub mod session;
