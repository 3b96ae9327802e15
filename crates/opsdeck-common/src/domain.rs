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

//! Coarse data domains for cross-component invalidation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A coarse data domain that console screens query and mutate.
///
/// Invalidation events are tagged with one or more domains. The
/// enumeration is fixed: a screen that introduces a new kind of
/// shared data adds a variant here rather than inventing ad-hoc tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataDomain {
    Announcements,
    Users,
    Permissions,
    Locations,
    Assignees,
    Branding,
    Inventory,
    Incidents,
    Tickets,
}

impl DataDomain {
    /// Stable string tag for this domain
    pub fn as_str(&self) -> &'static str {
        match self {
            DataDomain::Announcements => "announcements",
            DataDomain::Users => "users",
            DataDomain::Permissions => "permissions",
            DataDomain::Locations => "locations",
            DataDomain::Assignees => "assignees",
            DataDomain::Branding => "branding",
            DataDomain::Inventory => "inventory",
            DataDomain::Incidents => "incidents",
            DataDomain::Tickets => "tickets",
        }
    }
}

impl fmt::Display for DataDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized domain tag
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown data domain: {0}")]
pub struct UnknownDomain(pub String);

impl FromStr for DataDomain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcements" => Ok(DataDomain::Announcements),
            "users" => Ok(DataDomain::Users),
            "permissions" => Ok(DataDomain::Permissions),
            "locations" => Ok(DataDomain::Locations),
            "assignees" => Ok(DataDomain::Assignees),
            "branding" => Ok(DataDomain::Branding),
            "inventory" => Ok(DataDomain::Inventory),
            "incidents" => Ok(DataDomain::Incidents),
            "tickets" => Ok(DataDomain::Tickets),
            other => Err(UnknownDomain(other.to_string())),
        }
    }
}
