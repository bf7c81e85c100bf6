//! Search criteria and endpoint selection.
//!
//! The remote service exposes one read path per criterion. A submission always
//! maps to exactly one [`Endpoint`], chosen by a fixed priority:
//! name > position > organization > filter, falling back to [`Endpoint::All`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four user-editable search inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    #[default]
    Name,
    Position,
    Organization,
    Filter,
}

impl Field {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Position => "Position",
            Self::Organization => "Organization",
            Self::Filter => "Filter",
        }
    }

    /// Placeholder shown while the input is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Search by name...",
            Self::Position => "Search by position...",
            Self::Organization => "Search by organization...",
            Self::Filter => "Search by filter...",
        }
    }

    /// Cycle to the next input (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Position,
            Self::Position => Self::Organization,
            Self::Organization => Self::Filter,
            Self::Filter => Self::Name,
        }
    }

    /// Cycle to the previous input (wraps around).
    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Filter,
            Self::Position => Self::Name,
            Self::Organization => Self::Position,
            Self::Filter => Self::Organization,
        }
    }

    /// All inputs in dispatch priority order.
    pub fn all() -> &'static [Self] {
        &[Self::Name, Self::Position, Self::Organization, Self::Filter]
    }
}

/// The four optional search inputs. An empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub filter: String,
}

impl SearchCriteria {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Position => &self.position,
            Field::Organization => &self.organization,
            Field::Filter => &self.filter,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Position => self.position = value,
            Field::Organization => self.organization = value,
            Field::Filter => self.filter = value,
        }
    }

    /// Builder-style setter, handy in tests and the CLI.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// True when every input is empty.
    pub fn is_empty(&self) -> bool {
        Field::all().iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A remote read path. Exactly one is chosen per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Name(String),
    Position(String),
    Organization(String),
    Filter(String),
    /// Empty criteria; the service returns every entry.
    All,
}

impl Endpoint {
    /// Pick the endpoint for the current criteria. First non-empty field wins.
    pub fn select(criteria: &SearchCriteria) -> Self {
        for field in Field::all() {
            let value = criteria.get(*field);
            if value.is_empty() {
                continue;
            }
            let value = value.to_string();
            return match field {
                Field::Name => Self::Name(value),
                Field::Position => Self::Position(value),
                Field::Organization => Self::Organization(value),
                Field::Filter => Self::Filter(value),
            };
        }
        Self::All
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Position(_) => "position",
            Self::Organization(_) => "organization",
            Self::Filter(_) => "filter",
            Self::All => "all",
        }
    }

    /// Request path relative to the service base, with the value
    /// percent-encoded exactly once.
    pub fn path(&self) -> String {
        let (segment, value) = match self {
            Self::Name(v) => ("name", v),
            Self::Position(v) => ("position", v),
            Self::Organization(v) => ("organization", v),
            Self::Filter(v) => ("filter", v),
            Self::All => return "/name".to_string(),
        };
        format!("/{segment}/{}", urlencoding::encode(value))
    }

    /// Full URL against `base`. Trailing slashes on the base are ignored.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
