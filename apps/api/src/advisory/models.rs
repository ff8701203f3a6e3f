use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Regions used by the advisory site's URL layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    MiddleEast,
    Pacific,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::MiddleEast,
        Region::Pacific,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "africa",
            Region::Americas => "americas",
            Region::Asia => "asia",
            Region::Europe => "europe",
            Region::MiddleEast => "middle-east",
            Region::Pacific => "pacific",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown region '{}'", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    /// Accepts any casing and spaces or underscores in place of hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_slug(s);
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// The destination a query is about, as used in the advisory URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationGuess {
    pub region: Region,
    /// Lowercase, hyphen-joined (e.g. `united-states-america`).
    pub country: String,
}

/// A fetched advisory page: metadata plus its plain-text rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryDocument {
    /// `source`, `title`, `description`, `language` when present on the page.
    pub metadata: HashMap<String, String>,
    pub text: String,
}

impl AdvisoryDocument {
    pub fn metadata_value(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Lowercases, trims, and joins words with `-`.
pub fn normalize_slug(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
