//! Permit categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of certificate layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitCategory {
    #[default]
    Business,
    /// Tricycle franchise / TODA / transport permits
    Franchise,
    Building,
    Barangay,
}

impl PermitCategory {
    pub const ALL: [PermitCategory; 4] = [
        PermitCategory::Business,
        PermitCategory::Franchise,
        PermitCategory::Building,
        PermitCategory::Barangay,
    ];

    /// Match a free-text permit type against the known categories
    ///
    /// Case-insensitive substring match in fixed priority order: business,
    /// then franchise/toda/transport, then building, then barangay. The order
    /// matters for strings that contain several keywords.
    pub fn parse(permit_type: &str) -> Option<Self> {
        let lower = permit_type.to_lowercase();

        if lower.contains("business") {
            Some(Self::Business)
        } else if ["franchise", "toda", "transport"]
            .iter()
            .any(|alias| lower.contains(alias))
        {
            Some(Self::Franchise)
        } else if lower.contains("building") {
            Some(Self::Building)
        } else if lower.contains("barangay") {
            Some(Self::Barangay)
        } else {
            None
        }
    }

    /// Like [`PermitCategory::parse`], falling back to `Business`
    pub fn classify(permit_type: &str) -> Self {
        Self::parse(permit_type).unwrap_or_default()
    }

    /// Lowercase key used in configuration files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Franchise => "franchise",
            Self::Building => "building",
            Self::Barangay => "barangay",
        }
    }
}

impl fmt::Display for PermitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
