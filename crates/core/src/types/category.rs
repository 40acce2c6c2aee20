//! Shoe categories.

use serde::{Deserialize, Serialize};

/// Catalog category of a shoe.
///
/// Stored as lowercase `TEXT` with a `CHECK` constraint. Parsing is
/// case-insensitive so the admin form can send `"Running"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Running,
    Casual,
    Lifestyle,
    Skate,
    Sports,
    Formal,
}

impl Category {
    /// All categories in catalog display order.
    pub const ALL: [Self; 6] = [
        Self::Running,
        Self::Casual,
        Self::Lifestyle,
        Self::Skate,
        Self::Sports,
        Self::Formal,
    ];

    /// Lowercase identifier used in URLs, JSON, and the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Casual => "casual",
            Self::Lifestyle => "lifestyle",
            Self::Skate => "skate",
            Self::Sports => "sports",
            Self::Formal => "formal",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Casual => "Casual",
            Self::Lifestyle => "Lifestyle",
            Self::Skate => "Skate",
            Self::Sports => "Sports",
            Self::Formal => "Formal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}
