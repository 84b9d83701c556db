//! Domain enums shared by the store, the engine and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Template family used to phrase a stored answer.
///
/// The database keeps the lowercase name (`yesno`, `process`, ...) as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Generic,
    YesNo,
    Process,
    Definition,
    Deadline,
    Location,
    Eligibility,
}

impl Category {
    /// Every category, in the order offered to trainers.
    pub const ALL: [Category; 7] = [
        Category::YesNo,
        Category::Process,
        Category::Definition,
        Category::Deadline,
        Category::Location,
        Category::Generic,
        Category::Eligibility,
    ];

    /// Database string representation of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::YesNo => "yesno",
            Self::Process => "process",
            Self::Definition => "definition",
            Self::Deadline => "deadline",
            Self::Location => "location",
            Self::Eligibility => "eligibility",
        }
    }

    /// Answer format a trainer must follow for this category.
    pub fn training_hint(&self) -> &'static str {
        match self {
            Self::YesNo => "start the answer with \"yes\" or \"no\" only",
            Self::Process => "give exactly three steps separated by \"; \"",
            Self::Definition => {
                "do not repeat the word being defined, start the answer with \"the\""
            }
            Self::Deadline => "only give the date, for example \"March 31st 2025\"",
            Self::Location => "only give the location, for example \"the FAFSA.gov website\"",
            Self::Generic => "any comprehensive format",
            Self::Eligibility => "start the answer with a pronoun such as \"you\" or \"they\"",
        }
    }

    /// Comma separated list of category names, for prompts.
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "yesno" => Ok(Self::YesNo),
            "process" => Ok(Self::Process),
            "definition" => Ok(Self::Definition),
            "deadline" => Ok(Self::Deadline),
            "location" => Ok(Self::Location),
            "eligibility" => Ok(Self::Eligibility),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Access mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Answer from the knowledge base and train on misses.
    Learn,
    /// Answer from the knowledge base only.
    Recall,
    /// Solve arithmetic, conversion and geometry word problems.
    Compute,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learn => "learn",
            Self::Recall => "recall",
            Self::Compute => "compute",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learn" | "l" | "t" | "train" => Ok(Self::Learn),
            "recall" | "r" | "a" => Ok(Self::Recall),
            "compute" | "c" => Ok(Self::Compute),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
