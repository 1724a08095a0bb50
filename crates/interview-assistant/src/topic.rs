use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Expertise area an answer is scoped to
///
/// The set is closed; the first entry is what the page preselects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Topic {
    #[default]
    Finance,
    Marketing,
    Analytics,
    Operations,
}

impl Topic {
    /// Every topic, in selector order
    pub const ALL: [Topic; 4] = [
        Topic::Finance,
        Topic::Marketing,
        Topic::Analytics,
        Topic::Operations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Topic::Finance => "Finance",
            Topic::Marketing => "Marketing",
            Topic::Analytics => "Analytics",
            Topic::Operations => "Operations",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}
