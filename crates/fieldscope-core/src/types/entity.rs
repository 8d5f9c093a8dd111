//! Entity type tags

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// The kind of record returned by the tracker
///
/// Selects which field catalog applies to a record. The set is fixed;
/// anything else is a caller defect, not user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Issues (tickets, bugs, stories, sub-tasks)
    Issue,
    /// Projects
    Project,
    /// Users and accounts
    User,
    /// Agile entities (boards, sprints, epics)
    Agile,
    /// Server/system information
    System,
}

impl EntityType {
    /// All entity types, in declaration order
    pub const ALL: [EntityType; 5] = [
        EntityType::Issue,
        EntityType::Project,
        EntityType::User,
        EntityType::Agile,
        EntityType::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Issue => "issue",
            EntityType::Project => "project",
            EntityType::User => "user",
            EntityType::Agile => "agile",
            EntityType::System => "system",
        }
    }

    /// Parse a tag, case-insensitively
    ///
    /// `agile-entity` is accepted as an alias for `agile`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "issue" => Some(EntityType::Issue),
            "project" => Some(EntityType::Project),
            "user" => Some(EntityType::User),
            "agile" | "agile-entity" => Some(EntityType::Agile),
            "system" => Some(EntityType::System),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entity tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

/// Deserializes through [`EntityType::parse`], so tags are case-insensitive
impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        EntityType::parse(&tag).ok_or_else(|| de::Error::custom(UnknownEntityType(tag)))
    }
}

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(EntityType::parse("issue"), Some(EntityType::Issue));
        assert_eq!(EntityType::parse("Project"), Some(EntityType::Project));
        assert_eq!(EntityType::parse("agile-entity"), Some(EntityType::Agile));
        assert_eq!(EntityType::parse(" agile "), Some(EntityType::Agile));
        assert_eq!(EntityType::parse("unknown-entity-type"), None);
    }

    #[test]
    fn test_round_trip_through_str() {
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>(), Ok(entity));
        }
    }

    #[test]
    fn test_serde_alias() {
        let parsed: EntityType = serde_json::from_str("\"agile-entity\"").unwrap();
        assert_eq!(parsed, EntityType::Agile);
        assert_eq!(serde_json::to_string(&EntityType::Agile).unwrap(), "\"agile\"");
    }

    #[test]
    fn test_deserialize_is_case_insensitive() {
        let parsed: Vec<EntityType> = serde_json::from_str(r#"["Issue", "PROJECT", "Agile-Entity"]"#).unwrap();
        assert_eq!(parsed, vec![EntityType::Issue, EntityType::Project, EntityType::Agile]);

        let err = serde_json::from_str::<EntityType>("\"widget\"").unwrap_err();
        assert!(err.to_string().contains("Unknown entity type: widget"));
    }
}
