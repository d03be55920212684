use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize;
use diesel::serialize::{IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How well the user recalled a card during one review
///
/// Stored as TEXT (`again`, `good`, `easy`) and sent over the wire the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[serde(rename_all = "lowercase")]
#[diesel(sql_type = Text)]
pub enum Rating {
    /// The card was forgotten
    Again,
    /// The card was recalled
    Good,
    /// The card was recalled without effort
    Easy,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid rating '{0}': expected one of again, good, easy")]
pub struct ParseRatingError(pub String);

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Again, Rating::Good, Rating::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    /// Whether the review counts towards the run of consecutive recalls
    pub fn is_success(&self) -> bool {
        !matches!(self, Rating::Again)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ParseRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Rating::Again),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            other => Err(ParseRatingError(other.to_string())),
        }
    }
}

impl FromSql<Text, Sqlite> for Rating {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(text.parse::<Rating>()?)
    }
}

impl ToSql<Text, Sqlite> for Rating {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ratings() {
        assert_eq!("again".parse::<Rating>(), Ok(Rating::Again));
        assert_eq!("good".parse::<Rating>(), Ok(Rating::Good));
        assert_eq!("easy".parse::<Rating>(), Ok(Rating::Easy));
    }

    #[test]
    fn test_parse_rejects_unknown_ratings() {
        for input in ["", "hard", "Good", "EASY", " good", "1"] {
            let err = input.parse::<Rating>().unwrap_err();
            assert_eq!(err.0, input);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Rating::Again).unwrap(), "\"again\"");
        let rating: Rating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(rating, Rating::Easy);
        assert!(serde_json::from_str::<Rating>("\"hard\"").is_err());
    }

    #[test]
    fn test_only_again_breaks_the_streak() {
        assert!(!Rating::Again.is_success());
        assert!(Rating::Good.is_success());
        assert!(Rating::Easy.is_success());
    }
}
