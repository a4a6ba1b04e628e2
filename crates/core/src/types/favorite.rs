//! Favorite spa toggle actions and their outcomes.

use core::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Requested change to a customer's favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

/// The action string was neither `add` nor `remove`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid action {0:?}, use \"add\" or \"remove\"")]
pub struct InvalidFavoriteAction(pub String);

impl FromStr for FavoriteAction {
    type Err = InvalidFavoriteAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(InvalidFavoriteAction(other.to_string())),
        }
    }
}

/// What a toggle actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteOutcome {
    Added,
    Removed,
    /// Remove was requested but no favorite was stored.
    None,
}

impl FavoriteOutcome {
    /// Human-readable summary for API responses.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Spa added to favorites",
            Self::Removed => "Spa removed from favorites",
            Self::None => "No favorite to remove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("add".parse(), Ok(FavoriteAction::Add));
        assert_eq!("remove".parse(), Ok(FavoriteAction::Remove));
        assert_eq!(
            "ADD".parse::<FavoriteAction>(),
            Err(InvalidFavoriteAction("ADD".to_string()))
        );
    }

    #[test]
    fn test_outcome_wire_names() {
        assert_eq!(
            serde_json::to_value(FavoriteOutcome::None).ok(),
            Some(serde_json::json!("none"))
        );
        assert_eq!(FavoriteOutcome::Added.message(), "Spa added to favorites");
    }
}
