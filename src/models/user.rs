//! User model and rank hierarchy

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Privilege ranks, lowest to highest.
///
/// `Ladmin` is accepted as a stored value for legacy records; bot-level
/// admin status itself is derived from `bot_ladmins` membership, never
/// from this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    None,
    User,
    Ladmin,
    Gadmin,
    Operator,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::None => "none",
            Rank::User => "user",
            Rank::Ladmin => "ladmin",
            Rank::Gadmin => "gadmin",
            Rank::Operator => "operator",
        }
    }

    /// Human-readable label used in the /me profile card.
    pub fn label(&self) -> &'static str {
        match self {
            Rank::None => "👤 Unregistered",
            Rank::User => "👤 User",
            Rank::Ladmin => "🪛 Local administrator",
            Rank::Gadmin => "🔧 Global administrator",
            Rank::Operator => "⚡ Operator",
        }
    }
}

impl std::str::FromStr for Rank {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Rank::None),
            "user" => Ok(Rank::User),
            "ladmin" => Ok(Rank::Ladmin),
            "gadmin" => Ok(Rank::Gadmin),
            "operator" => Ok(Rank::Operator),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub rank: String,
    pub banned: bool,
    pub warns: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The rank recorded on the user row. Unknown legacy values degrade
    /// to `User`, the lowest registered rank.
    pub fn stored_rank(&self) -> Rank {
        self.rank.parse().unwrap_or(Rank::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ordering() {
        assert!(Rank::Operator > Rank::Gadmin);
        assert!(Rank::Gadmin > Rank::Ladmin);
        assert!(Rank::Ladmin > Rank::User);
        assert!(Rank::User > Rank::None);
    }

    #[test]
    fn rank_round_trip() {
        for rank in [Rank::None, Rank::User, Rank::Ladmin, Rank::Gadmin, Rank::Operator] {
            assert_eq!(rank.as_str().parse::<Rank>(), Ok(rank));
        }
        assert!("sysop".parse::<Rank>().is_err());
    }

    #[test]
    fn unknown_stored_rank_degrades_to_user() {
        let user = User {
            username: "alice".to_string(),
            user_id: 1,
            first_name: None,
            rank: "sysop".to_string(),
            banned: false,
            warns: 0,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(user.stored_rank(), Rank::User);
    }
}
