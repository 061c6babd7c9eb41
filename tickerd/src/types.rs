//! Common type definitions shared across the crate.
//!
//! - [`UserId`]: opaque user identifier minted by the external identity layer
//! - [`Tier`]: subscription tier controlling the daily swipe allotment
//! - [`Category`]: the two kinds of recommendation cards
//! - [`SwipeDirection`]: accept/reject decision on a card
//! - [`UserProfile`]: onboarding profile passed through to content generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Opaque user identifier. The identity layer in front of this service mints
/// these; the core never parses or interprets them.
pub type UserId = String;

/// Subscription tier. The tier decides how many swipes a user gets per UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
}

impl Tier {
    /// Daily swipe allotment for this tier.
    pub fn daily_limit(self) -> u32 {
        match self {
            Tier::Free => 10,
            Tier::Pro => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Card category. Stock cards are identified by ticker, idea cards by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stock,
    Idea,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Stock => "stock",
            Category::Idea => "idea",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(Category::Stock),
            "idea" => Ok(Category::Idea),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Accept (right) or reject (left) decision on one card. Both directions
/// consume a swipe; only right swipes create a saved-card association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(SwipeDirection::Left),
            "right" => Ok(SwipeDirection::Right),
            other => Err(format!("unknown swipe direction: {other}")),
        }
    }
}

/// User onboarding profile, opaque to quota accounting. It is forwarded to the
/// content generator verbatim and snapshotted alongside cached batches for
/// audit purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub investment_amount: String,
    pub risk_level: String,
    pub interests: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_limits() {
        assert_eq!(Tier::Free.daily_limit(), 10);
        assert_eq!(Tier::Pro.daily_limit(), 50);
    }

    #[test]
    fn tier_round_trips_as_str() {
        for tier in [Tier::Free, Tier::Pro] {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("premium".parse::<Tier>().is_err());
    }

    #[test]
    fn profile_uses_camel_case_wire_format() {
        let profile = UserProfile {
            investment_amount: "$1K - $5K".to_string(),
            risk_level: "moderate".to_string(),
            interests: vec!["technology".to_string()],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("investmentAmount").is_some());
        assert!(json.get("riskLevel").is_some());
    }
}
