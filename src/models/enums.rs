use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($s) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(InvalidEnum {
                    field: stringify!($name).into(),
                    value: s.into(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Sport {
    Baseball => "Baseball",
    Basketball => "Basketball",
    Football => "Football",
    Hockey => "Hockey",
    Soccer => "Soccer",
    Other => "Other",
});

// Layout slot of a text region on the card face.
str_enum!(RegionPosition {
    Top => "top",
    Middle => "middle",
    Bottom => "bottom",
    Left => "left",
    Right => "right",
});

str_enum!(FontSize {
    Large => "large",
    Medium => "medium",
    Small => "small",
});

str_enum!(ConfidenceLevel {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(CardSide {
    Front => "front",
    Back => "back",
});

impl RegionPosition {
    /// Reading order used when regions are concatenated into full text.
    pub fn reading_rank(&self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
            Self::Bottom => 4,
        }
    }
}

impl ConfidenceLevel {
    /// Level for a 0-100 score: high from 80, medium from 60.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::High,
            60..=79 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl Sport {
    /// Every concrete sport, in the order keyword scoring breaks ties.
    pub const ALL: [Sport; 5] = [
        Sport::Baseball,
        Sport::Basketball,
        Sport::Football,
        Sport::Hockey,
        Sport::Soccer,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sport_round_trips_through_str() {
        for sport in Sport::ALL {
            assert_eq!(Sport::from_str(sport.as_str()).unwrap(), sport);
        }
    }

    #[test]
    fn sport_parse_is_case_insensitive() {
        assert_eq!(Sport::from_str("basketball").unwrap(), Sport::Basketball);
        assert_eq!(Sport::from_str(" HOCKEY ").unwrap(), Sport::Hockey);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = Sport::from_str("Cricket").unwrap_err();
        assert_eq!(err.field, "Sport");
        assert_eq!(err.value, "Cricket");
    }

    #[test]
    fn reading_rank_orders_top_to_bottom() {
        assert!(RegionPosition::Top.reading_rank() < RegionPosition::Middle.reading_rank());
        assert!(RegionPosition::Middle.reading_rank() < RegionPosition::Bottom.reading_rank());
    }

    #[test]
    fn serde_uses_the_display_form() {
        let json = serde_json::to_string(&ConfidenceLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: RegionPosition = serde_json::from_str("\"Bottom\"").unwrap();
        assert_eq!(back, RegionPosition::Bottom);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(ConfidenceLevel::from_score(100), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(80), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(79), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(60), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(59), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0), ConfidenceLevel::Low);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ConfidenceLevel::High.to_string(), "high");
        assert_eq!(CardSide::Back.to_string(), "back");
    }
}
