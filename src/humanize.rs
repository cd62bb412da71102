//! Human-readable retention age parsing and formatting (`7d`, `2w`, `1m`, `1y`)

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Accepted examples, shown alongside parse errors
pub const VALID_AGE_FORMATS: &str = "1d, 1w, 2w, 1m, 3m, 6m, 1y";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDuration {
    #[error("invalid duration '{0}', expected <count><unit>")]
    Format(String),

    #[error("invalid count: {0}")]
    Number(#[from] std::num::ParseIntError),

    #[error("invalid unit '{0}', use: d, w, m, y")]
    Unit(String),

    #[error("count must be positive, got {0}")]
    NonPositive(i64),

    #[error("count {0} is too large")]
    Overflow(i64),
}

/// Unit suffix of a retention age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Days,
    Weeks,
    /// Fixed 30-day months, not calendar months
    Months,
    /// Fixed 365-day years, leap days ignored
    Years,
}

impl AgeUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "d" => Some(Self::Days),
            "w" => Some(Self::Weeks),
            "m" => Some(Self::Months),
            "y" => Some(Self::Years),
            _ => None,
        }
    }

    pub fn suffix(&self) -> char {
        match self {
            Self::Days => 'd',
            Self::Weeks => 'w',
            Self::Months => 'm',
            Self::Years => 'y',
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::Days => 1,
            Self::Weeks => 7,
            Self::Months => 30,
            Self::Years => 365,
        }
    }
}

/// Age threshold for filtered cleanup, e.g. "entries older than 2w"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionAge {
    count: u32,
    unit: AgeUnit,
}

impl RetentionAge {
    pub fn new(count: u32, unit: AgeUnit) -> Result<Self, InvalidDuration> {
        if count == 0 {
            return Err(InvalidDuration::NonPositive(0));
        }
        Ok(Self { count, unit })
    }

    pub fn as_duration(&self) -> time::Duration {
        time::Duration::seconds(i64::from(self.count) * self.unit.days() * SECONDS_PER_DAY)
    }

    pub fn as_nanos(&self) -> i128 {
        self.as_duration().whole_nanoseconds()
    }
}

impl FromStr for RetentionAge {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((split, _)) = s.char_indices().last() else {
            return Err(InvalidDuration::Format(s.to_string()));
        };
        if split == 0 {
            return Err(InvalidDuration::Format(s.to_string()));
        }

        let (num_str, suffix) = s.split_at(split);
        let num: i64 = num_str.parse()?;
        let unit = AgeUnit::from_suffix(suffix)
            .ok_or_else(|| InvalidDuration::Unit(suffix.to_string()))?;

        if num <= 0 {
            return Err(InvalidDuration::NonPositive(num));
        }
        let count = u32::try_from(num).map_err(|_| InvalidDuration::Overflow(num))?;

        Ok(Self { count, unit })
    }
}

impl fmt::Display for RetentionAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl Serialize for RetentionAge {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RetentionAge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RetentionAgeVisitor;

        impl serde::de::Visitor<'_> for RetentionAgeVisitor {
            type Value = RetentionAge;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a retention age such as {}", VALID_AGE_FORMATS)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<RetentionAge>().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(RetentionAgeVisitor)
    }
}
