//! The transform's target resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::Error;

/// Width in pixels of a single monitor; always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct TargetResolution(NonZeroU32);

impl TargetResolution {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for TargetResolution {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| Error::Validation {
            input: value.to_string(),
            reason: reason.to_string(),
        };
        let value = u32::try_from(value).map_err(|_| {
            if value < 1 {
                invalid("must be at least 1")
            } else {
                invalid("is too large")
            }
        })?;
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| invalid("must be at least 1"))
    }
}

impl FromStr for TargetResolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| Error::Validation {
            input: s.to_string(),
            reason: "must be an integer".to_string(),
        })?;
        Self::try_from(value).map_err(|err| match err {
            Error::Validation { reason, .. } => Error::Validation {
                input: s.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl From<TargetResolution> for u32 {
    fn from(value: TargetResolution) -> Self {
        value.get()
    }
}

impl fmt::Display for TargetResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
