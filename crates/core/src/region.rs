//! Short region codes and the AWS regions they stand for.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported deployment region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// United States (`us-east-1`)
    Us,
    /// Canada (`ca-central-1`)
    Ca,
    /// United Kingdom (`eu-west-2`)
    Uk,
}

impl Region {
    /// Every region, in menu order.
    pub const ALL: [Self; 3] = [Self::Us, Self::Ca, Self::Uk];

    /// Short code shown to the operator.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Ca => "ca",
            Self::Uk => "uk",
        }
    }

    /// AWS region identifier.
    #[must_use]
    pub const fn aws_region(self) -> &'static str {
        match self {
            Self::Us => "us-east-1",
            Self::Ca => "ca-central-1",
            Self::Uk => "eu-west-2",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == s)
            .ok_or_else(|| Error::UnknownRegion {
                code: s.to_string(),
            })
    }
}

/// Map a short region code to its AWS region identifier.
///
/// # Errors
/// Returns [`Error::UnknownRegion`] for any code outside `us`, `ca`, `uk`.
pub fn resolve_region(code: &str) -> Result<&'static str> {
    Ok(code.parse::<Region>()?.aws_region())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_codes() {
        assert_eq!(resolve_region("us").unwrap(), "us-east-1");
        assert_eq!(resolve_region("ca").unwrap(), "ca-central-1");
        assert_eq!(resolve_region("uk").unwrap(), "eu-west-2");
    }

    #[test]
    fn test_resolve_unknown_code_fails() {
        for code in ["eu", "US", "", "us-east-1"] {
            assert!(
                matches!(resolve_region(code), Err(Error::UnknownRegion { .. })),
                "{code} should not resolve"
            );
        }
    }

    #[test]
    fn test_display_matches_code() {
        for region in Region::ALL {
            assert_eq!(region.to_string(), region.code());
            assert_eq!(region.code().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_menu_order() {
        let codes: Vec<_> = Region::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["us", "ca", "uk"]);
    }
}
