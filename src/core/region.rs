//! Game-server region policy, stored per guild.
//!
//! The region is an explicit per-guild configuration record read per
//! operation; there is no process-wide default that gets mutated at runtime.
//! Rendered timestamps use Discord's viewer-local `<t:..>` format, so the
//! region only drives labeling.

use std::str::FromStr;

/// Game-server region a guild plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// US servers (Pacific Time)
    #[default]
    Us,
    /// EU servers (Central European Time)
    Eu,
    /// Oceanic servers (Australian Eastern Time)
    Oce,
}

impl Region {
    /// The short code stored in `guild_configs.region`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Eu => "EU",
            Self::Oce => "OCE",
        }
    }

    /// IANA timezone name of the region's servers.
    #[must_use]
    pub const fn timezone_name(self) -> &'static str {
        match self {
            Self::Us => "US/Pacific",
            Self::Eu => "Europe/Paris",
            Self::Oce => "Australia/Sydney",
        }
    }

    /// Human-readable label shown in the setup summary.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Us => "US - Pacific Time (PST/PDT)",
            Self::Eu => "EU - Central European Time (CET/CEST)",
            Self::Oce => "OCE - Australian Eastern Time (AEST/AEDT)",
        }
    }

    /// Parses a stored region code, falling back to the default for anything
    /// unrecognized (including the NULL column on pre-region rows).
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "EU" => Ok(Self::Eu),
            "OCE" => Ok(Self::Oce),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for region in [Region::Us, Region::Eu, Region::Oce] {
            assert_eq!(region.as_str().parse::<Region>(), Ok(region));
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("oce".parse::<Region>(), Ok(Region::Oce));
        assert_eq!(" eu ".parse::<Region>(), Ok(Region::Eu));
    }

    #[test]
    fn test_unknown_defaults_to_us() {
        assert_eq!(Region::from_stored(None), Region::Us);
        assert_eq!(Region::from_stored(Some("MARS")), Region::Us);
        assert_eq!(Region::from_stored(Some("EU")), Region::Eu);
    }
}
