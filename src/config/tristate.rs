//! Tri-state policy flags.

use std::fmt;
use std::str::FromStr;

/// A policy flag that may still be undecided.
///
/// `Unset` is distinct from `False`: it means "ask (or apply the default)
/// once", after which explicit configuration or user consent moves the
/// flag to `True` or `False`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// Resolve `Unset` to the given default.
    pub fn or(self, default: bool) -> bool {
        match self {
            TriState::True => true,
            TriState::False => false,
            TriState::Unset => default,
        }
    }

    /// Return `other` when this flag is unset.
    pub fn or_else(self, other: TriState) -> TriState {
        match self {
            TriState::Unset => other,
            TriState::True | TriState::False => self,
        }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, TriState::Unset)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t" | "true" | "yes" | "y" | "on" | "1" => Ok(TriState::True),
            "f" | "false" | "no" | "n" | "off" | "0" => Ok(TriState::False),
            "" | "?" | "undetermined" | "unset" => Ok(TriState::Unset),
            other => Err(format!("not a tri-state value: {}", other)),
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Unset => write!(f, "undetermined"),
            TriState::True => write!(f, "true"),
            TriState::False => write!(f, "false"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("t".parse::<TriState>().unwrap(), TriState::True);
        assert_eq!("Yes".parse::<TriState>().unwrap(), TriState::True);
        assert_eq!("f".parse::<TriState>().unwrap(), TriState::False);
        assert_eq!("0".parse::<TriState>().unwrap(), TriState::False);
        assert_eq!("".parse::<TriState>().unwrap(), TriState::Unset);
        assert_eq!("undetermined".parse::<TriState>().unwrap(), TriState::Unset);
    }

    #[test]
    fn rejects_garbage() {
        assert!("maybe".parse::<TriState>().is_err());
    }

    #[test]
    fn or_resolves_unset_only() {
        assert!(TriState::Unset.or(true));
        assert!(!TriState::Unset.or(false));
        assert!(!TriState::False.or(true));
        assert!(TriState::True.or(false));
    }

    #[test]
    fn or_else_keeps_decided_values() {
        assert_eq!(TriState::False.or_else(TriState::True), TriState::False);
        assert_eq!(TriState::Unset.or_else(TriState::True), TriState::True);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for tri in [TriState::Unset, TriState::True, TriState::False] {
            assert_eq!(tri.to_string().parse::<TriState>().unwrap(), tri);
        }
    }
}
