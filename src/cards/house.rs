//! Houses, card kinds and token kinds.
//!
//! All three parse from the lowercase names used in chat commands and
//! configuration files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unrecognized name for a fixed vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {vocabulary} '{name}'")]
pub struct ParseNameError {
    pub vocabulary: &'static str,
    pub name: String,
}

macro_rules! named_enum {
    ($ty:ident, $vocab:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Lowercase name.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ParseNameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ParseNameError {
                        vocabulary: $vocab,
                        name: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// A card's faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum House {
    Brobnar,
    Dis,
    Logos,
    Mars,
    Sanctum,
    Shadows,
    Untamed,
}

named_enum!(House, "house", {
    Brobnar => "brobnar",
    Dis => "dis",
    Logos => "logos",
    Mars => "mars",
    Sanctum => "sanctum",
    Shadows => "shadows",
    Untamed => "untamed",
});

/// Card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Creature,
    Artifact,
    Upgrade,
    Action,
}

named_enum!(CardKind, "card kind", {
    Creature => "creature",
    Artifact => "artifact",
    Upgrade => "upgrade",
    Action => "action",
});

/// Counters placed on cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Amber,
    Damage,
    Power,
    Stun,
}

named_enum!(TokenKind, "token", {
    Amber => "amber",
    Damage => "damage",
    Power => "power",
    Stun => "stun",
});
