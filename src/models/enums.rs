use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(LabelType {
    Envelope => "Envelope",
    Card => "Card",
});

impl LabelType {
    pub const ALL: [LabelType; 2] = [LabelType::Envelope, LabelType::Card];

    /// Literal marker that identifies this type inside a chip file name.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Envelope => "Envelopes",
            Self::Card => "Letters",
        }
    }

    /// Map an operator answer ("Envelopes", "letters", "card", ...) to a type.
    /// Anything else, including "none", means "skip this file".
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "envelopes" | "envelope" | "e" => Some(Self::Envelope),
            "letters" | "letter" | "card" | "cards" | "l" => Some(Self::Card),
            _ => None,
        }
    }
}
