//! The closed token vocabulary.
//!
//! Tokens are written in notes as `(name)`. Each token maps to exactly one
//! SVG asset named after it.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing a name that is not in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token: {0}")]
pub struct UnknownToken(pub String);

macro_rules! vocabulary {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A recognized symbol token.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Token {
            $(
                #[doc = concat!("`(", $name, ")`")]
                $variant,
            )+
        }

        impl Token {
            /// Every token, in vocabulary order.
            pub const ALL: &'static [Token] = &[$(Token::$variant),+];

            /// Name as written between parentheses.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Token::$variant => $name,)+
                }
            }

            /// Asset file name for this token.
            #[must_use]
            pub const fn file_name(self) -> &'static str {
                match self {
                    $(Token::$variant => concat!($name, ".svg"),)+
                }
            }
        }

        impl FromStr for Token {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Token::$variant),)+
                    _ => Err(UnknownToken(s.to_owned())),
                }
            }
        }
    };
}

vocabulary! {
    Op => "op",
    Su => "su",
    Ex => "ex",
    St => "st",
    Skill => "skill",
    Ring => "ring",
    Earth => "earth",
    Water => "water",
    Fire => "fire",
    Air => "air",
    Void => "void",
    Kiho => "kiho",
    Maho => "maho",
    Ninjutsu => "ninjutsu",
    Ritual => "ritual",
    Shuji => "shuji",
    Invocation => "invocation",
    Kata => "kata",
    Prereq => "prereq",
    Inversion => "inversion",
    Mantra => "mantra",
    Imperial => "imperial",
    Crab => "crab",
    CrabX => "crabx",
    Crane => "crane",
    CraneX => "cranex",
    Dragon => "dragon",
    DragonX => "dragonx",
    Lion => "lion",
    LionX => "lionx",
    Mantis => "mantis",
    MantisX => "mantisx",
    Phoenix => "phoenix",
    PhoenixX => "phoenixx",
    Scorpion => "scorpion",
    ScorpionX => "scorpionx",
    Tortoise => "tortoise",
    TortoiseX => "tortoisex",
    Unicorn => "unicorn",
    UnicornX => "unicornx",
    Ronin => "ronin",
    Courtier => "courtier",
    Bushi => "bushi",
    Shugenja => "shugenja",
}

impl Token {
    /// Token written back in its source form, `(name)`.
    #[must_use]
    pub fn marker(self) -> String {
        format!("({})", self.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up an asset file name by token name.
///
/// Returns `None` for names outside the vocabulary.
#[must_use]
pub fn file_for(name: &str) -> Option<&'static str> {
    name.parse::<Token>().ok().map(Token::file_name)
}
