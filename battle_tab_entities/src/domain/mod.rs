use std::str::FromStr;

use sea_orm::DbErr;

use crate::error::EntityError;


/// Declares an enum that is stored as a string column and serialized with the
/// same string values.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::EntityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(crate::error::EntityError::invalid(format!("Unknown {} '{}'", stringify!($name), s)))
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod competition;
pub mod stage;
pub mod competitor;
pub mod judge;
pub mod battle;
pub mod score;

pub use competition::Competition;
pub use stage::CompetitionStage;
pub use competitor::Competitor;
pub use judge::Judge;
pub use battle::Battle;
pub use score::Score;


pub(crate) fn now() -> sea_orm::prelude::DateTime {
    chrono::Utc::now().naive_utc()
}

/// Parses a value read back from a string column. Anything that does not
/// parse was not written by this crate, so it is reported as a database error.
pub(crate) fn parse_column<T>(value: &str, column: &'static str) -> Result<T, EntityError> where T: FromStr<Err = EntityError> {
    value.parse().map_err(|_| EntityError::Database(DbErr::Type(format!("Unexpected value '{}' in column {}", value, column))))
}

pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), EntityError> {
    if value.trim().is_empty() {
        return Err(EntityError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}
