//! Data models for the NeonSki planner.
//!
//! Field names serialize in camelCase and enum values in SCREAMING_SNAKE_CASE,
//! matching what the frontend already sends. Each model also declares its
//! authorization rules through [`crate::auth::Model`].

/// Declares a closed string enum usable on the wire and in SQLite columns.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, sqlx::Type,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(crate::errors::AppError::Validation(format!(
                        "Invalid {} value: {}",
                        stringify!($name),
                        s
                    ))),
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

mod activity;
mod adventure;
mod gear;
mod participant;
mod resort;
mod user;

pub use activity::*;
pub use adventure::*;
pub use gear::*;
pub use participant::*;
pub use resort::*;
pub use user::*;

/// Reject blank values for fields that are declared required.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), crate::errors::AppError> {
    if value.trim().is_empty() {
        return Err(crate::errors::AppError::required(field));
    }
    Ok(())
}

/// Like [`require_text`], for partial updates where the field may be absent.
pub(crate) fn require_if_present(
    field: &str,
    value: Option<&String>,
) -> Result<(), crate::errors::AppError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}
