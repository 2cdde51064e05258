//! Macro for implementing Display and FromStr for wire enums
//!
//! The dashboard API encodes statuses and roles as lowercase snake_case
//! strings. This macro keeps `Display`/`FromStr` in lockstep with the serde
//! representation so the same strings can be used on the command line.
//!
//! # Example
//!
//! ```rust
//! use pmdash_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Stage {
//!     Draft,
//!     InReview,
//! }
//!
//! impl_domain_status_conversions!(Stage {
//!     Draft => "draft",
//!     InReview => "in_review",
//! });
//!
//! assert_eq!(Stage::InReview.to_string(), "in_review");
//! assert_eq!("DRAFT".parse::<Stage>().unwrap(), Stage::Draft);
//! ```

/// Implements Display and FromStr traits for status/role enums
///
/// - Display writes the wire string
/// - FromStr parses case-insensitively and accepts `-` in place of `_`
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace('-', "_").as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
