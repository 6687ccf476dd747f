//! Case-insensitive identifier plumbing
//!
//! OCPI identifiers are `CiString`s: they compare, order and hash without
//! regard to case. [`ocpi_identifier!`] stamps out one wrapper type per
//! identifier kind so every kind gets the same parse / compare contract.

use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hasher;

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::errors::{DomainError, DomainResult};

/// Case-insensitive ordinal comparison of the upper-cased text, so `_`, `[`
/// and `` ` `` sort after letters (`"AB" < "A_1"`).
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

/// Hash the upper-cased text so that hashing agrees with [`cmp_ignore_case`].
pub fn hash_ignore_case<H: Hasher>(text: &str, state: &mut H) {
    for c in text.chars().flat_map(char::to_uppercase) {
        state.write_u32(c as u32);
    }
    state.write_u8(0xff);
}

pub fn max_length(text: &str, max: usize) -> Result<(), String> {
    let len = text.chars().count();
    if len > max {
        return Err(format!("must be at most {} characters, got {}", max, len));
    }
    Ok(())
}

/// Random `[A-Za-z0-9]` token of the given length.
pub fn random_alphanumeric(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Decide an entity's identifier from the value embedded in the JSON body
/// and the one supplied out of band (e.g. a URL path segment).
pub fn resolve_identifier<I>(
    entity: &'static str,
    from_body: Option<I>,
    from_route: Option<&I>,
) -> DomainResult<I>
where
    I: Clone + PartialEq + Display,
{
    match (from_body, from_route) {
        (Some(body), Some(route)) if body != *route => Err(DomainError::ConflictingIdentifier {
            entity,
            body: body.to_string(),
            route: route.to_string(),
        }),
        (Some(body), _) => Ok(body),
        (None, Some(route)) => Ok(route.clone()),
        (None, None) => Err(DomainError::MissingIdentifier { entity }),
    }
}

/// Declare a case-insensitive identifier type.
///
/// ```ignore
/// ocpi_identifier!(
///     /// Party identifier
///     PartyId, "party id", rule = |text: &str| ...
/// );
/// ocpi_identifier!(TariffId, "tariff id", max_len = 36);
/// ```
macro_rules! ocpi_identifier {
    ($(#[$meta:meta])* $name:ident, $what:literal, max_len = $max:expr) => {
        $crate::support::id::ocpi_identifier!(
            $(#[$meta])* $name,
            $what,
            rule = |text: &str| $crate::support::id::max_length(text, $max)
        );
    };
    ($(#[$meta:meta])* $name:ident, $what:literal, rule = $rule:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name(String);

        impl $name {
            /// Parse from text, trimming surrounding whitespace.
            pub fn parse(text: &str) -> $crate::support::errors::DomainResult<Self> {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err($crate::support::errors::DomainError::invalid_format(
                        $what,
                        "must not be empty",
                    ));
                }
                let rule = $rule;
                rule(trimmed).map_err(|reason: String| {
                    $crate::support::errors::DomainError::invalid_format($what, reason)
                })?;
                Ok(Self(trimmed.to_string()))
            }

            pub fn try_parse(text: &str) -> Option<Self> {
                Self::parse(text).ok()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the default (uninitialized) value.
            pub fn is_null_or_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == ::std::cmp::Ordering::Equal
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                $crate::support::id::cmp_ignore_case(&self.0, &other.0)
            }
        }

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $crate::support::id::hash_ignore_case(&self.0, state);
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::support::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&text).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use ocpi_identifier;
