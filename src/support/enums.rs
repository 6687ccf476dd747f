//! Closed tables of OCPI string codes
//!
//! [`ocpi_enum!`] declares a fieldless enum together with its wire code table.
//! Two flavours exist:
//!
//! - `fallback = Variant`: unknown codes read as the fallback (`parse` never
//!   fails), while `try_parse` still reports `None` for them;
//! - strict: unknown codes are an `InvalidFormat` error.
//!
//! Matching ignores ASCII case and surrounding whitespace.

macro_rules! ocpi_enum {
    (@common $(#[$meta:meta])* $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Wire code of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }

            /// Known code lookup; `None` for anything outside the table.
            pub fn try_parse(text: &str) -> Option<Self> {
                let text = text.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(text))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };

    ($(#[$meta:meta])* $name:ident, $what:literal, fallback = $fallback:ident { $($body:tt)+ }) => {
        $crate::support::enums::ocpi_enum!(@common $(#[$meta])* $name { $($body)+ });

        impl $name {
            /// Parse a code, reading unknown codes as the fallback variant.
            pub fn parse(text: &str) -> Self {
                Self::try_parse(text).unwrap_or(Self::$fallback)
            }

            /// True when `text` was not in the table and `parse` would fall back.
            pub fn is_unknown_code(text: &str) -> bool {
                Self::try_parse(text).is_none()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$fallback
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                let value = Self::parse(&text);
                if Self::is_unknown_code(&text) {
                    ::tracing::debug!(kind = $what, code = %text, fallback = %value, "Unknown code, using fallback");
                }
                Ok(value)
            }
        }
    };

    ($(#[$meta:meta])* $name:ident, $what:literal { $($body:tt)+ }) => {
        $crate::support::enums::ocpi_enum!(@common $(#[$meta])* $name { $($body)+ });

        impl $name {
            pub fn parse(text: &str) -> $crate::support::errors::DomainResult<Self> {
                Self::try_parse(text).ok_or_else(|| {
                    $crate::support::errors::DomainError::invalid_format(
                        $what,
                        format!("unknown code '{}'", text.trim()),
                    )
                })
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::support::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
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

pub(crate) use ocpi_enum;
