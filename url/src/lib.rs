//! A WHATWG URL Standard parser and serializer.
//!
//! <https://url.spec.whatwg.org/>. The entry points are [`Url::parse`] and
//! [`Url::parse_with_base`]; everything else in this crate exists to
//! support the basic URL parser ([`parser`]) and the host parser
//! ([`host`]) it delegates to.

pub mod error;
pub mod host;
pub mod idna;
pub mod ip;
mod parser;
pub mod percent;
pub mod punycode;
pub mod set;
mod url;
mod util;

pub use error::{ParseOutcome, ValidationError};
pub use host::{Host, IpAddress};
pub use parser::Parsed;
pub use url::{UrlPath, UrlValue};

use std::fmt;
use std::str::FromStr;

/// A parsed URL, and the public surface most callers should reach for
/// instead of [`UrlValue`] directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    value: UrlValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError(pub ValidationError);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse URL: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

impl Url {
    /// <https://url.spec.whatwg.org/#concept-url-parser>, without a base URL.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with_base(input, None)
    }

    /// <https://url.spec.whatwg.org/#concept-url-parser>, relative to `base`
    /// if given.
    pub fn parse_with_base(input: &str, base: Option<&Url>) -> Result<Self, ParseError> {
        let base_value = base.map(|b| &b.value);
        let parsed = parser::parse(input, base_value).map_err(ParseError)?;
        if !parsed.diagnostics.is_empty() {
            log::debug!(
                "parsed {input:?} with {} validation warning(s)",
                parsed.diagnostics.errors().len()
            );
        }
        Ok(Self { value: parsed.url })
    }

    /// Parses `input`, panicking on failure. Named to match the spec's
    /// "parse or throw" external entry point.
    ///
    /// # Panics
    /// Panics if `input` does not parse.
    #[must_use]
    pub fn parse_or_throw(input: &str) -> Self {
        Self::parse(input).expect("invalid URL")
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.value.scheme
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.value.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.value.password
    }

    #[must_use]
    pub fn host(&self) -> Option<&Host> {
        self.value.host.as_ref()
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.value.port
    }

    #[must_use]
    pub fn port_or_default(&self) -> Option<u16> {
        self.value.port.or_else(|| self.value.default_port())
    }

    #[must_use]
    pub fn path(&self) -> &UrlPath {
        &self.value.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.value.query.as_deref()
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.value.fragment.as_deref()
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.value.is_special()
    }

    #[must_use]
    pub fn has_opaque_path(&self) -> bool {
        self.value.has_opaque_path()
    }

    #[must_use]
    pub fn as_value(&self) -> &UrlValue {
        &self.value
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl FromStr for Url {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Url {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        let url = Url::parse("https://example.com/a?b#c").unwrap();
        assert_eq!(url.to_string(), "https://example.com/a?b#c");
    }

    #[test]
    fn accessors_expose_components() {
        let url = Url::parse("https://user:pw@example.com:8080/path?q#f").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.username(), "user");
        assert_eq!(url.password(), "pw");
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.query(), Some("q"));
        assert_eq!(url.fragment(), Some("f"));
    }

    #[test]
    fn port_or_default_fills_in_special_scheme_port() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(url.port(), None);
        assert_eq!(url.port_or_default(), Some(443));
    }

    #[test]
    fn invalid_relative_reference_without_base_errors() {
        assert!(Url::parse("/just/a/path").is_err());
    }

    #[test]
    fn from_str_works() {
        let url: Url = "https://example.com".parse().unwrap();
        assert_eq!(url.scheme(), "https");
    }
}
