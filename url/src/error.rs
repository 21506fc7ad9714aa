//! Validation errors accumulated while parsing, and the outcome they add up
//! to.
//!
//! <https://url.spec.whatwg.org/#validation-error> distinguishes *fatal*
//! errors, which abort parsing, from ordinary *validation* errors, which are
//! reported but do not stop the parser from producing a URL. `Diagnostics`
//! is the accumulator the parser pushes into; `ParseOutcome` is what you get
//! back out once parsing finishes.

use std::fmt;

/// Whether a [`ValidationError`] aborts parsing or is merely reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Validation,
    Fatal,
}

/// <https://url.spec.whatwg.org/#validation-error>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    DomainInvalidCodepoint,
    DomainToAscii,
    HostInvalidCodepoint,
    HostMissing,
    IPv4EmptyPart,
    IPv4TooManyParts,
    IPv4NonNumericPart,
    IPv4NonDecimalPart,
    IPv4OutOfRangePart,
    IPv6Unclosed,
    IPv6InvalidCompression,
    IPv6TooManyPieces,
    IPv6MultipleCompression,
    IPv6InvalidCodepoint,
    IPv6TooFewPieces,
    IPv4InIPv6TooManyPieces,
    IPv4InIPv6InvalidCodepoint,
    IPv4InIPv6OutOfRangePart,
    IPv4InIPv6TooFewParts,
    InvalidURLUnit,
    SpecialSchemeMissingFollowingSolidus,
    MissingSchemeNonRelativeURL,
    InvalidReverseSolidus,
    InvalidCredentials,
    PortOutOfRange,
    PortInvalid,
    FileInvalidWindowsDriveLetter,
    FileInvalidWindowsDriveLetterHost,
}

impl ValidationError {
    #[must_use]
    pub fn severity(self) -> Severity {
        use ValidationError::{
            DomainInvalidCodepoint, DomainToAscii, FileInvalidWindowsDriveLetterHost, HostMissing,
            IPv4EmptyPart,
            IPv4InIPv6InvalidCodepoint, IPv4InIPv6OutOfRangePart, IPv4InIPv6TooFewParts,
            IPv4InIPv6TooManyPieces, IPv4NonDecimalPart, IPv4NonNumericPart, IPv4OutOfRangePart,
            IPv4TooManyParts, IPv6InvalidCodepoint, IPv6InvalidCompression,
            IPv6MultipleCompression, IPv6TooFewPieces, IPv6TooManyPieces, IPv6Unclosed,
            MissingSchemeNonRelativeURL, PortInvalid, PortOutOfRange,
        };

        match self {
            DomainInvalidCodepoint
            | DomainToAscii
            | HostMissing
            | IPv4EmptyPart
            | IPv4TooManyParts
            | IPv4NonNumericPart
            | IPv4NonDecimalPart
            | IPv4OutOfRangePart
            | IPv6Unclosed
            | IPv6InvalidCompression
            | IPv6TooManyPieces
            | IPv6MultipleCompression
            | IPv6InvalidCodepoint
            | IPv6TooFewPieces
            | IPv4InIPv6TooManyPieces
            | IPv4InIPv6InvalidCodepoint
            | IPv4InIPv6OutOfRangePart
            | IPv4InIPv6TooFewParts
            | MissingSchemeNonRelativeURL
            | PortOutOfRange
            | PortInvalid
            | FileInvalidWindowsDriveLetterHost => Severity::Fatal,
            _ => Severity::Validation,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for ValidationError {}

/// What parsing produced: a URL with no complaints, a URL despite some
/// non-fatal complaints, or nothing at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    Success,
    SuccessWithWarnings,
    Failure,
}

/// Accumulates [`ValidationError`]s emitted while parsing a single URL.
///
/// Every push is also logged at `debug` level, so a consumer that only wants
/// "did it work" can ignore `Diagnostics` entirely and still see what went
/// wrong via `RUST_LOG`.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    errors: Vec<ValidationError>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error`. Returns `Err` if it was fatal, so callers can write
    /// `diagnostics.push(e)?;` to short-circuit exactly like the spec's
    /// "validation error, return failure" steps.
    pub fn push(&mut self, error: ValidationError) -> Result<(), ValidationError> {
        log::debug!("URL validation error: {error}");
        self.errors.push(error);
        match error.severity() {
            Severity::Fatal => Err(error),
            Severity::Validation => Ok(()),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn outcome(&self) -> ParseOutcome {
        if self.errors.is_empty() {
            ParseOutcome::Success
        } else {
            ParseOutcome::SuccessWithWarnings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_error_short_circuits() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.push(ValidationError::InvalidURLUnit).is_ok());
        assert!(diagnostics.push(ValidationError::HostMissing).is_err());
        assert_eq!(diagnostics.outcome(), ParseOutcome::SuccessWithWarnings);
    }

    #[test]
    fn empty_diagnostics_is_success() {
        assert_eq!(Diagnostics::new().outcome(), ParseOutcome::Success);
    }
}
