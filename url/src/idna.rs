//! IDNA `ToASCII`, <https://www.unicode.org/reports/tr46/>.
//!
//! The full pipeline: map each code point per its IDNA status, normalize to
//! NFC, split into labels on `.`, Punycode-encode any label containing a
//! non-ASCII code point, and validate every resulting label. `IdnaMapper`
//! wraps a sorted table of `(range, status)` entries loaded once into a
//! process-wide singleton, mirroring how the teacher loads its one static
//! dataset (the `AsciiSet` tables in `set.rs`) as `const`s rather than
//! parsing anything at startup -- the difference here is the table is too
//! large to hand-write as Rust literals, so it ships as an embedded CSV
//! instead and is parsed once, lazily.

use crate::punycode;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

const MAPPING_CSV: &str = include_str!("idna/idna_mapping.csv");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodePointStatus {
    Valid,
    Ignored,
    Mapped,
    Deviation,
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped,
}

struct MappingEntry {
    range: RangeInclusive<u32>,
    status: CodePointStatus,
    mapping: String,
}

/// Holds the parsed IDNA mapping table. Constructed once via
/// [`IdnaMapper::global`].
pub struct IdnaMapper {
    entries: Vec<MappingEntry>,
}

fn parse_status(tag: &str) -> CodePointStatus {
    match tag {
        "valid" => CodePointStatus::Valid,
        "ignored" => CodePointStatus::Ignored,
        "mapped" => CodePointStatus::Mapped,
        "deviation" => CodePointStatus::Deviation,
        "disallowed_STD3_valid" => CodePointStatus::DisallowedStd3Valid,
        "disallowed_STD3_mapped" => CodePointStatus::DisallowedStd3Mapped,
        _ => CodePointStatus::Disallowed,
    }
}

/// Decodes a mapping field of zero or more space-separated hex code points
/// into the literal replacement text, matching the table format used by
/// https://www.unicode.org/Public/idna/latest/IdnaMappingTable.txt.
fn parse_mapping(field: &str) -> String {
    field
        .split_whitespace()
        .map(|hex| {
            let point = u32::from_str_radix(hex, 16).expect("malformed idna mapping table");
            char::from_u32(point).expect("malformed idna mapping table")
        })
        .collect()
}

fn parse_code_points(field: &str) -> RangeInclusive<u32> {
    match field.split_once("..") {
        Some((low, high)) => {
            let low = u32::from_str_radix(low, 16).expect("malformed idna mapping table");
            let high = u32::from_str_radix(high, 16).expect("malformed idna mapping table");
            low..=high
        }
        None => {
            let point = u32::from_str_radix(field, 16).expect("malformed idna mapping table");
            point..=point
        }
    }
}

impl IdnaMapper {
    fn load() -> Self {
        let mut entries = Vec::new();
        for line in MAPPING_CSV.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.splitn(3, ',');
            let code_points = fields.next().expect("missing code-points field");
            let status = fields.next().expect("missing status field");
            let mapping = fields.next().unwrap_or("").trim();

            entries.push(MappingEntry {
                range: parse_code_points(code_points),
                status: parse_status(status),
                mapping: parse_mapping(mapping),
            });
        }
        entries.sort_unstable_by_key(|entry| *entry.range.start());
        Self { entries }
    }

    #[must_use]
    pub fn global() -> &'static IdnaMapper {
        static MAPPER: OnceLock<IdnaMapper> = OnceLock::new();
        MAPPER.get_or_init(IdnaMapper::load)
    }

    /// Looks up the IDNA status (and, for `mapped`/`deviation`, replacement
    /// text) of a single code point. Code points not present in the table
    /// default to `valid`, matching the table's documented convention of
    /// omitting large `valid` ranges.
    #[must_use]
    pub fn lookup(&self, c: char) -> (CodePointStatus, &str) {
        let point = c as u32;
        match self
            .entries
            .binary_search_by(|entry| {
                if point < *entry.range.start() {
                    std::cmp::Ordering::Greater
                } else if point > *entry.range.end() {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|i| &self.entries[i])
        {
            Some(entry) => (entry.status, entry.mapping.as_str()),
            None => (CodePointStatus::Valid, ""),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdnaError {
    DisallowedCodePoint,
    EmptyLabel,
    LabelTooLong,
    DomainTooLong,
    LeadingCombiningMark,
    HyphenAtPosition3And4,
    LeadingOrTrailingHyphen,
    Punycode(punycode::PunycodeError),
}

impl fmt::Display for IdnaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisallowedCodePoint => f.write_str("disallowed code point in domain label"),
            Self::EmptyLabel => f.write_str("empty domain label"),
            Self::LabelTooLong => f.write_str("domain label exceeds 63 octets"),
            Self::DomainTooLong => f.write_str("domain name exceeds 253 octets"),
            Self::LeadingCombiningMark => f.write_str("label starts with a combining mark"),
            Self::HyphenAtPosition3And4 => f.write_str("label has hyphens at positions 3 and 4"),
            Self::LeadingOrTrailingHyphen => f.write_str("label starts or ends with a hyphen"),
            Self::Punycode(e) => write!(f, "punycode error: {e}"),
        }
    }
}

impl std::error::Error for IdnaError {}

impl From<punycode::PunycodeError> for IdnaError {
    fn from(value: punycode::PunycodeError) -> Self {
        Self::Punycode(value)
    }
}

/// Parameters for [`to_ascii`]. The WHATWG host parser always calls with
/// `Default::default()`; the options exist as a separate type (rather than
/// being hardcoded) because the underlying UTS #46 algorithm is defined
/// with them as free parameters, and exposing the knob costs nothing.
#[derive(Clone, Copy, Debug)]
pub struct ToAsciiOptions {
    pub use_std3_ascii_rules: bool,
    pub check_hyphens: bool,
    pub verify_dns_length: bool,
}

impl Default for ToAsciiOptions {
    fn default() -> Self {
        Self {
            use_std3_ascii_rules: false,
            check_hyphens: false,
            verify_dns_length: false,
        }
    }
}

fn map_code_points(input: &str, options: ToAsciiOptions) -> Result<String, IdnaError> {
    let mapper = IdnaMapper::global();
    let mut mapped = String::with_capacity(input.len());

    for c in input.chars() {
        let (status, replacement) = mapper.lookup(c);
        match status {
            CodePointStatus::Valid | CodePointStatus::Deviation => mapped.push(c),
            CodePointStatus::Mapped => mapped.push_str(replacement),
            CodePointStatus::Ignored => {}
            CodePointStatus::DisallowedStd3Valid => {
                if options.use_std3_ascii_rules {
                    return Err(IdnaError::DisallowedCodePoint);
                }
                mapped.push(c);
            }
            CodePointStatus::DisallowedStd3Mapped => {
                if options.use_std3_ascii_rules {
                    return Err(IdnaError::DisallowedCodePoint);
                }
                mapped.push_str(replacement);
            }
            CodePointStatus::Disallowed => return Err(IdnaError::DisallowedCodePoint),
        }
    }

    Ok(mapped)
}

fn validate_label(label: &str, options: ToAsciiOptions) -> Result<(), IdnaError> {
    if label.is_empty() {
        if options.verify_dns_length {
            return Err(IdnaError::EmptyLabel);
        }
        return Ok(());
    }
    if label.len() > 63 {
        return Err(IdnaError::LabelTooLong);
    }
    if let Some(first) = label.chars().next() {
        if unicode_normalization::char::is_combining_mark(first) {
            return Err(IdnaError::LeadingCombiningMark);
        }
    }
    if options.check_hyphens {
        if label.starts_with('-') || label.ends_with('-') {
            return Err(IdnaError::LeadingOrTrailingHyphen);
        }
        let bytes = label.as_bytes();
        if bytes.len() >= 4 && bytes[2] == b'-' && bytes[3] == b'-' {
            return Err(IdnaError::HyphenAtPosition3And4);
        }
    }
    Ok(())
}

/// <https://www.unicode.org/reports/tr46/#ToASCII>
///
/// Bidi and contextual-joiner validation are explicitly out of scope (see
/// the crate's design notes); every other ToASCII step is implemented.
pub fn to_ascii(domain: &str, options: ToAsciiOptions) -> Result<String, IdnaError> {
    let mapped = map_code_points(domain, options)?;
    let normalized: String = mapped.nfc().collect();

    let mut labels = Vec::new();
    for label in normalized.split('.') {
        let ascii_label = if let Some(payload) = label.strip_prefix("xn--") {
            let decoded: String = punycode::decode(payload)?.into_iter().collect();
            validate_label(&decoded, options)?;
            format!("xn--{payload}")
        } else if label.is_ascii() {
            validate_label(label, options)?;
            label.to_owned()
        } else {
            let code_points: Vec<char> = label.chars().collect();
            let encoded = punycode::encode(&code_points)?;
            let ascii_label = format!("xn--{encoded}");
            validate_label(label, options)?;
            ascii_label
        };
        labels.push(ascii_label);
    }

    let result = labels.join(".");
    if options.verify_dns_length && result.len() > 253 {
        return Err(IdnaError::DomainTooLong);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_domain_is_unchanged() {
        assert_eq!(to_ascii("example.com", ToAsciiOptions::default()).unwrap(), "example.com");
    }

    #[test]
    fn uppercase_is_mapped_to_lowercase() {
        assert_eq!(to_ascii("EXAMPLE.com", ToAsciiOptions::default()).unwrap(), "example.com");
    }

    #[test]
    fn unicode_label_is_punycode_encoded() {
        let result = to_ascii("bücher.example", ToAsciiOptions::default()).unwrap();
        assert_eq!(result, "xn--bcher-kva.example");
    }

    #[test]
    fn trailing_empty_label_is_allowed_by_default() {
        // `example.com.` is a valid host (the FQDN trailing-dot form); ToASCII
        // with verify_dns_length=false must not reject the empty final label.
        assert_eq!(
            to_ascii("example.com.", ToAsciiOptions::default()).unwrap(),
            "example.com."
        );
    }

    #[test]
    fn empty_label_is_rejected_when_verifying_dns_length() {
        let options = ToAsciiOptions {
            verify_dns_length: true,
            ..Default::default()
        };
        assert!(to_ascii("a..b", options).is_err());
    }

    #[test]
    fn std3_rules_reject_forbidden_ascii() {
        let options = ToAsciiOptions {
            use_std3_ascii_rules: true,
            ..Default::default()
        };
        assert!(to_ascii("exa_mple.com", options).is_err());
    }
}
