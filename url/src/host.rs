//! The `Host` type and its parser.
//!
//! <https://url.spec.whatwg.org/#host-parsing>. Dispatches on bracket
//! syntax (`[...]` -> IPv6), whether the scheme is special (non-special ->
//! opaque host), and otherwise IDNA-processes the input and checks whether
//! the result looks like an IPv4 address.

use crate::error::ValidationError;
use crate::idna::{self, ToAsciiOptions};
use crate::ip::{self, Ipv4Address, Ipv6Address};
use crate::set::forbidden_host_code_points;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Host {
    Domain(String),
    IpAddress(IpAddress),
    Opaque(String),
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(v4) => write!(f, "{v4}"),
            Self::V6(v6) => write!(f, "{v6}"),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(domain) => f.write_str(domain),
            Self::IpAddress(ip) => write!(f, "{ip}"),
            Self::Opaque(host) => f.write_str(host),
            Self::Empty => Ok(()),
        }
    }
}

/// <https://url.spec.whatwg.org/#concept-host-parser>
pub fn host_parse(
    input: &str,
    is_special: bool,
    warnings: &mut Vec<ValidationError>,
) -> Result<Host, ValidationError> {
    if let Some(inner) = input.strip_prefix('[') {
        let Some(inner) = inner.strip_suffix(']') else {
            return Err(ValidationError::IPv6Unclosed);
        };
        return ip::ipv6_parse(inner).map(|addr| Host::IpAddress(IpAddress::V6(addr)));
    }

    if !is_special {
        return opaque_host_parse(input, warnings);
    }

    if input.is_empty() {
        return Err(ValidationError::HostMissing);
    }

    let domain = crate::percent::percent_decode_to_string(input);
    let ascii_domain = idna::to_ascii(&domain, ToAsciiOptions::default())
        .map_err(|_| ValidationError::DomainToAscii)?;

    for c in ascii_domain.chars() {
        if forbidden_domain_code_point(c) {
            return Err(ValidationError::DomainInvalidCodepoint);
        }
    }

    if ends_in_number(&ascii_domain) {
        return ip::ipv4_parse(&ascii_domain).map(|(addr, ipv4_warnings)| {
            warnings.extend(ipv4_warnings);
            Host::IpAddress(IpAddress::V4(addr))
        });
    }

    Ok(Host::Domain(ascii_domain))
}

fn forbidden_domain_code_point(c: char) -> bool {
    crate::set::forbidden_domain_code_points().contains(c)
}

/// <https://url.spec.whatwg.org/#opaque-host-parser>
fn opaque_host_parse(
    input: &str,
    _warnings: &mut [ValidationError],
) -> Result<Host, ValidationError> {
    if input.is_empty() {
        return Ok(Host::Empty);
    }

    let forbidden = forbidden_host_code_points();
    for c in input.chars() {
        if c != '%' && forbidden.contains(c) {
            return Err(ValidationError::HostInvalidCodepoint);
        }
    }

    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        crate::percent::percent_encode_char(c, &crate::set::c0_control_percent_encode_set(), &mut out);
    }
    Ok(Host::Opaque(out))
}

/// <https://url.spec.whatwg.org/#ends-in-a-number-checker>
fn ends_in_number(input: &str) -> bool {
    let parts: Vec<&str> = input.split('.').collect();
    let Some(last) = parts.last().copied() else {
        return false;
    };

    let last = if last.is_empty() {
        match parts.len() {
            1 => return false,
            _ => parts[parts.len() - 2],
        }
    } else {
        last
    };

    if last.is_empty() {
        return false;
    }

    if last.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    let digits = last
        .strip_prefix("0x")
        .or_else(|| last.strip_prefix("0X"))
        .unwrap_or(last);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_parses_lowercased() {
        let mut warnings = Vec::new();
        let host = host_parse("EXAMPLE.com", true, &mut warnings).unwrap();
        assert_eq!(host, Host::Domain("example.com".to_owned()));
    }

    #[test]
    fn ipv4_looking_domain_becomes_ipv4() {
        let mut warnings = Vec::new();
        let host = host_parse("192.168.0.1", true, &mut warnings).unwrap();
        assert_eq!(
            host,
            Host::IpAddress(IpAddress::V4(Ipv4Address(0xC0A80001)))
        );
    }

    #[test]
    fn bracketed_ipv6_is_parsed() {
        let mut warnings = Vec::new();
        let host = host_parse("[::1]", true, &mut warnings).unwrap();
        assert_eq!(
            host,
            Host::IpAddress(IpAddress::V6(Ipv6Address([0, 0, 0, 0, 0, 0, 0, 1])))
        );
    }

    #[test]
    fn non_special_scheme_keeps_opaque_host() {
        let mut warnings = Vec::new();
        let host = host_parse("SomeHost", false, &mut warnings).unwrap();
        assert_eq!(host, Host::Opaque("SomeHost".to_owned()));
    }

    #[test]
    fn empty_special_host_is_fatal() {
        let mut warnings = Vec::new();
        assert!(host_parse("", true, &mut warnings).is_err());
    }

    #[test]
    fn ends_in_number_detects_hex_and_decimal() {
        assert!(ends_in_number("0x1"));
        assert!(ends_in_number("123"));
        assert!(!ends_in_number("example"));
        assert!(ends_in_number("1.2.3."));
    }
}
