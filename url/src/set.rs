//! Composable sets of code points, used throughout the crate as predicates
//! (forbidden host code points, percent-encode sets, the URL code-point
//! set...).
//!
//! The teacher's `AsciiSet` is a 128-bit bitset, which is plenty for
//! byte-oriented percent-encoding but can't represent "every code point
//! except the C0 controls" or "above U+10FFFF is never valid" style sets
//! that show up once code points rather than bytes are in play. `CharacterSet`
//! keeps the same builder shape (`from_range`, `merge`/`add`, `contains`)
//! but stores a sorted, disjoint list of inclusive ranges and answers
//! `contains` with a binary search instead of a bit test.

use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Range {
    start: u32,
    end: u32,
}

/// A set of Unicode code points, built from ranges and individual members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterSet {
    ranges: Vec<Range>,
}

impl CharacterSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self::from_range(c, c)
    }

    #[must_use]
    pub fn from_range(low: char, high: char) -> Self {
        let mut set = Self::new();
        set.add_range(low, high);
        set
    }

    #[must_use]
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self::new();
        for c in chars {
            set.add_range(c, c);
        }
        set
    }

    pub fn add(&mut self, c: char) -> &mut Self {
        self.add_range(c, c)
    }

    pub fn add_range(&mut self, low: char, high: char) -> &mut Self {
        debug_assert!(low <= high);
        self.ranges.push(Range {
            start: low as u32,
            end: high as u32,
        });
        self.canonicalize();
        self
    }

    /// Unions `other` into `self`.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        self.ranges.extend_from_slice(&other.ranges);
        self.canonicalize();
        self
    }

    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    fn canonicalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<Range> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if range.start <= last.end.saturating_add(1) => {
                    last.end = last.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        self.ranges = merged;
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        let point = c as u32;
        self.ranges
            .binary_search_by(|range| {
                if point < range.start {
                    Ordering::Greater
                } else if point > range.end {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// <https://infra.spec.whatwg.org/#c0-control>, extended with DEL per
/// <https://url.spec.whatwg.org/#c0-control-percent-encode-set> (the spec's
/// "C0 control percent-encode set" is C0 controls *and* all code points
/// greater than U+007E, so DEL itself only matters for the boundary; we
/// resolve the open question from the design notes by including U+007F in
/// the control set proper, matching INFRA's literal definition of C0
/// control as U+0000 to U+001F inclusive -- DEL is handled separately by
/// each percent-encode set that needs it).
#[must_use]
pub fn c0_control() -> CharacterSet {
    CharacterSet::from_range('\u{0}', '\u{1F}')
}

/// <https://url.spec.whatwg.org/#c0-control-percent-encode-set>
#[must_use]
pub fn c0_control_percent_encode_set() -> CharacterSet {
    let mut set = c0_control();
    set.add_range('\u{7F}', char::MAX);
    set
}

/// <https://url.spec.whatwg.org/#fragment-percent-encode-set>
#[must_use]
pub fn fragment_percent_encode_set() -> CharacterSet {
    let mut set = c0_control_percent_encode_set();
    set.add(' ').add('"').add('<').add('>').add('`');
    set
}

/// <https://url.spec.whatwg.org/#query-percent-encode-set>
#[must_use]
pub fn query_percent_encode_set() -> CharacterSet {
    let mut set = c0_control_percent_encode_set();
    set.add(' ').add('"').add('#').add('<').add('>');
    set
}

/// <https://url.spec.whatwg.org/#special-query-percent-encode-set>
#[must_use]
pub fn special_query_percent_encode_set() -> CharacterSet {
    let mut set = query_percent_encode_set();
    set.add('\'');
    set
}

/// <https://url.spec.whatwg.org/#path-percent-encode-set>
#[must_use]
pub fn path_percent_encode_set() -> CharacterSet {
    let mut set = query_percent_encode_set();
    set.add('?').add('`').add('{').add('}');
    set
}

/// <https://url.spec.whatwg.org/#userinfo-percent-encode-set>
#[must_use]
pub fn userinfo_percent_encode_set() -> CharacterSet {
    let mut set = path_percent_encode_set();
    set.add('/').add(':').add(';').add('=').add('@');
    set.add_range('[', '^');
    set.add('|');
    set
}

/// <https://url.spec.whatwg.org/#component-percent-encode-set>
#[must_use]
pub fn component_percent_encode_set() -> CharacterSet {
    let mut set = userinfo_percent_encode_set();
    set.add('$').add_range('%', '&').add('+').add(',');
    set
}

/// <https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set>
#[must_use]
pub fn form_urlencoded_percent_encode_set() -> CharacterSet {
    let mut set = component_percent_encode_set();
    set.add('!').add_range('\'', ')').add('~');
    set
}

/// <https://url.spec.whatwg.org/#url-code-points>
#[must_use]
pub fn url_code_points() -> CharacterSet {
    let mut set = CharacterSet::new();
    set.add_range('a', 'z')
        .add_range('A', 'Z')
        .add_range('0', '9');
    set.add_chars("!$&'()*+,-./:;=?@_~".chars())
        .add_range('\u{A0}', '\u{10FFFD}');
    set
}

impl CharacterSet {
    fn add_chars(&mut self, chars: impl IntoIterator<Item = char>) -> &mut Self {
        for c in chars {
            self.add(c);
        }
        self
    }
}

/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
#[must_use]
pub fn forbidden_host_code_points() -> CharacterSet {
    CharacterSet::from_chars("\0\t\n\r #/:<>?@[\\]^|".chars())
}

/// <https://url.spec.whatwg.org/#forbidden-domain-code-point>
#[must_use]
pub fn forbidden_domain_code_points() -> CharacterSet {
    let mut set = forbidden_host_code_points();
    set.merge(&c0_control());
    set.add('%').add('\u{7F}');
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_empty() {
        assert!(CharacterSet::new().is_empty());
        assert!(!CharacterSet::new().contains('a'));
    }

    #[test]
    fn add_contains() {
        let mut set = CharacterSet::new();
        set.add_range('a', 'z');
        assert!(set.contains('m'));
        assert!(!set.contains('A'));
    }

    #[test]
    fn canonicalizes_overlapping_ranges() {
        let mut set = CharacterSet::new();
        set.add_range('a', 'f');
        set.add_range('d', 'k');
        assert_eq!(set.ranges.len(), 1);
        assert!(set.contains('a'));
        assert!(set.contains('k'));
        assert!(!set.contains('l'));
    }

    #[test]
    fn c0_control_percent_encode_set_covers_high_code_points() {
        let set = c0_control_percent_encode_set();
        assert!(set.contains('\u{0}'));
        assert!(set.contains('\u{7F}'));
        assert!(set.contains('\u{10FFFF}'));
        assert!(!set.contains('a'));
    }

    #[test]
    fn userinfo_set_is_superset_of_path_set() {
        let userinfo = userinfo_percent_encode_set();
        let path = path_percent_encode_set();
        assert!(userinfo.contains('@'));
        assert!(!path.contains('@'));
        assert!(userinfo.contains('{'));
    }

    #[test]
    fn forbidden_domain_superset_of_forbidden_host() {
        let domain = forbidden_domain_code_points();
        assert!(domain.contains('%'));
        assert!(domain.contains('#'));
        assert!(domain.contains('\u{1}'));
    }
}
