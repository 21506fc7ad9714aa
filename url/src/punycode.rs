//! Bootstring/Punycode, RFC 3492.
//!
//! Used by [`crate::idna`] to transcode domain labels to and from their
//! ASCII `xn--` form. All arithmetic here is checked rather than wrapping:
//! the original algorithm is defined over unbounded integers, and a
//! malicious or merely very long label must be rejected rather than
//! silently wrapping into a different (and plausible-looking) answer.

use std::fmt;

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PunycodeError {
    IntegerOverflow,
    InvalidInput,
}

impl fmt::Display for PunycodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerOverflow => f.write_str("punycode integer overflow"),
            Self::InvalidInput => f.write_str("invalid punycode input"),
        }
    }
}

impl std::error::Error for PunycodeError {}

fn encode_digit(digit: u32) -> u8 {
    debug_assert!(digit < BASE);
    if digit < 26 {
        b'a' + digit as u8
    } else {
        b'0' + (digit - 26) as u8
    }
}

fn decode_digit(byte: u8) -> Option<u32> {
    match byte {
        b'a'..=b'z' => Some(u32::from(byte - b'a')),
        b'A'..=b'Z' => Some(u32::from(byte - b'A')),
        b'0'..=b'9' => Some(u32::from(byte - b'0') + 26),
        _ => None,
    }
}

fn adapt(delta: u32, num_points: u32, first_time: bool) -> u32 {
    let mut delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

/// Encodes a sequence of code points into the Punycode payload that follows
/// the `xn--` prefix (the prefix itself is not added here).
pub fn encode(input: &[char]) -> Result<String, PunycodeError> {
    let mut output = String::new();

    let basic: Vec<char> = input.iter().copied().filter(|c| c.is_ascii()).collect();
    let basic_len = basic.len();
    for c in &basic {
        output.push(*c);
    }
    if basic_len > 0 {
        output.push('-');
    }

    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic_len as u32;
    let total = input.len() as u32;

    while handled < total {
        let min_code_point = input
            .iter()
            .map(|&c| c as u32)
            .filter(|&cp| cp >= n)
            .min()
            .ok_or(PunycodeError::InvalidInput)?;

        delta = delta
            .checked_add((min_code_point - n).checked_mul(handled + 1).ok_or(PunycodeError::IntegerOverflow)?)
            .ok_or(PunycodeError::IntegerOverflow)?;
        n = min_code_point;

        for &c in input {
            let code_point = c as u32;
            if code_point < n {
                delta = delta.checked_add(1).ok_or(PunycodeError::IntegerOverflow)?;
            }
            if code_point == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };

                    if q < t {
                        break;
                    }
                    output.push(encode_digit(t + ((q - t) % (BASE - t))) as char);
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(encode_digit(q) as char);
                bias = adapt(delta, handled + 1, handled == basic_len as u32);
                delta = 0;
                handled += 1;
            }
        }
        delta = delta.checked_add(1).ok_or(PunycodeError::IntegerOverflow)?;
        n = n.checked_add(1).ok_or(PunycodeError::IntegerOverflow)?;
    }

    Ok(output)
}

/// Decodes a Punycode payload (without the `xn--` prefix) back to code
/// points.
pub fn decode(input: &str) -> Result<Vec<char>, PunycodeError> {
    if !input.is_ascii() {
        return Err(PunycodeError::InvalidInput);
    }
    let bytes = input.as_bytes();

    let split = bytes.iter().rposition(|&b| b == b'-');
    let (basic, extended) = match split {
        Some(0) => (&[][..], &bytes[1..]),
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (&[][..], bytes),
    };

    let mut output: Vec<char> = basic
        .iter()
        .map(|&b| char::from_u32(u32::from(b)).ok_or(PunycodeError::InvalidInput))
        .collect::<Result<_, _>>()?;

    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut pos = 0;

    while pos < extended.len() {
        let old_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;
        loop {
            let byte = *extended.get(pos).ok_or(PunycodeError::InvalidInput)?;
            pos += 1;
            let digit = decode_digit(byte).ok_or(PunycodeError::InvalidInput)?;

            i = i
                .checked_add(digit.checked_mul(weight).ok_or(PunycodeError::IntegerOverflow)?)
                .ok_or(PunycodeError::IntegerOverflow)?;

            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };

            if digit < t {
                break;
            }
            weight = weight
                .checked_mul(BASE - t)
                .ok_or(PunycodeError::IntegerOverflow)?;
            k += BASE;
        }

        let num_points = output.len() as u32 + 1;
        bias = adapt(i - old_i, num_points, old_i == 0);
        n = n
            .checked_add(i / num_points)
            .ok_or(PunycodeError::IntegerOverflow)?;
        i %= num_points;

        let c = char::from_u32(n).ok_or(PunycodeError::InvalidInput)?;
        output.insert(i as usize, c);
        i += 1;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(label: &str, encoded: &str) {
        let code_points: Vec<char> = label.chars().collect();
        assert_eq!(encode(&code_points).unwrap(), encoded);
        assert_eq!(decode(encoded).unwrap(), code_points);
    }

    #[test]
    fn chinese_simplified() {
        roundtrip("他们为什么不说中文", "ihqwcrb4cv8a8dqg056pqjye");
    }

    #[test]
    fn czech() {
        roundtrip(
            "Pročprostěnemluvíčesky",
            "Proprostnemluvesky-uyb24dma41a1sb4gkism5a",
        );
    }

    #[test]
    fn ascii_only_label_adds_trailing_hyphen_and_is_unchanged() {
        let code_points: Vec<char> = "hello".chars().collect();
        assert_eq!(encode(&code_points).unwrap(), "hello-");
        assert_eq!(decode("hello-").unwrap(), code_points);
    }

    #[test]
    fn decode_rejects_non_ascii() {
        assert_eq!(decode("héllo"), Err(PunycodeError::InvalidInput));
    }

    #[test]
    fn decode_rejects_garbage_digits() {
        assert_eq!(decode("a-!!!"), Err(PunycodeError::InvalidInput));
    }
}
