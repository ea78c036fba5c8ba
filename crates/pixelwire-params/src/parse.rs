use pixelwire_frame::{duration_from_secs, Color, Pace, PixelRange, SpeedLabel};

use crate::config::{ParseConfig, ParseMode};
use crate::error::{ParamError, Result};

/// Parse a `"start,end"` token.
pub fn parse_range(token: &str, config: &ParseConfig) -> Result<PixelRange> {
    let [start, end] = parse_components::<2>(token, config)?;
    Ok(PixelRange::new(start, end))
}

/// Parse an `"r,g,b"` token.
pub fn parse_color(token: &str, config: &ParseConfig) -> Result<Color> {
    let [red, green, blue] = parse_components::<3>(token, config)?;
    Ok(Color::new(red, green, blue))
}

/// Parse a single byte value such as a brightness or a count.
pub fn parse_byte(token: &str, config: &ParseConfig) -> Result<u8> {
    match config.mode {
        ParseMode::Strict => strict_byte(token, token),
        ParseMode::Legacy => Ok(legacy_byte(token)),
    }
}

/// Parse a duration given in seconds into wire milliseconds.
///
/// Legacy mode truncates toward zero and wraps into 16 bits instead of
/// failing, the way a 16-bit unsigned store does.
pub fn parse_duration(token: &str, config: &ParseConfig) -> Result<u16> {
    let trimmed = token.trim();
    match config.mode {
        ParseMode::Strict => {
            let seconds: f64 = trimmed
                .parse()
                .map_err(|_| ParamError::invalid(token, "expected seconds"))?;
            Ok(duration_from_secs(seconds)?)
        }
        ParseMode::Legacy => {
            let millis = legacy_number(trimmed) * 1000.0;
            Ok(wrap_to_bits(millis, 16) as u16)
        }
    }
}

/// Parse a speed: a label (`slow`, `medium`, `fast`) or a raw wait in ms.
pub fn parse_pace(token: &str, config: &ParseConfig) -> Result<Pace> {
    if let Ok(label) = token.parse::<SpeedLabel>() {
        return Ok(Pace::Label(label));
    }
    parse_byte(token, config).map(Pace::WaitMs)
}

fn parse_components<const N: usize>(token: &str, config: &ParseConfig) -> Result<[u8; N]> {
    let parts: Vec<&str> = token.split(',').collect();
    let mut out = [0u8; N];

    match config.mode {
        ParseMode::Strict => {
            if parts.len() != N {
                return Err(ParamError::invalid(
                    token,
                    format!("expected {N} comma-separated values, got {}", parts.len()),
                ));
            }
            for (slot, part) in out.iter_mut().zip(&parts) {
                *slot = strict_byte(token, part)?;
            }
        }
        ParseMode::Legacy => {
            if parts.len() != N {
                tracing::debug!(token, expected = N, got = parts.len(), "coercing malformed token");
            }
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = parts.get(i).map_or(0, |part| legacy_byte(part));
            }
        }
    }

    Ok(out)
}

fn strict_byte(token: &str, part: &str) -> Result<u8> {
    let part = part.trim();
    if part.is_empty() {
        return Err(ParamError::invalid(token, "empty component"));
    }
    let value: i64 = part
        .parse()
        .map_err(|_| ParamError::invalid(token, format!("'{part}' is not a whole number")))?;
    u8::try_from(value)
        .map_err(|_| ParamError::invalid(token, format!("{value} is outside 0..=255")))
}

fn legacy_byte(part: &str) -> u8 {
    wrap_to_bits(legacy_number(part.trim()), 8) as u8
}

/// Numeric reading of a component; anything unreadable counts as zero.
///
/// Accepts decimal and exponent forms plus unsigned `0x`, `0o` and `0b`
/// integer literals.
fn legacy_number(part: &str) -> f64 {
    if part.is_empty() {
        return 0.0;
    }
    let radix = match part.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return radix_number(&part[2..], radix);
    }
    match part.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn radix_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return 0.0;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(0.0)
}

/// Truncate toward zero and reduce modulo 2^bits.
fn wrap_to_bits(value: f64, bits: u32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let modulus = f64::from(1u32 << bits);
    value.trunc().rem_euclid(modulus) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: ParseConfig = ParseConfig::strict();
    const LEGACY: ParseConfig = ParseConfig::legacy();

    #[test]
    fn parses_range_token() {
        assert_eq!(parse_range("0,11", &STRICT).unwrap(), PixelRange::new(0, 11));
        assert_eq!(parse_range(" 3 , 7 ", &STRICT).unwrap(), PixelRange::new(3, 7));
    }

    #[test]
    fn reversed_range_is_kept() {
        assert_eq!(parse_range("11,0", &STRICT).unwrap(), PixelRange::new(11, 0));
    }

    #[test]
    fn parses_color_token() {
        assert_eq!(parse_color("255,0,0", &STRICT).unwrap(), Color::new(255, 0, 0));
    }

    #[test]
    fn strict_rejects_malformed_tokens() {
        for token in ["0", "0,11,3", "a,b", "0,", "0,256", "-1,4", "1.5,2"] {
            let result = parse_range(token, &STRICT);
            assert!(
                matches!(result, Err(ParamError::InvalidArgument { .. })),
                "{token} should be rejected"
            );
        }
        assert!(parse_color("255,0", &STRICT).is_err());
    }

    #[test]
    fn legacy_coerces_like_byte_arrays() {
        assert_eq!(parse_range("0", &LEGACY).unwrap(), PixelRange::new(0, 0));
        assert_eq!(parse_range("x,11", &LEGACY).unwrap(), PixelRange::new(0, 11));
        assert_eq!(parse_range("256,257", &LEGACY).unwrap(), PixelRange::new(0, 1));
        assert_eq!(parse_range("-1,12.9", &LEGACY).unwrap(), PixelRange::new(255, 12));
        assert_eq!(parse_color("255,0,0,9", &LEGACY).unwrap(), Color::new(255, 0, 0));
    }

    #[test]
    fn parses_durations_in_seconds() {
        assert_eq!(parse_duration("5.2", &STRICT).unwrap(), 5200);
        assert_eq!(parse_duration("0", &STRICT).unwrap(), 0);
        assert!(matches!(
            parse_duration("70", &STRICT),
            Err(ParamError::Frame(_))
        ));
        assert!(matches!(
            parse_duration("soon", &STRICT),
            Err(ParamError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn legacy_duration_wraps() {
        assert_eq!(parse_duration("soon", &LEGACY).unwrap(), 0);
        assert_eq!(parse_duration("70", &LEGACY).unwrap(), (70_000u32 % 65_536) as u16);
    }

    #[test]
    fn legacy_duration_truncates_toward_zero() {
        // -1.5 ms truncates to -1, not -2.
        assert_eq!(parse_duration("-0.0015", &LEGACY).unwrap(), 65_535);
        assert_eq!(parse_duration("0.0019", &LEGACY).unwrap(), 1);
    }

    #[test]
    fn legacy_reads_radix_literals() {
        assert_eq!(parse_byte("0x1F", &LEGACY).unwrap(), 31);
        assert_eq!(parse_byte("0XFF", &LEGACY).unwrap(), 255);
        assert_eq!(parse_byte("0o17", &LEGACY).unwrap(), 15);
        assert_eq!(parse_byte("0b101", &LEGACY).unwrap(), 5);
        assert_eq!(parse_byte("0x1FF", &LEGACY).unwrap(), 255);
        assert_eq!(parse_color("0x10, 0b11,0o7", &LEGACY).unwrap(), Color::new(16, 3, 7));
        assert_eq!(parse_duration("0x2", &LEGACY).unwrap(), 2_000);

        for unreadable in ["0x", "0xZZ", "0b102", "-0x1F"] {
            assert_eq!(parse_byte(unreadable, &LEGACY).unwrap(), 0, "{unreadable}");
        }
        assert!(parse_byte("0x1F", &STRICT).is_err());
    }

    #[test]
    fn parses_pace_labels_and_raw_waits() {
        assert_eq!(
            parse_pace("fast", &STRICT).unwrap(),
            Pace::Label(SpeedLabel::Fast)
        );
        assert_eq!(parse_pace("50", &STRICT).unwrap(), Pace::WaitMs(50));
        assert!(parse_pace("quick", &STRICT).is_err());
        assert_eq!(parse_pace("quick", &LEGACY).unwrap(), Pace::WaitMs(0));
    }

    #[test]
    fn parses_single_bytes() {
        assert_eq!(parse_byte("200", &STRICT).unwrap(), 200);
        assert!(parse_byte("300", &STRICT).is_err());
        assert_eq!(parse_byte("300", &LEGACY).unwrap(), 44);
    }
}
