//! Symbolic ring and color names offered by the block menus.
//!
//! Names map to the same textual tokens the numeric inputs use, so a
//! named value goes through exactly the same parser as a typed one.

use pixelwire_frame::{Color, PixelRange};

use crate::config::ParseConfig;
use crate::error::Result;
use crate::parse::{parse_color, parse_range};

const RINGS: &[(&str, &str)] = &[
    ("outer ring", "0,11"),
    ("inner ring", "12,19"),
    ("all rings", "0,19"),
];

const COLORS: &[(&str, &str)] = &[
    ("red", "255,0,0"),
    ("orange", "255,128,0"),
    ("yellow", "255,255,0"),
    ("green", "0,255,0"),
    ("cyan", "0,255,255"),
    ("blue", "0,0,255"),
    ("purple", "128,0,255"),
    ("pink", "255,0,128"),
    ("white", "255,255,255"),
    ("off", "0,0,0"),
];

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    let name = name.trim();
    table
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, token)| *token)
}

/// Canonical range token for a ring name, if known.
pub fn ring_token(name: &str) -> Option<&'static str> {
    lookup(RINGS, name)
}

/// Canonical color token for a color name, if known.
pub fn color_token(name: &str) -> Option<&'static str> {
    lookup(COLORS, name)
}

/// All ring names with their tokens, in menu order.
pub fn rings() -> impl Iterator<Item = (&'static str, &'static str)> {
    RINGS.iter().copied()
}

/// All color names with their tokens, in menu order.
pub fn colors() -> impl Iterator<Item = (&'static str, &'static str)> {
    COLORS.iter().copied()
}

/// Parse a ring name or a `"start,end"` token.
pub fn resolve_range(input: &str, config: &ParseConfig) -> Result<PixelRange> {
    parse_range(ring_token(input).unwrap_or(input), config)
}

/// Parse a color name or an `"r,g,b"` token.
pub fn resolve_color(input: &str, config: &ParseConfig) -> Result<Color> {
    parse_color(color_token(input).unwrap_or(input), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_map_to_stable_tokens() {
        for _ in 0..3 {
            assert_eq!(ring_token("outer ring"), Some("0,11"));
            assert_eq!(color_token("red"), Some("255,0,0"));
        }
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(ring_token("  Outer Ring "), Some("0,11"));
        assert_eq!(color_token("WHITE"), Some("255,255,255"));
        assert_eq!(color_token("mauve"), None);
    }

    #[test]
    fn every_table_token_parses_strictly() {
        let strict = ParseConfig::strict();
        for (name, _) in rings() {
            assert!(resolve_range(name, &strict).is_ok(), "{name}");
        }
        for (name, _) in colors() {
            assert!(resolve_color(name, &strict).is_ok(), "{name}");
        }
    }

    #[test]
    fn resolve_falls_back_to_tokens() {
        let strict = ParseConfig::strict();
        assert_eq!(
            resolve_range("inner ring", &strict).unwrap(),
            PixelRange::new(12, 19)
        );
        assert_eq!(
            resolve_range("2,4", &strict).unwrap(),
            PixelRange::new(2, 4)
        );
        assert_eq!(resolve_color("off", &strict).unwrap(), Color::BLACK);
        assert!(resolve_color("mauve", &strict).is_err());
    }
}
