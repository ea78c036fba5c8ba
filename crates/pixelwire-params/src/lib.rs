//! Range, color and duration token parsing for pixelwire commands.
//!
//! The block host hands parameters over as text: `"0,11"` for a pixel
//! range, `"255,0,0"` for a color, or a symbolic name such as
//! `"outer ring"`. This crate turns those tokens into typed values.
//!
//! Parsing strictness is a choice of the caller, see [`ParseMode`].

pub mod config;
pub mod error;
pub mod names;
pub mod parse;

pub use config::{ParseConfig, ParseMode};
pub use error::{ParamError, Result};
pub use names::{color_token, colors, resolve_color, resolve_range, ring_token, rings};
pub use parse::{parse_byte, parse_color, parse_duration, parse_pace, parse_range};
