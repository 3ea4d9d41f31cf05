//! Crosshair code decoder
//!
//! Valorant shares crosshairs as semicolon separated `key;value` pairs, e.g.
//! `0;P;c;5;h;0;0t;1;0l;4;0o;2;0a;1;0f;0;1t;3;1o;2;1a;1`. Only the primary
//! section (`0;P;`) is read, and only this run of keys, in this order:
//!
//! | key  | meaning                         |
//! |------|---------------------------------|
//! | `0t` | outline enabled (0/1)           |
//! | `0l` | inner line length (half units)  |
//! | `0o` | outer line length (half units)  |
//! | `0a` | inner line opacity (percent)    |
//! | `0f` | inner line offset (ignored)     |
//! | `1t` | outline thickness               |
//! | `1o` | outer line opacity (percent)    |
//! | `1a` | outer line opacity multiplier   |
//!
//! Anything between the section marker and `0t` is skipped. A code that does
//! not contain the whole run is rejected as a unit.

use std::str::FromStr;

use crate::config::CrosshairConfig;
use crate::error::CodeError;

/// Marker of the primary crosshair section
pub const PRIMARY_SECTION: &str = "0;P;";

const KEYS: [&str; 8] = ["0t", "0l", "0o", "0a", "0f", "1t", "1o", "1a"];

/// Raw values of the fields read from a crosshair code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosshairCode {
    pub outline_enabled: u32,
    pub inner_length: u32,
    pub outer_length: u32,
    pub inner_opacity_percent: u32,
    pub inner_offset: u32,
    pub outline_thickness: u32,
    pub outer_opacity_percent: u32,
    pub outer_opacity_multiplier: u32,
}

impl CrosshairCode {
    pub fn parse(code: &str) -> Result<Self, CodeError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CodeError::Empty);
        }

        let start = code.find(PRIMARY_SECTION).ok_or(CodeError::MissingPrefix)?;
        let tokens: Vec<&str> = code[start + PRIMARY_SECTION.len()..].split(';').collect();

        // Try every `0t` as the start of the run and keep the error from the
        // attempt that got furthest, so the message names the field that broke.
        let mut furthest: Option<(usize, CodeError)> = None;
        for anchor in (0..tokens.len()).filter(|&i| tokens[i] == KEYS[0]) {
            match read_run(&tokens[anchor..]) {
                Ok(values) => return Ok(Self::from_values(values)),
                Err((matched, err)) => {
                    if furthest.as_ref().is_none_or(|(best, _)| matched > *best) {
                        furthest = Some((matched, err));
                    }
                }
            }
        }

        Err(furthest
            .map(|(_, err)| err)
            .unwrap_or(CodeError::MissingField { key: KEYS[0] }))
    }

    fn from_values(values: [u32; 8]) -> Self {
        let [
            outline_enabled,
            inner_length,
            outer_length,
            inner_opacity_percent,
            inner_offset,
            outline_thickness,
            outer_opacity_percent,
            outer_opacity_multiplier,
        ] = values;
        Self {
            outline_enabled,
            inner_length,
            outer_length,
            inner_opacity_percent,
            inner_offset,
            outline_thickness,
            outer_opacity_percent,
            outer_opacity_multiplier,
        }
    }

    /// Outer opacity as the code defines it: percent times multiplier over 100
    ///
    /// Not normalized, so it can exceed 1.0.
    pub fn outer_opacity(&self) -> f32 {
        (self.outer_opacity_percent as f32 * self.outer_opacity_multiplier as f32) / 100.0
    }

    /// Write the decoded fields into `config`
    ///
    /// Lengths are doubled (the code counts half units). The inner offset has no
    /// counterpart in the configuration and is dropped.
    pub fn apply(&self, config: &mut CrosshairConfig) {
        config.show_outline = self.outline_enabled != 0;
        config.inner_length = self.inner_length.saturating_mul(2);
        config.outer_length = self.outer_length.saturating_mul(2);
        config.inner_opacity = self.inner_opacity_percent as f32 / 100.0;
        config.outline_thickness = self.outline_thickness;
        config.outer_opacity = self.outer_opacity();
    }
}

impl FromStr for CrosshairCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Read the key run starting at `tokens[0]`
///
/// On failure returns how many fields were read before the error.
fn read_run(tokens: &[&str]) -> Result<[u32; 8], (usize, CodeError)> {
    let mut values = [0u32; 8];
    let mut tokens = tokens.iter();

    for (index, &key) in KEYS.iter().enumerate() {
        match tokens.next() {
            Some(&token) if token == key => {}
            _ => return Err((index, CodeError::MissingField { key })),
        }
        let raw = tokens
            .next()
            .ok_or((index, CodeError::MissingField { key }))?;
        values[index] = parse_value(key, raw).map_err(|err| (index, err))?;
    }

    Ok(values)
}

/// Parse the value of `key`
///
/// Values inside the run must be all digits. The last value only needs a
/// leading digit run, so `1a;0.35` reads as 0.
fn parse_value(key: &'static str, raw: &str) -> Result<u32, CodeError> {
    let invalid = || CodeError::InvalidValue { key, value: raw.to_string() };
    let digits = raw.bytes().take_while(u8::is_ascii_digit).count();
    let is_last = key == KEYS[KEYS.len() - 1];
    if digits == 0 || (!is_last && digits != raw.len()) {
        return Err(invalid());
    }
    raw[..digits].parse().map_err(|_| invalid())
}
