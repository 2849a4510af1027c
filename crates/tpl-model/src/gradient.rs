#![forbid(unsafe_code)]

//! Legacy composite gradient strings.
//!
//! The interchange format stores each color pair as a single CSS string,
//! `linear-gradient(to right, #0ea5e9, #2563eb)`. Decoding reads the color
//! arguments of that function by position, so any CSS color value survives a
//! round trip. Strings that are not a `linear-gradient(...)` call are
//! scanned for six-digit hex colors instead. This module is the only place
//! that knows about the composite form.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::GradientPair;

const FUNCTION_PREFIX: &str = "linear-gradient(";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{6}").expect("hex color pattern compiles"));

/// Render a pair as a left-to-right CSS gradient.
#[must_use]
pub fn encode(pair: &GradientPair) -> String {
    format!("{FUNCTION_PREFIX}to right, {}, {})", pair.start, pair.end)
}

/// Extract a pair from a composite string.
///
/// Endpoints the string does not provide fall back to `fallback`, one at a
/// time: a string with a single color only replaces `start`.
#[must_use]
pub fn decode(composite: Option<&str>, fallback: &GradientPair) -> GradientPair {
    let colors = composite.map(|s| color_arguments(s).unwrap_or_else(|| hex_colors(s)));
    let mut colors = colors.into_iter().flatten();
    let start = colors.next().unwrap_or_else(|| fallback.start.clone());
    let end = colors.next().unwrap_or_else(|| fallback.end.clone());
    GradientPair { start, end }
}

/// Color arguments of a `linear-gradient(...)` call, direction skipped.
///
/// `None` when `text` is not such a call.
fn color_arguments(text: &str) -> Option<Vec<String>> {
    let inner = text
        .trim()
        .strip_prefix(FUNCTION_PREFIX)?
        .strip_suffix(')')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut args = split_top_level(inner);
    if args.first().is_some_and(|first| is_direction(first)) {
        args.remove(0);
    }
    Some(args.into_iter().map(|arg| arg.trim().to_owned()).collect())
}

/// Split on commas outside nested parentheses, so `rgb(1, 2, 3)` stays whole.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut from = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(&inner[from..i]);
                from = i + 1;
            }
            _ => {}
        }
    }
    args.push(&inner[from..]);
    args
}

fn is_direction(arg: &str) -> bool {
    let arg = arg.trim();
    arg.starts_with("to ")
        || ["grad", "deg", "rad", "turn"].iter().any(|unit| {
            arg.strip_suffix(unit)
                .is_some_and(|n| n.trim().parse::<f64>().is_ok())
        })
}

fn hex_colors(text: &str) -> Vec<String> {
    HEX_COLOR
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}
