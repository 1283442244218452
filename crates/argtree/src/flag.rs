//! Flag token classification, splitting and lookup.

use regex::Regex;
use std::borrow::Borrow;
use std::sync::LazyLock;

use crate::option::{OptionDef, as_def};

// `-` then one ASCII letter, optional `=value`.
static SHORT_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^-[A-Za-z](=.*)?$").expect("short flag pattern is valid")
});

// `--` then a letter (rules out `---x` and `--1x`), then letters, digits or
// dashes, optional `=value`.
static LONG_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^--[A-Za-z][A-Za-z0-9-]*(=.*)?$").expect("long flag pattern is valid")
});

/// Returns true for `-v` or `-v=value`, but not `--verbose` or `-vx`.
pub fn is_short_flag(token: &str) -> bool {
    SHORT_FLAG.is_match(token)
}

/// Returns true for `--verbose` or `--out=file`, but not `-v`, `---x` or `--2x`.
pub fn is_long_flag(token: &str) -> bool {
    LONG_FLAG.is_match(token)
}

/// Split `name=value` at the first `=`. The value is empty when absent.
pub fn parse_flag(body: &str) -> (&str, &str) {
    body.split_once('=').unwrap_or((body, ""))
}

/// Split a short flag token (`-n=3`) into name and value.
pub fn parse_short(token: &str) -> (&str, &str) {
    parse_flag(token.strip_prefix('-').unwrap_or(token))
}

/// Split a long flag token (`--count=3`) into name and value.
pub fn parse_long(token: &str) -> (&str, &str) {
    parse_flag(token.strip_prefix("--").unwrap_or(token))
}

/// Find the first option whose short name is `name`.
///
/// Returns the option's position in `options` alongside it.
pub fn match_short<'o, O>(name: &str, options: &'o [O]) -> Option<(usize, &'o OptionDef)>
where
    O: Borrow<OptionDef>,
{
    find(options, |opt| opt.short == name, name)
}

/// Find the first option whose long name is `name`.
pub fn match_long<'o, O>(name: &str, options: &'o [O]) -> Option<(usize, &'o OptionDef)>
where
    O: Borrow<OptionDef>,
{
    find(options, |opt| opt.long == name, name)
}

fn find<'o, O, F>(options: &'o [O], pred: F, name: &str) -> Option<(usize, &'o OptionDef)>
where
    O: Borrow<OptionDef>,
    F: Fn(&OptionDef) -> bool,
{
    if name.is_empty() {
        return None;
    }
    options
        .iter()
        .map(as_def)
        .enumerate()
        .find(|&(_, opt)| pred(opt))
}
