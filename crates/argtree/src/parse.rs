//! The two-pass argument parser.
//!
//! The first pass walks the tokens once, matching flags to options,
//! attaching deferred values and filling the positional slot. The second pass
//! enforces required options and produces final values for every declared
//! option.

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Borrow;

use crate::error::{ParseError, ParseResult};
use crate::flag::{is_long_flag, is_short_flag, match_long, match_short, parse_long, parse_short};
use crate::option::{Argument, OptionDef, ValueKind, as_def};
use crate::value::{Staged, Value, first_cast, second_cast};

/// Parsed values keyed by option short name, option long name and argument
/// name.
///
/// Every declared key is present; a key maps to `None` when it never got a
/// value. Boolean options always hold `Some(Value::Bool(_))` after a
/// successful parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Args {
    values: IndexMap<String, Option<Value>>,
}

impl Args {
    /// Get the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).and_then(Option::as_ref)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    /// Whether `key` was declared, regardless of having a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether `key` holds a value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    fn declare(&mut self, key: &str) {
        if !key.is_empty() {
            self.values.insert(key.to_string(), None);
        }
    }

    fn set(&mut self, key: &str, value: Option<Value>) {
        if !key.is_empty() {
            self.values.insert(key.to_string(), value);
        }
    }

    // A key that already holds a value keeps it when another slot sharing
    // the key resolves to nothing.
    fn fill(&mut self, key: &str, value: Option<Value>) {
        if value.is_some() || !self.is_set(key) {
            self.set(key, value);
        }
    }
}

/// Per-option state collected during the first pass.
#[derive(Debug, Clone, Default)]
struct MatchedOption {
    /// Literal flag text as entered, e.g. `-n` or `--count`. Empty if the
    /// option never appeared.
    flag: String,
    raw: String,
    staged: Staged,
}

impl MatchedOption {
    fn was_entered(&self) -> bool {
        !self.flag.is_empty()
    }

    // Booleans never wait for a value.
    fn awaits_value(&self, kind: &ValueKind) -> bool {
        !kind.is_bool() && self.raw.is_empty()
    }
}

#[derive(Clone, Copy)]
enum FlagForm {
    Short,
    Long,
}

fn match_flag<O: Borrow<OptionDef>>(
    token: &str,
    form: FlagForm,
    options: &[O],
) -> ParseResult<(usize, MatchedOption)> {
    let (name, value, found) = match form {
        FlagForm::Short => {
            let (name, value) = parse_short(token);
            (name, value, match_short(name, options))
        }
        FlagForm::Long => {
            let (name, value) = parse_long(token);
            (name, value, match_long(name, options))
        }
    };
    let flag = match form {
        FlagForm::Short => format!("-{name}"),
        FlagForm::Long => format!("--{name}"),
    };

    let Some((idx, option)) = found else {
        return Err(ParseError::UnrecognizedFlag { flag });
    };
    let staged = first_cast(option, value).map_err(|source| ParseError::InvalidValue {
        flag: flag.clone(),
        source,
    })?;

    Ok((
        idx,
        MatchedOption {
            flag,
            raw: value.to_string(),
            staged,
        },
    ))
}

fn first_pass<O, S>(
    options: &[O],
    argument: &Argument,
    tokens: &[S],
) -> ParseResult<(Args, Vec<MatchedOption>)>
where
    O: Borrow<OptionDef>,
    S: AsRef<str>,
{
    let mut args = Args::default();
    for option in options.iter().map(as_def) {
        args.declare(&option.short);
        args.declare(&option.long);
    }
    args.declare(&argument.name);

    let mut matched = vec![MatchedOption::default(); options.len()];
    let mut pending: Option<usize> = None;

    for token in tokens.iter().map(AsRef::as_ref) {
        let form = if is_short_flag(token) {
            Some(FlagForm::Short)
        } else if is_long_flag(token) {
            Some(FlagForm::Long)
        } else {
            None
        };

        if let Some(form) = form {
            let (idx, entry) = match_flag(token, form, options)?;
            if matched[idx].was_entered() {
                return Err(ParseError::DuplicateFlag {
                    option: as_def(&options[idx]).display_name(),
                });
            }
            matched[idx] = entry;
            pending = Some(idx);
            continue;
        }

        // A flag still waiting for its value takes precedence over the
        // positional slot.
        let waiting =
            pending.filter(|&idx| matched[idx].awaits_value(&as_def(&options[idx]).kind));
        if let Some(idx) = waiting {
            let staged = first_cast(as_def(&options[idx]), token).map_err(|source| {
                ParseError::InvalidValue {
                    flag: matched[idx].flag.clone(),
                    source,
                }
            })?;
            matched[idx].staged = staged;
            matched[idx].raw = token.to_string();
            pending = None;
            continue;
        }

        if !argument.is_declared() || args.is_set(&argument.name) {
            return Err(ParseError::UnexpectedPositional {
                token: token.to_string(),
            });
        }
        args.set(&argument.name, Some(Value::Str(token.to_string())));
        pending = None;
    }

    if argument.is_declared() && argument.required && !args.is_set(&argument.name) {
        return Err(ParseError::MissingArgument {
            name: argument.name.clone(),
        });
    }

    Ok((args, matched))
}

fn complete<O: Borrow<OptionDef>>(
    options: &[O],
    matched: Vec<MatchedOption>,
    args: &mut Args,
) -> ParseResult<()> {
    let missing: Vec<String> = options
        .iter()
        .map(as_def)
        .zip(&matched)
        .filter(|(option, entry)| option.required && entry.awaits_value(&option.kind))
        .map(|(option, _)| option.display_name())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingOptions { names: missing });
    }

    for (option, entry) in options.iter().map(as_def).zip(matched) {
        let entered = entry.was_entered();
        let value = match second_cast(option, entry.staged) {
            Ok(value) => Some(value),
            Err(source) if entered => {
                return Err(ParseError::InvalidValue {
                    flag: entry.flag,
                    source,
                });
            }
            // Options that never appeared fall back silently.
            Err(_) => None,
        };
        args.fill(&option.long, value.clone());
        args.fill(&option.short, value);
    }

    Ok(())
}

/// Parse `tokens` against a command's options and positional argument.
///
/// Options are identified by their position in `options`, so two
/// declarations with identical fields remain distinct slots.
pub fn parse_args<O, S>(options: &[O], argument: &Argument, tokens: &[S]) -> ParseResult<Args>
where
    O: Borrow<OptionDef>,
    S: AsRef<str>,
{
    let (mut args, matched) = first_pass(options, argument, tokens)?;
    complete(options, matched, &mut args)?;
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CastError, ErrorKind};

    fn int_n(required: bool) -> OptionDef {
        OptionDef::builder(ValueKind::Int)
            .short("n")
            .required(required)
            .build()
    }

    fn verbose() -> OptionDef {
        OptionDef::builder(ValueKind::Bool)
            .short("v")
            .long("verbose")
            .build()
    }

    fn label() -> OptionDef {
        OptionDef::builder(ValueKind::String)
            .short("l")
            .long("label")
            .build()
    }

    fn dir(required: bool) -> Argument {
        Argument::new("dir", required)
    }

    #[test]
    fn int_option_with_positional() {
        let args = parse_args(&[int_n(true)], &dir(true), &["-n", "3", "/tmp"]).unwrap();
        assert_eq!(args.get_int("n"), Some(3));
        assert_eq!(args.get_str("dir"), Some("/tmp"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn invalid_inline_int_mentions_flag() {
        let err = parse_args(&[int_n(true)], &dir(true), &["-n=abc", "/tmp"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        let ParseError::InvalidValue { flag, source } = &err else {
            panic!("expected InvalidValue, got: {err:?}");
        };
        assert_eq!(flag, "-n");
        assert!(matches!(source, CastError::InvalidInt { .. }));
        assert!(err.to_string().contains("-n"));
    }

    #[test]
    fn invalid_deferred_value_mentions_pending_flag() {
        let options = [OptionDef::builder(ValueKind::Float).long("ratio").build()];
        let err = parse_args(&options, &Argument::none(), &["--ratio", "half"]).unwrap_err();
        let ParseError::InvalidValue { flag, .. } = err else {
            panic!("expected InvalidValue, got: {err:?}");
        };
        assert_eq!(flag, "--ratio");
    }

    #[test]
    fn repeated_bool_is_duplicate() {
        let options = [OptionDef::builder(ValueKind::Bool).long("verbose").build()];
        let err = parse_args(&options, &Argument::none(), &["--verbose", "--verbose"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateFlag {
                option: "--verbose".to_string()
            }
        );
    }

    #[test]
    fn short_and_long_forms_share_a_slot() {
        let err = parse_args(&[verbose()], &Argument::none(), &["-v", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateFlag);

        let err = parse_args(&[label()], &Argument::none(), &["--label=a", "-l", "b"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateFlag {
                option: "-l,--label".to_string()
            }
        );
    }

    #[test]
    fn identical_declarations_are_separate_slots() {
        let a = OptionDef::builder(ValueKind::Int).short("a").build();
        let options = [a.clone(), a];
        // The second declaration is unreachable by name, but must not be
        // confused with the first.
        let args = parse_args(&options, &Argument::none(), &["-a", "1"]).unwrap();
        assert_eq!(args.get_int("a"), Some(1));
    }

    #[test]
    fn option_sharing_the_argument_key_keeps_the_argument() {
        let options = [OptionDef::builder(ValueKind::String).long("dir").build()];
        let argument = Argument::new("dir", true);

        let args = parse_args(&options, &argument, &["/tmp"]).unwrap();
        assert_eq!(args.get_str("dir"), Some("/tmp"));

        // An entered option still writes its own value over the argument.
        let args = parse_args(&options, &argument, &["/tmp", "--dir=/var"]).unwrap();
        assert_eq!(args.get_str("dir"), Some("/var"));
    }

    #[test]
    fn attached_and_separate_values_agree() {
        let options = [
            OptionDef::builder(ValueKind::String).long("name").build(),
            OptionDef::builder(ValueKind::Int).long("count").build(),
            OptionDef::builder(ValueKind::Float).long("ratio").build(),
        ];
        let attached = parse_args(
            &options,
            &Argument::none(),
            &["--name=x", "--count=-4", "--ratio=0.25"],
        )
        .unwrap();
        let separate = parse_args(
            &options,
            &Argument::none(),
            &["--name", "x", "--count", "-4", "--ratio", "0.25"],
        )
        .unwrap();
        assert_eq!(attached, separate);
        assert_eq!(separate.get_str("name"), Some("x"));
        assert_eq!(separate.get_int("count"), Some(-4));
        assert_eq!(separate.get_float("ratio"), Some(0.25));
    }

    #[test]
    fn bool_keys_are_never_empty() {
        let absent = parse_args(&[verbose()], &Argument::none(), &[] as &[&str]).unwrap();
        assert_eq!(absent.get_bool("v"), Some(false));
        assert_eq!(absent.get_bool("verbose"), Some(false));

        let present = parse_args(&[verbose()], &Argument::none(), &["-v"]).unwrap();
        assert_eq!(present.get_bool("v"), Some(true));
        assert_eq!(present.get_bool("verbose"), Some(true));

        let err = parse_args(&[verbose()], &Argument::none(), &["--verbose=yes"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn bool_flag_does_not_swallow_positional() {
        let args = parse_args(&[verbose()], &dir(true), &["-v", "/tmp"]).unwrap();
        assert_eq!(args.get_bool("verbose"), Some(true));
        assert_eq!(args.get_str("dir"), Some("/tmp"));
    }

    #[test]
    fn pending_flag_wins_over_positional() {
        let err = parse_args(&[label()], &dir(true), &["--label", "/tmp"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingArgument {
                name: "dir".to_string()
            }
        );

        let args = parse_args(&[label()], &dir(true), &["--label", "x", "/tmp"]).unwrap();
        assert_eq!(args.get_str("label"), Some("x"));
        assert_eq!(args.get_str("dir"), Some("/tmp"));
    }

    #[test]
    fn inline_value_clears_the_wait() {
        let args = parse_args(&[label()], &dir(true), &["--label=x", "/tmp"]).unwrap();
        assert_eq!(args.get_str("l"), Some("x"));
        assert_eq!(args.get_str("dir"), Some("/tmp"));
    }

    #[test]
    fn negative_numbers_are_values_not_flags() {
        let args = parse_args(&[int_n(true)], &Argument::none(), &["-n", "-5"]).unwrap();
        assert_eq!(args.get_int("n"), Some(-5));
    }

    #[test]
    fn zero_tokens() {
        let optional = [label(), verbose(), int_n(false)];
        let args = parse_args(&optional, &dir(false), &[] as &[&str]).unwrap();
        assert!(args.contains_key("dir"));
        assert_eq!(args.get("dir"), None);
        assert_eq!(args.get("label"), None);
        assert_eq!(args.get("n"), None);

        let err = parse_args(&[int_n(true)], &Argument::none(), &[] as &[&str]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);

        let err = parse_args(&optional, &dir(true), &[] as &[&str]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn missing_options_are_aggregated() {
        let options = [
            int_n(true),
            OptionDef::builder(ValueKind::String)
                .short("l")
                .long("label")
                .required(true)
                .build(),
            verbose(),
        ];
        let err = parse_args(&options, &Argument::none(), &[] as &[&str]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingOptions {
                names: vec!["-n".to_string(), "-l,--label".to_string()]
            }
        );
    }

    #[test]
    fn required_flag_without_value_is_missing() {
        let err = parse_args(&[int_n(true)], &Argument::none(), &["-n"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn optional_flag_without_value_is_invalid() {
        let err = parse_args(&[label()], &Argument::none(), &["--label"]).unwrap_err();
        let ParseError::InvalidValue { flag, source } = err else {
            panic!("expected InvalidValue");
        };
        assert_eq!(flag, "--label");
        assert!(matches!(source, CastError::Empty { .. }));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse_args(&[verbose()], &Argument::none(), &["-q"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedFlag {
                flag: "-q".to_string()
            }
        );

        let err = parse_args(&[verbose()], &Argument::none(), &["--quiet=1"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedFlag {
                flag: "--quiet".to_string()
            }
        );
    }

    #[test]
    fn unexpected_positionals() {
        let err = parse_args(&[verbose()], &Argument::none(), &["stray"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedPositional {
                token: "stray".to_string()
            }
        );

        let err = parse_args(&[verbose()], &dir(false), &["a", "b"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedPositional {
                token: "b".to_string()
            }
        );
    }

    #[test]
    fn misconfigured_kind_only_fails_when_used() {
        let options = [OptionDef::builder("date").long("when").build()];
        let args = parse_args(&options, &Argument::none(), &[] as &[&str]).unwrap();
        assert_eq!(args.get("when"), None);

        let err = parse_args(&options, &Argument::none(), &["--when"]).unwrap_err();
        let ParseError::InvalidValue { source, .. } = err else {
            panic!("expected InvalidValue");
        };
        assert!(source.is_misconfiguration());
    }

    #[test]
    fn keys_follow_declaration_order() {
        let args = parse_args(&[label(), int_n(false)], &dir(false), &["x"]).unwrap();
        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["l", "label", "n", "dir"]);
    }

    #[test]
    fn args_serialize_as_an_object() {
        let args = parse_args(&[int_n(true), verbose()], &dir(false), &["-n", "3"]).unwrap();
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json["n"], 3);
        assert_eq!(json["verbose"], false);
        assert!(json["dir"].is_null());
    }
}
