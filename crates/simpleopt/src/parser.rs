use std::io::{self, Write};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::ParseError;

/// Prefix of a long-form flag such as `--toggle`.
pub const LONG_PREFIX: &str = "--";
/// Prefix of a short-form flag such as `-t`.
pub const SHORT_PREFIX: &str = "-";

/// How many tokens a declared flag consumes after itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Boolean switch.
    NoParameter,
    /// Consumes exactly one following token as its value.
    SingleParameter,
}

/// Parse state of a declared flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagValue {
    /// Not supplied.
    #[default]
    Absent,
    /// A no-parameter flag that was supplied.
    Present,
    /// The parameter text of a single-parameter flag.
    Value(String),
}

impl FlagValue {
    /// Whether the flag was supplied at all.
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v.as_str()),
            Self::Absent | Self::Present => None,
        }
    }
}

// `null` / `true` / `"text"` keeps the JSON report readable.
impl Serialize for FlagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present => serializer.serialize_bool(true),
            Self::Value(v) => serializer.serialize_str(v),
        }
    }
}

/// Classification of a single input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A flag-shaped token. `name` is the canonical name it resolves to
    /// (or the raw token when no alias matches), `raw` is what was typed.
    Flag { name: &'a str, raw: &'a str },
    Positional(&'a str),
}

/// Successful result of [`ArgParser::try_parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The token list was empty; carries the usage text to show instead.
    Usage(String),
    /// Flags and positional args were extracted.
    Parsed,
}

/// Flag/positional argument parser.
///
/// Configure it with the `declare_*` methods and [`append_usage_line`],
/// then call [`parse`] (or [`try_parse`] to handle output yourself).
/// Results stay readable through the accessors after a successful or
/// failed parse.
///
/// [`append_usage_line`]: ArgParser::append_usage_line
/// [`parse`]: ArgParser::parse
/// [`try_parse`]: ArgParser::try_parse
#[derive(Debug, Clone, Default)]
pub struct ArgParser {
    flags: IndexMap<String, Arity>,
    aliases: IndexMap<String, String>,
    values: IndexMap<String, FlagValue>,
    positionals: Vec<String>,
    usage: String,
}

impl ArgParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` (e.g. `-t`) as a boolean switch.
    pub fn declare_no_parameter_flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name.into(), Arity::NoParameter)
    }

    /// Declare `name` (e.g. `-f`) as taking the next token as its value.
    pub fn declare_single_parameter_flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(name.into(), Arity::SingleParameter)
    }

    /// Make `alias` (e.g. `--foobar`) resolve to `canonical` (e.g. `-f`).
    ///
    /// `canonical` is not checked here. An alias pointing at an undeclared
    /// name fails as an unknown option when it is used.
    pub fn declare_alias(
        &mut self,
        canonical: impl Into<String>,
        alias: impl Into<String>,
    ) -> &mut Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    pub fn append_usage_line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.usage.push_str(line.as_ref());
        self.usage.push('\n');
        self
    }

    fn declare(&mut self, name: String, arity: Arity) -> &mut Self {
        if let Some(prev) = self.flags.insert(name.clone(), arity) {
            if prev != arity {
                tracing::debug!(flag = %name, ?prev, ?arity, "flag redeclared with new arity");
            }
        }
        self.values.insert(name, FlagValue::Absent);
        self
    }

    /// Classify `token` and resolve long-form aliases.
    ///
    /// Short-form tokens are never alias-resolved. A long-form token with
    /// no alias entry resolves to itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> Token<'a> {
        if token.starts_with(LONG_PREFIX) {
            let name = self.aliases.get(token).map_or(token, String::as_str);
            Token::Flag { name, raw: token }
        } else if token.starts_with(SHORT_PREFIX) {
            Token::Flag {
                name: token,
                raw: token,
            }
        } else {
            Token::Positional(token)
        }
    }

    /// Parse `tokens` without printing anything.
    ///
    /// Flag values and positional args are rebuilt from scratch on every
    /// call. The first violation aborts the scan.
    pub fn try_parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
        self.reset();

        if tokens.is_empty() {
            tracing::debug!("no tokens given, showing usage");
            return Ok(ParseOutcome::Usage(self.usage.clone()));
        }

        let mut iter = tokens.iter().map(AsRef::as_ref);
        while let Some(arg) = iter.next() {
            let name = match self.resolve(arg) {
                Token::Flag { name, .. } => name.to_owned(),
                Token::Positional(_) => {
                    tracing::trace!(token = arg, "positional");
                    self.positionals.push(arg.to_owned());
                    continue;
                }
            };
            tracing::trace!(token = arg, flag = %name, "flag");

            match self.flags.get(&name).copied() {
                Some(Arity::NoParameter) => self.set(&name, arg, FlagValue::Present)?,
                Some(Arity::SingleParameter) => {
                    let Some(value) = iter.next() else {
                        return Err(ParseError::MissingParameterValue {
                            option: arg.to_owned(),
                        });
                    };
                    if value.starts_with(SHORT_PREFIX) {
                        return Err(ParseError::ParameterLooksLikeOption {
                            option: arg.to_owned(),
                            value: value.to_owned(),
                        });
                    }
                    self.set(&name, arg, FlagValue::Value(value.to_owned()))?;
                }
                None => {
                    return Err(ParseError::UnknownOption {
                        option: arg.to_owned(),
                    });
                }
            }
        }

        if self.positionals.is_empty() {
            return Err(ParseError::NoPositionalArguments);
        }

        tracing::debug!(
            positionals = self.positionals.len(),
            set = self.values.values().filter(|v| v.is_set()).count(),
            "parsed arguments"
        );
        Ok(ParseOutcome::Parsed)
    }

    /// Parse `tokens`, writing user-facing output to `out`.
    ///
    /// Empty input writes the usage text verbatim and succeeds. A failure
    /// writes a single `Error: <message>` line. Returns whether parsing
    /// succeeded.
    pub fn parse_to<S: AsRef<str>, W: Write>(
        &mut self,
        tokens: &[S],
        out: &mut W,
    ) -> io::Result<bool> {
        match self.try_parse(tokens) {
            Ok(ParseOutcome::Usage(text)) => {
                out.write_all(text.as_bytes())?;
                Ok(true)
            }
            Ok(ParseOutcome::Parsed) => Ok(true),
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                Ok(false)
            }
        }
    }

    /// [`parse_to`](Self::parse_to) against standard output.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.parse_to(tokens, &mut out) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::warn!(%err, "failed to write parser output");
                false
            }
        }
    }

    fn reset(&mut self) {
        self.values = self
            .flags
            .keys()
            .map(|name| (name.clone(), FlagValue::Absent))
            .collect();
        self.positionals.clear();
    }

    fn set(&mut self, name: &str, typed: &str, value: FlagValue) -> Result<(), ParseError> {
        let slot = self.values.entry(name.to_owned()).or_default();
        if slot.is_set() {
            return Err(ParseError::DuplicateOption {
                option: typed.to_owned(),
            });
        }
        *slot = value;
        Ok(())
    }
}

impl ArgParser {
    /// Canonical flag name to parse state, in declaration order.
    pub fn flag_values(&self) -> &IndexMap<String, FlagValue> {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    /// Parameter text of a single-parameter flag, if it was supplied.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(FlagValue::as_str)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(FlagValue::is_set)
    }

    /// Alias spelling to canonical name.
    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    pub fn positional_args(&self) -> &[String] {
        &self.positionals
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn arity(&self, name: &str) -> Option<Arity> {
        self.flags.get(name).copied()
    }

    pub fn no_parameter_flags(&self) -> Vec<&str> {
        self.flags_with(Arity::NoParameter)
    }

    pub fn single_parameter_flags(&self) -> Vec<&str> {
        self.flags_with(Arity::SingleParameter)
    }

    fn flags_with(&self, arity: Arity) -> Vec<&str> {
        self.flags
            .iter()
            .filter(|(_, a)| **a == arity)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> ArgParser {
        let mut p = ArgParser::new();
        p.append_usage_line("Usage: application [options] ... [files] ...")
            .declare_no_parameter_flag("-t")
            .declare_alias("-t", "--toggle")
            .declare_single_parameter_flag("-f")
            .declare_alias("-f", "--foobar");
        p
    }

    fn err_kind(p: &mut ArgParser, tokens: &[&str]) -> ErrorKind {
        p.try_parse(tokens).unwrap_err().kind()
    }

    #[test]
    fn parses_flags_values_and_positionals() {
        let mut p = sample();
        let outcome = p
            .try_parse(&["a.txt", "-t", "--foobar", "42", "b.txt"])
            .unwrap();
        assert_eq!(outcome, ParseOutcome::Parsed);
        assert_eq!(p.get("-t"), Some(&FlagValue::Present));
        assert_eq!(p.value("-f"), Some("42"));
        assert_eq!(p.positional_args(), ["a.txt", "b.txt"]);
    }

    #[test]
    fn long_alias_sets_canonical_entry() {
        let mut p = sample();
        p.try_parse(&["--toggle", "x"]).unwrap();
        assert!(p.is_present("-t"));
        assert!(p.get("--toggle").is_none());
    }

    #[test]
    fn duplicate_switch_fails_even_through_alias() {
        let mut p = sample();
        let err = p.try_parse(&["-t", "--toggle", "x"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateOption {
                option: "--toggle".to_string()
            }
        );
    }

    #[test]
    fn duplicate_value_flag_fails() {
        let mut p = sample();
        assert_eq!(
            err_kind(&mut p, &["-f", "1", "-f", "2", "x"]),
            ErrorKind::DuplicateOption
        );
    }

    #[test]
    fn value_flag_as_last_token_is_missing_value() {
        let mut p = sample();
        let err = p.try_parse(&["x", "--foobar"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingParameterValue {
                option: "--foobar".to_string()
            }
        );
    }

    #[test]
    fn dash_value_is_rejected_even_if_undeclared() {
        let mut p = sample();
        assert_eq!(
            err_kind(&mut p, &["-f", "-t", "x"]),
            ErrorKind::ParameterLooksLikeOption
        );
        assert_eq!(
            err_kind(&mut p, &["-f", "-zzz", "x"]),
            ErrorKind::ParameterLooksLikeOption
        );
    }

    #[test]
    fn looks_like_option_is_checked_before_duplicate() {
        let mut p = sample();
        assert_eq!(
            err_kind(&mut p, &["-f", "1", "-f", "-2", "x"]),
            ErrorKind::ParameterLooksLikeOption
        );
    }

    #[test]
    fn empty_value_is_stored_verbatim() {
        let mut p = sample();
        p.try_parse(&["-f", "", "x"]).unwrap();
        assert_eq!(p.get("-f"), Some(&FlagValue::Value(String::new())));
        assert!(p.is_present("-f"));
    }

    #[test]
    fn unknown_long_flag_echoes_typed_token() {
        let mut p = sample();
        let err = p.try_parse(&["--bogus", "x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOption);
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn short_flags_are_not_alias_resolved() {
        let mut p = sample();
        p.declare_alias("-t", "-x");
        assert_eq!(err_kind(&mut p, &["-x", "y"]), ErrorKind::UnknownOption);
    }

    #[test]
    fn unresolved_long_token_matching_a_declared_name_is_accepted() {
        let mut p = ArgParser::new();
        p.declare_no_parameter_flag("--verbose");
        p.try_parse(&["--verbose", "x"]).unwrap();
        assert!(p.is_present("--verbose"));
    }

    #[test]
    fn alias_to_undeclared_flag_is_unknown() {
        let mut p = ArgParser::new();
        p.declare_alias("-q", "--quiet");
        let err = p.try_parse(&["--quiet", "x"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOption {
                option: "--quiet".to_string()
            }
        );
    }

    #[test]
    fn bare_dashes_are_unknown_flags() {
        let mut p = sample();
        assert_eq!(err_kind(&mut p, &["-", "x"]), ErrorKind::UnknownOption);
        assert_eq!(err_kind(&mut p, &["--", "x"]), ErrorKind::UnknownOption);
    }

    #[test]
    fn only_flags_is_no_positional() {
        let mut p = sample();
        assert_eq!(
            err_kind(&mut p, &["-t", "-f", "3"]),
            ErrorKind::NoPositionalArguments
        );
    }

    #[test]
    fn empty_input_returns_usage_and_resets_state() {
        let mut p = sample();
        p.try_parse(&["-t", "x"]).unwrap();
        let outcome = p.try_parse::<&str>(&[]).unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Usage("Usage: application [options] ... [files] ...\n".to_string())
        );
        assert!(p.positional_args().is_empty());
        assert!(p.flag_values().values().all(|v| *v == FlagValue::Absent));
    }

    #[test]
    fn repeated_parses_do_not_leak_state() {
        let mut p = sample();
        p.try_parse(&["-t", "-f", "1", "a"]).unwrap();
        p.try_parse(&["-t", "-f", "2", "b"]).unwrap();
        assert_eq!(p.value("-f"), Some("2"));
        assert_eq!(p.positional_args(), ["b"]);
    }

    #[test]
    fn redeclaring_changes_arity_instead_of_duplicating() {
        let mut p = ArgParser::new();
        p.declare_no_parameter_flag("-t")
            .declare_single_parameter_flag("-t");
        assert_eq!(p.arity("-t"), Some(Arity::SingleParameter));
        assert!(p.no_parameter_flags().is_empty());
        assert_eq!(p.single_parameter_flags(), ["-t"]);
    }

    #[test]
    fn parse_to_writes_usage_verbatim() {
        let mut p = sample();
        p.append_usage_line("\t-t , --toggle");
        let mut out = Vec::new();
        assert!(p.parse_to::<&str, _>(&[], &mut out).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Usage: application [options] ... [files] ...\n\t-t , --toggle\n"
        );
    }

    #[test]
    fn parse_to_writes_single_error_line() {
        let mut p = sample();
        let mut out = Vec::new();
        assert!(!p.parse_to(&["--bogus", "x"], &mut out).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: invalid option --bogus\n"
        );
    }

    #[test]
    fn parse_to_is_silent_on_success() {
        let mut p = sample();
        let mut out = Vec::new();
        assert!(p.parse_to(&["-t", "x"], &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn values_survive_a_failed_parse_up_to_the_error() {
        let mut p = sample();
        let _ = p.try_parse(&["a", "-t", "--bogus"]);
        assert!(p.is_present("-t"));
        assert_eq!(p.positional_args(), ["a"]);
    }

    #[test]
    fn resolve_classifies_tokens() {
        let p = sample();
        assert_eq!(
            p.resolve("--foobar"),
            Token::Flag {
                name: "-f",
                raw: "--foobar"
            }
        );
        assert_eq!(
            p.resolve("-z"),
            Token::Flag {
                name: "-z",
                raw: "-z"
            }
        );
        assert_eq!(p.resolve("file"), Token::Positional("file"));
    }

    #[test]
    fn flag_value_serializes_compactly() {
        let json = serde_json::to_string(&vec![
            FlagValue::Absent,
            FlagValue::Present,
            FlagValue::Value("7".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,true,"7"]"#);
    }
}
