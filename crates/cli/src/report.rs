use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;
use simpleopt::{ArgParser, ErrorKind, FlagValue, ParseError};

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// Snapshot of a parser's declarations and results after a parse.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub ok: bool,
    pub error: Option<ErrorReport>,
    pub flags: &'a IndexMap<String, FlagValue>,
    pub aliases: &'a IndexMap<String, String>,
    pub positional: &'a [String],
    pub no_parameter: Vec<&'a str>,
    pub single_parameter: Vec<&'a str>,
    pub usage: &'a str,
}

impl<'a> Report<'a> {
    pub fn new(parser: &'a ArgParser, error: Option<&ParseError>) -> Self {
        Self {
            ok: error.is_none(),
            error: error.map(|e| ErrorReport {
                kind: e.kind(),
                message: e.to_string(),
            }),
            flags: parser.flag_values(),
            aliases: parser.aliases(),
            positional: parser.positional_args(),
            no_parameter: parser.no_parameter_flags(),
            single_parameter: parser.single_parameter_flags(),
            usage: parser.usage(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        section(&mut out, "No-parameter flags", self.no_parameter.iter().copied());
        section(
            &mut out,
            "Single-parameter flags",
            self.single_parameter.iter().copied(),
        );
        out.push('\n');

        let flags: Vec<String> = self
            .flags
            .iter()
            .map(|(name, value)| format!("{name} = {}", display_value(value)))
            .collect();
        section(&mut out, "Flag values", flags.iter().map(String::as_str));

        let aliases: Vec<String> = self
            .aliases
            .iter()
            .map(|(alias, canonical)| format!("{alias} -> {canonical}"))
            .collect();
        section(&mut out, "Aliases", aliases.iter().map(String::as_str));

        section(
            &mut out,
            "Positional arguments",
            self.positional.iter().map(String::as_str),
        );

        out.push_str("# Usage\n");
        out.push_str(self.usage);
        out
    }
}

fn section<'s>(out: &mut String, title: &str, lines: impl Iterator<Item = &'s str>) {
    let _ = writeln!(out, "# {title}");
    let mut empty = true;
    for line in lines {
        empty = false;
        let _ = writeln!(out, "{line}");
    }
    if empty {
        out.push_str("(none)\n");
    }
}

fn display_value(value: &FlagValue) -> String {
    match value {
        FlagValue::Absent => "(absent)".to_string(),
        FlagValue::Present => "present".to_string(),
        FlagValue::Value(v) => format!("{v:?}"),
    }
}
