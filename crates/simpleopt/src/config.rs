use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parser::ArgParser;

/// Declarative form of an [`ArgParser`] configuration.
///
/// ```json
/// {
///   "usage": ["Usage: application [options] ... [files] ..."],
///   "noParameter": ["-t"],
///   "singleParameter": ["-f"],
///   "aliases": { "--toggle": "-t", "--foobar": "-f" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_parameter: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single_parameter: Vec<String>,

    /// Alias spelling to canonical name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, String>,
}

impl ParserConfig {
    /// The sample configuration: a `-t/--toggle` switch and a
    /// `-f/--foobar` flag taking one value.
    pub fn demo() -> Self {
        Self {
            usage: vec![
                "Usage: application [options] ... [files] ...".to_string(),
                "\t-t , --toggle             No parameter option example".to_string(),
                "\t-f , --foobar [number]    Single parameter option example".to_string(),
            ],
            no_parameter: vec!["-t".to_string()],
            single_parameter: vec!["-f".to_string()],
            aliases: IndexMap::from([
                ("--toggle".to_string(), "-t".to_string()),
                ("--foobar".to_string(), "-f".to_string()),
            ]),
        }
    }

    /// Reject declarations the parser would accept but never match sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let switches: HashSet<&str> = self.no_parameter.iter().map(String::as_str).collect();
        for name in &self.single_parameter {
            if switches.contains(name.as_str()) {
                return Err(ConfigError::ConflictingArity { name: name.clone() });
            }
        }

        for (alias, canonical) in &self.aliases {
            let declared = switches.contains(canonical.as_str())
                || self.single_parameter.iter().any(|n| n == canonical);
            if !declared {
                return Err(ConfigError::UnknownCanonical {
                    alias: alias.clone(),
                    canonical: canonical.clone(),
                });
            }
        }
        Ok(())
    }
}

impl ArgParser {
    /// Build a parser from `config`.
    ///
    /// Single-parameter declarations are applied after no-parameter ones,
    /// so a name listed in both ends up taking a value.
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut parser = Self::new();
        for line in &config.usage {
            parser.append_usage_line(line);
        }
        for name in &config.no_parameter {
            parser.declare_no_parameter_flag(name.as_str());
        }
        for name in &config.single_parameter {
            parser.declare_single_parameter_flag(name.as_str());
        }
        for (alias, canonical) in &config.aliases {
            parser.declare_alias(canonical.as_str(), alias.as_str());
        }
        parser
    }

    pub fn to_config(&self) -> ParserConfig {
        ParserConfig {
            usage: self
                .usage()
                .split_terminator('\n')
                .map(str::to_string)
                .collect(),
            no_parameter: self
                .no_parameter_flags()
                .into_iter()
                .map(str::to_string)
                .collect(),
            single_parameter: self
                .single_parameter_flags()
                .into_iter()
                .map(str::to_string)
                .collect(),
            aliases: self.aliases().clone(),
        }
    }
}
