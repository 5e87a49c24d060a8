use thiserror::Error;

/// Failure kinds reported by [`ArgParser::try_parse`](crate::ArgParser::try_parse).
///
/// Every variant carries the token exactly as the user typed it, so the
/// message echoes `--toggle` rather than the canonical `-t` it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A flag that is already set was supplied again.
    #[error("duplicate entry for option {option}")]
    DuplicateOption { option: String },

    /// A single-parameter flag was the last token.
    #[error("option {option} has no parameter.")]
    MissingParameterValue { option: String },

    /// The token consumed as a parameter value starts with `-`.
    #[error("option {option} does not have corresponding parameter.")]
    ParameterLooksLikeOption { option: String, value: String },

    /// A flag-shaped token resolved to no declared flag.
    #[error("invalid option {option}")]
    UnknownOption { option: String },

    /// Scanning finished without collecting a positional token.
    #[error("no arguments entered.")]
    NoPositionalArguments,
}

/// Fieldless discriminant of [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    DuplicateOption,
    MissingParameterValue,
    ParameterLooksLikeOption,
    UnknownOption,
    NoPositionalArguments,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateOption { .. } => ErrorKind::DuplicateOption,
            Self::MissingParameterValue { .. } => ErrorKind::MissingParameterValue,
            Self::ParameterLooksLikeOption { .. } => ErrorKind::ParameterLooksLikeOption,
            Self::UnknownOption { .. } => ErrorKind::UnknownOption,
            Self::NoPositionalArguments => ErrorKind::NoPositionalArguments,
        }
    }

    /// The offending token, when the error is tied to one.
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::DuplicateOption { option }
            | Self::MissingParameterValue { option }
            | Self::ParameterLooksLikeOption { option, .. }
            | Self::UnknownOption { option } => Some(option),
            Self::NoPositionalArguments => None,
        }
    }
}

/// Mistakes in a [`ParserConfig`](crate::ParserConfig) that the parser would
/// otherwise tolerate silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("flag '{name}' is declared both with and without a parameter")]
    ConflictingArity { name: String },

    #[error("alias '{alias}' refers to undeclared flag '{canonical}'")]
    UnknownCanonical { alias: String, canonical: String },
}
