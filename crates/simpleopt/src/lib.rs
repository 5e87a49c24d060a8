//! Minimal flag/positional argument parser.
//!
//! Tokens are split into declared flags and positional arguments:
//! - `-x` is a short-form flag, used as-is
//! - `--long` is a long-form flag, resolved through declared aliases
//! - anything else is positional, kept in input order
//!
//! Flags either take no value or consume exactly the next token. Combined
//! short flags (`-abc`), `--opt=value` and repeated options are not supported.
//!
//! ```
//! use simpleopt::ArgParser;
//!
//! let mut parser = ArgParser::new();
//! parser
//!     .declare_no_parameter_flag("-t")
//!     .declare_alias("-t", "--toggle")
//!     .declare_single_parameter_flag("-f");
//!
//! parser.try_parse(&["--toggle", "-f", "3", "input.txt"]).unwrap();
//! assert!(parser.is_present("-t"));
//! assert_eq!(parser.value("-f"), Some("3"));
//! assert_eq!(parser.positional_args(), ["input.txt"]);
//! ```

pub mod config;
pub mod error;
pub mod parser;

pub use config::ParserConfig;
pub use error::{ConfigError, ErrorKind, ParseError};
pub use parser::{ArgParser, Arity, FlagValue, ParseOutcome, Token};
