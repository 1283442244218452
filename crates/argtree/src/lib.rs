//! Declarative command trees with typed options.
//!
//! A program declares its commands (name, options, at most one positional
//! argument and a behavior), links them into a tree under an entrypoint and
//! hands the process arguments to [`Cli::run`]. Dispatch validates the tree,
//! walks down the command names at the front of argv and parses what is left
//! in two passes:
//!
//! 1. tokens are matched against the command's options (`-x`, `-x=v`,
//!    `--long`, `--long=v`, `--long v`) and its positional argument, and
//!    each value gets a provisional cast;
//! 2. required options are checked together and every declared option is
//!    resolved to its final [`Value`], keyed by both its short and long name.
//!
//! ```
//! use argtree::{Argument, Cli, Command, OptionDef, ValueKind};
//!
//! let root = Command::builder("demo")
//!     .option(OptionDef::builder(ValueKind::Int).short("n").required(true).build())
//!     .argument(Argument::new("dir", true))
//!     .behavior(|ctx| {
//!         assert_eq!(ctx.args.get_int("n"), Some(3));
//!         assert_eq!(ctx.args.get_str("dir"), Some("/tmp"));
//!         Ok(())
//!     })
//!     .build();
//!
//! Cli::new(root).run(["-n", "3", "/tmp"]).unwrap();
//! ```

pub mod cli;
pub mod colors;
pub mod command;
pub mod error;
pub mod flag;
pub mod graph;
pub mod help;
pub mod option;
pub mod parse;
pub mod value;

pub use cli::{Cli, CommandId};
pub use colors::Painter;
pub use command::{Behavior, Command, CommandBuilder, Context};
pub use error::{CastError, Error, ErrorKind, ParseError, ParseResult, TreeError};
pub use graph::{Graph, Shape};
pub use option::{Argument, OptionBuilder, OptionDef, ValueKind, help_option};
pub use parse::{Args, parse_args};
pub use value::Value;
