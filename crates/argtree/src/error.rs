//! Error types for parsing and command-tree validation.

use crate::option::ValueKind;

pub type ParseResult<T> = Result<T, ParseError>;

/// Coarse classification of an [`Error`], useful for matching without
/// caring about the attached context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnrecognizedFlag,
    DuplicateFlag,
    InvalidValue,
    UnexpectedPositional,
    MissingRequired,
    MalformedTree,
    Behavior,
    Io,
}

/// A value could not be coerced into the kind its option declares.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("received invalid value: {value}")]
    InvalidBool { value: String },

    #[error("received invalid int value: {value}")]
    InvalidInt { value: String },

    #[error("received invalid float value: {value}")]
    InvalidFloat { value: String },

    /// A value-taking option ended up without a value.
    #[error("received empty {kind} value")]
    Empty { kind: ValueKind },

    /// The declaration itself names a kind the caster does not know.
    #[error("invalid option configuration: '{option}' is configured to receive type '{kind}'")]
    Misconfigured { option: String, kind: ValueKind },
}

impl CastError {
    /// Whether this is a declaration defect rather than bad user input.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, Self::Misconfigured { .. })
    }
}

/// Failure to turn a token stream into typed values for one command.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected option `{flag}`")]
    UnrecognizedFlag { flag: String },

    #[error("option entered twice `{option}`")]
    DuplicateFlag { option: String },

    #[error("error parsing `{flag}`: {source}")]
    InvalidValue {
        flag: String,
        #[source]
        source: CastError,
    },

    #[error("received unknown argument '{token}'")]
    UnexpectedPositional { token: String },

    #[error("missing required argument '{name}'")]
    MissingArgument { name: String },

    #[error("the following options are missing or empty: '{}'", .names.join("', '"))]
    MissingOptions { names: Vec<String> },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedFlag { .. } => ErrorKind::UnrecognizedFlag,
            Self::DuplicateFlag { .. } => ErrorKind::DuplicateFlag,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::UnexpectedPositional { .. } => ErrorKind::UnexpectedPositional,
            Self::MissingArgument { .. } | Self::MissingOptions { .. } => {
                ErrorKind::MissingRequired
            }
        }
    }
}

/// The registered command hierarchy is not a rooted tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("duplicate child in command tree. parent: \"{parent}\", child: \"{child}\"")]
    DuplicateChild { parent: String, child: String },

    #[error("unknown command id {id}")]
    UnknownCommand { id: usize },

    #[error("command tree has invalid structure: cycle detected")]
    Cyclic,

    #[error("command tree has invalid structure: '{command}' is unreachable from the entrypoint")]
    Unreachable { command: String },
}

/// Anything that can abort a dispatch through [`crate::Cli`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The command's behavior returned an error.
    #[error(transparent)]
    Behavior(#[from] anyhow::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) => e.kind(),
            Self::Tree(_) => ErrorKind::MalformedTree,
            Self::Behavior(_) => ErrorKind::Behavior,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_are_listed_together() {
        let err = ParseError::MissingOptions {
            names: vec!["-n".to_string(), "-l,--label".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "the following options are missing or empty: '-n', '-l,--label'"
        );
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn invalid_value_names_the_flag() {
        let err = ParseError::InvalidValue {
            flag: "-n".to_string(),
            source: CastError::InvalidInt {
                value: "abc".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("`-n`"), "unexpected message: {msg}");
        assert!(msg.contains("invalid int value: abc"), "unexpected message: {msg}");
    }

    #[test]
    fn tree_errors_classify_as_malformed_tree() {
        let err = Error::from(TreeError::Cyclic);
        assert_eq!(err.kind(), ErrorKind::MalformedTree);
    }
}
