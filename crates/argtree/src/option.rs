//! Option and positional-argument declarations.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

/// The type an option's value is coerced into.
///
/// Declarations loaded from data may name a kind the parser does not know;
/// those are kept as [`ValueKind::Unsupported`] and reported when the option
/// is cast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueKind {
    Bool,
    String,
    Int,
    Float,
    Unsupported(String),
}

impl ValueKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Unsupported(tag) => tag,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ValueKind {
    fn from(tag: &str) -> Self {
        match tag {
            "bool" => Self::Bool,
            "string" => Self::String,
            "int" => Self::Int,
            "float" => Self::Float,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for ValueKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Unsupported(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

/// A named option of a command, matched by `-short` or `--long`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    pub kind: ValueKind,
}

impl OptionDef {
    pub fn builder(kind: impl Into<ValueKind>) -> OptionBuilder {
        OptionBuilder::new(kind)
    }

    /// Name as shown to users: `-s,--long`, `-s`, `--long`, or empty.
    pub fn display_name(&self) -> String {
        match (self.short.is_empty(), self.long.is_empty()) {
            (false, false) => format!("-{},--{}", self.short, self.long),
            (false, true) => format!("-{}", self.short),
            (true, false) => format!("--{}", self.long),
            (true, true) => String::new(),
        }
    }
}

pub(crate) fn as_def<O: Borrow<OptionDef>>(option: &O) -> &OptionDef {
    option.borrow()
}

/// Builder for `OptionDef`.
pub struct OptionBuilder {
    def: OptionDef,
}

impl OptionBuilder {
    pub fn new(kind: impl Into<ValueKind>) -> Self {
        Self {
            def: OptionDef {
                short: String::new(),
                long: String::new(),
                description: String::new(),
                required: false,
                kind: kind.into(),
            },
        }
    }

    /// Short name without the leading dash (e.g. `v`).
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.def.short = short.into().trim_start_matches('-').to_string();
        self
    }

    /// Long name without the leading dashes (e.g. `verbose`).
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.def.long = long.into().trim_start_matches('-').to_string();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.def.required = required;
        self
    }

    pub fn build(self) -> OptionDef {
        self.def
    }
}

static HELP_OPTION: LazyLock<OptionDef> = LazyLock::new(|| {
    OptionDef::builder(ValueKind::Bool)
        .long("help")
        .description("Print a help string")
        .build()
});

/// The built-in `--help` switch every command accepts.
pub fn help_option() -> &'static OptionDef {
    &HELP_OPTION
}

/// The single positional argument a command may accept.
///
/// An empty `name` means the command takes no positional argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Argument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Argument {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            description: String::new(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_declared(&self) -> bool {
        !self.name.is_empty()
    }
}
