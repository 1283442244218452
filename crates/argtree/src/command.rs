//! Command declarations and the context handed to their behaviors.

use std::fmt;

use crate::option::{Argument, OptionDef, help_option};
use crate::parse::Args;

/// What a command does once its arguments are parsed.
pub type Behavior = Box<dyn Fn(&Context<'_>) -> anyhow::Result<()>>;

/// A named node of the command tree.
pub struct Command {
    name: String,
    long_desc: String,
    short_desc: String,
    options: Vec<OptionDef>,
    argument: Argument,
    behavior: Option<Behavior>,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description shown in this command's own help.
    pub fn long_desc(&self) -> &str {
        &self.long_desc
    }

    /// Description shown in the parent's command table.
    pub fn short_desc(&self) -> &str {
        &self.short_desc
    }

    /// Options as declared, without built-ins.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub(crate) fn behavior(&self) -> Option<&Behavior> {
        self.behavior.as_ref()
    }

    /// Declared options followed by the built-in `--help`, unless the command
    /// already declares a `help` long name itself.
    pub fn effective_options(&self) -> Vec<&OptionDef> {
        let mut options: Vec<&OptionDef> = self.options.iter().collect();
        let help = help_option();
        if !self.options.iter().any(|opt| opt.long == help.long) {
            options.push(help);
        }
        options
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("argument", &self.argument)
            .field("behavior", &self.behavior.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for `Command`.
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            command: Command {
                name: name.into(),
                long_desc: String::new(),
                short_desc: String::new(),
                options: Vec::new(),
                argument: Argument::none(),
                behavior: None,
            },
        }
    }

    pub fn long_desc(mut self, text: impl Into<String>) -> Self {
        self.command.long_desc = text.into();
        self
    }

    pub fn short_desc(mut self, text: impl Into<String>) -> Self {
        self.command.short_desc = text.into();
        self
    }

    pub fn option(mut self, option: OptionDef) -> Self {
        self.command.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = OptionDef>) -> Self {
        self.command.options.extend(options);
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.command.argument = argument;
        self
    }

    pub fn behavior<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&Context<'_>) -> anyhow::Result<()> + 'static,
    {
        self.command.behavior = Some(Box::new(behavior));
        self
    }

    pub fn build(self) -> Command {
        self.command
    }
}

/// Everything a behavior gets to see about its invocation.
#[derive(Debug)]
pub struct Context<'a> {
    /// Ancestor names and this command's name, space separated
    /// (e.g. `root run install`).
    pub referrer: String,
    pub command: &'a Command,
    pub children: Vec<&'a Command>,
    /// Declared options plus built-ins.
    pub options: Vec<&'a OptionDef>,
    /// Tokens left after command-name resolution, unparsed.
    pub raw_args: &'a [String],
    /// Typed values; empty while rendering help.
    pub args: Args,
}

impl Context<'_> {
    /// Render this command's help text.
    pub fn help(&self) -> String {
        crate::help::render(self)
    }
}
