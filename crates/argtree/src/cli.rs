//! The command tree and dispatch over it.

use indexmap::IndexMap;
use std::io::{self, Write};

use crate::command::{Command, Context};
use crate::error::{Error, TreeError};
use crate::graph::Graph;
use crate::parse::{Args, parse_args};

/// Handle to a command registered in a [`Cli`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

/// A command tree rooted at an entrypoint.
///
/// Commands live in an arena and are linked with [`Cli::add_child`]. The
/// structure is only checked when dispatching (or on [`Cli::validate`]), so
/// it must be re-validated after any change.
#[derive(Debug)]
pub struct Cli {
    commands: Vec<Command>,
    children: IndexMap<CommandId, Vec<CommandId>>,
}

impl Cli {
    pub fn new(entrypoint: Command) -> Self {
        Self {
            commands: vec![entrypoint],
            children: IndexMap::new(),
        }
    }

    pub fn entrypoint(&self) -> CommandId {
        CommandId(0)
    }

    /// Add a command to the arena. It is unreachable until linked.
    pub fn register(&mut self, command: Command) -> CommandId {
        self.commands.push(command);
        CommandId(self.commands.len() - 1)
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    fn get(&self, id: CommandId) -> Result<&Command, TreeError> {
        self.command(id)
            .ok_or(TreeError::UnknownCommand { id: id.0 })
    }

    /// Link `child` under `parent`. Child names must be unique per parent.
    pub fn add_child(&mut self, parent: CommandId, child: CommandId) -> Result<(), TreeError> {
        let parent_cmd = self.get(parent)?;
        let child_cmd = self.get(child)?;
        if self.has_child(parent, child_cmd.name()) {
            return Err(TreeError::DuplicateChild {
                parent: parent_cmd.name().to_string(),
                child: child_cmd.name().to_string(),
            });
        }
        self.children.entry(parent).or_default().push(child);
        Ok(())
    }

    /// Whether `parent` already has a child called `name`.
    pub fn has_child(&self, parent: CommandId, name: &str) -> bool {
        self.child_named(parent, name).is_some()
    }

    pub fn children(&self, parent: CommandId) -> &[CommandId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    fn child_named(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.commands[id.0].name() == name)
    }

    fn graph_with_order(&self) -> (Graph, Vec<CommandId>) {
        let mut order: Vec<CommandId> = vec![self.entrypoint()];
        let mut index: IndexMap<CommandId, usize> = IndexMap::new();
        index.insert(self.entrypoint(), 0);

        let mut discover = |id: CommandId, order: &mut Vec<CommandId>| -> usize {
            *index.entry(id).or_insert_with(|| {
                order.push(id);
                order.len() - 1
            })
        };

        let mut edges = Vec::new();
        for (&parent, kids) in &self.children {
            let from = discover(parent, &mut order);
            for &child in kids {
                let to = discover(child, &mut order);
                edges.push((from, to));
            }
        }
        // Commands never linked anywhere still count as nodes.
        for id in (0..self.commands.len()).map(CommandId) {
            discover(id, &mut order);
        }

        let mut graph = Graph::with_nodes(order.len());
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        (graph, order)
    }

    /// Adjacency graph of the tree; the entrypoint is node 0 and other
    /// commands follow in discovery order.
    pub fn graph(&self) -> Graph {
        self.graph_with_order().0
    }

    /// Check that the registered commands form a tree rooted at the
    /// entrypoint.
    pub fn validate(&self) -> Result<(), TreeError> {
        let (graph, order) = self.graph_with_order();
        tracing::debug!(nodes = graph.len(), "validating command tree");

        let shape = graph.shape();
        if shape.cyclic {
            return Err(TreeError::Cyclic);
        }
        if let Some(idx) = shape.first_unreachable {
            return Err(TreeError::Unreachable {
                command: self.commands[order[idx].0].name().to_string(),
            });
        }
        Ok(())
    }

    /// Validate the tree and dispatch the process arguments (minus the
    /// program name), writing help and notices to stdout.
    pub fn exec(&self) -> Result<(), Error> {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        self.run_with_output(argv, &mut io::stdout().lock())
    }

    pub fn run<I, S>(&self, argv: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_with_output(argv, &mut io::stdout().lock())
    }

    /// Validate the tree, resolve the command named by the leading tokens and
    /// run it with the rest.
    ///
    /// Resolution stops at the first token that starts with `-` or does not
    /// name a child of the current command.
    pub fn run_with_output<I, S, W>(&self, argv: I, out: &mut W) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        W: Write,
    {
        self.validate()?;
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        let mut current = self.entrypoint();
        let mut lineage: Vec<&str> = Vec::new();
        let mut rest: &[String] = &argv;
        while let Some(first) = rest.first() {
            if first.starts_with('-') {
                break;
            }
            let Some(child) = self.child_named(current, first) else {
                break;
            };
            lineage.push(self.commands[current.0].name());
            current = child;
            rest = &rest[1..];
        }

        self.run_command(current, &lineage, rest, out)
    }

    fn run_command<W: Write>(
        &self,
        id: CommandId,
        ancestors: &[&str],
        rest: &[String],
        out: &mut W,
    ) -> Result<(), Error> {
        let command = &self.commands[id.0];
        let mut lineage = ancestors.to_vec();
        lineage.push(command.name());

        let mut ctx = Context {
            referrer: lineage.join(" "),
            command,
            children: self
                .children(id)
                .iter()
                .map(|child| &self.commands[child.0])
                .collect(),
            options: command.effective_options(),
            raw_args: rest,
            args: Args::default(),
        };
        tracing::debug!(command = %ctx.referrer, tokens = rest.len(), "dispatching");

        if rest.iter().any(|token| token == "--help") {
            writeln!(out, "{}", ctx.help())?;
            return Ok(());
        }

        let Some(behavior) = command.behavior() else {
            writeln!(
                out,
                "Behavior method not configured for command '{}'",
                ctx.referrer
            )?;
            return Ok(());
        };

        ctx.args = parse_args(ctx.options.as_slice(), command.argument(), rest)?;
        tracing::trace!(values = ctx.args.len(), "parsed arguments");

        behavior(&ctx)?;
        Ok(())
    }
}
