use anyhow::{Context as _, Result, bail};
use argtree::{Argument, Cli, Command, Context, ErrorKind, OptionDef, Painter, ValueKind};
use std::{
    fs,
    io::{self, Write},
    path::Path,
    process,
};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    init_tracing();
    let cli = build_cli()?;

    let Err(err) = cli.exec() else {
        return Ok(());
    };
    let painter = Painter::auto_stderr();
    match err.kind() {
        ErrorKind::MalformedTree => {
            eprintln!("{} {err}", painter.red("fatal:"));
            process::exit(101);
        }
        ErrorKind::Behavior | ErrorKind::Io => Err(err.into()),
        _ => {
            eprintln!("{} {err}", painter.red("error:"));
            eprintln!("\nFor more information, try '--help'.");
            process::exit(1);
        }
    }
}

fn build_cli() -> Result<Cli> {
    let mut cli = Cli::new(root_command());
    let run = cli.register(run_command());
    let echo = cli.register(echo_command());
    cli.add_child(cli.entrypoint(), run)?;
    cli.add_child(cli.entrypoint(), echo)?;
    Ok(cli)
}

fn root_command() -> Command {
    Command::builder("argtree-demo")
        .long_desc("An example of the argtree command framework. Try out the sub-commands.")
        .behavior(|ctx| {
            let mut out = io::stdout().lock();
            write!(out, "{}", ctx.help())?;
            Ok(())
        })
        .build()
}

fn run_command() -> Command {
    Command::builder("run")
        .short_desc("Run the example")
        .long_desc("Print the working directory while ascending the filesystem 'n' times.")
        .option(
            OptionDef::builder(ValueKind::Int)
                .short("n")
                .description("Indicates how many steps up the file system the example will take.")
                .required(true)
                .build(),
        )
        .option(
            OptionDef::builder(ValueKind::Bool)
                .short("v")
                .long("verbose")
                .description("Run in verbose mode")
                .build(),
        )
        .option(
            OptionDef::builder(ValueKind::String)
                .short("l")
                .long("label")
                .description("Label for the output.")
                .build(),
        )
        .argument(
            Argument::new("directory", true)
                .with_description("The starting directory for the command"),
        )
        .behavior(run_behavior)
        .build()
}

fn run_behavior(ctx: &Context<'_>) -> Result<()> {
    let Some(steps) = ctx.args.get_int("n") else {
        bail!("option '-n' has no value");
    };
    if steps < 0 {
        bail!("option '-n' must not be negative, got {steps}");
    }
    let Some(dir) = ctx.args.get_str("directory") else {
        bail!("argument 'directory' has no value");
    };
    let verbose = ctx.args.get_bool("verbose").unwrap_or(false);

    let painter = Painter::auto();
    let label = ctx
        .args
        .get_str("label")
        .map(|label| painter.blue(&format!("[{label}] ")))
        .unwrap_or_default();

    let start = fs::canonicalize(dir)
        .with_context(|| format!("failed to resolve directory: {dir}"))?;
    let visited = ascend(&start, steps as usize);
    tracing::debug!(steps, visited = visited.len(), "ascended filesystem");

    let mut out = io::stdout().lock();
    if verbose {
        writeln!(out, "{label}Starting...")?;
        for path in &visited {
            writeln!(out, "{label}{}", painter.cyan(&path.display().to_string()))?;
        }
        writeln!(out, "{label}Finished")?;
    } else {
        writeln!(out, "Starting...")?;
        writeln!(out, "Finished (run again with `--verbose` to see the output)")?;
    }
    Ok(())
}

/// `start` and its ancestors, `steps` entries at most.
fn ascend(start: &Path, steps: usize) -> Vec<&Path> {
    start.ancestors().take(steps).collect()
}

fn echo_command() -> Command {
    Command::builder("echo")
        .short_desc("Print parsed values as JSON")
        .long_desc("Parse every supported option kind and print the resulting values as JSON.")
        .options([
            OptionDef::builder(ValueKind::String)
                .short("s")
                .long("name")
                .description("A string value")
                .build(),
            OptionDef::builder(ValueKind::Int)
                .short("i")
                .long("count")
                .description("An integer value")
                .build(),
            OptionDef::builder(ValueKind::Float)
                .short("f")
                .long("ratio")
                .description("A floating point value")
                .build(),
            OptionDef::builder(ValueKind::Bool)
                .short("b")
                .long("flag")
                .description("A switch")
                .build(),
        ])
        .argument(Argument::new("input", false).with_description("Any extra value"))
        .behavior(|ctx| {
            let json = serde_json::to_string_pretty(&ctx.args)?;
            let mut out = io::stdout().lock();
            writeln!(out, "{json}")?;
            Ok(())
        })
        .build()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
