//! Help text rendering.

use crate::command::Context;

fn push_rows(out: &mut String, rows: &[(String, String)]) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
        }
    }
}

fn requirement(required: bool) -> &'static str {
    if required { "Required" } else { "Optional" }
}

/// Render help for the command described by `ctx`.
pub fn render(ctx: &Context<'_>) -> String {
    let command = ctx.command;
    let argument = command.argument();

    let mut out = format!("Usage: {}", ctx.referrer);
    if !ctx.children.is_empty() {
        out.push_str(" [COMMAND]");
    }
    if !ctx.options.is_empty() {
        out.push_str(" [OPTIONS]");
    }
    if argument.is_declared() {
        if argument.required {
            out.push_str(&format!(" <{}>", argument.name));
        } else {
            out.push_str(&format!(" [{}]", argument.name));
        }
    }
    out.push('\n');

    if !command.long_desc().trim().is_empty() {
        out.push('\n');
        out.push_str(command.long_desc().trim_end());
        out.push('\n');
    }

    if !ctx.children.is_empty() {
        out.push_str("\nCommands:\n");
        let rows: Vec<(String, String)> = ctx
            .children
            .iter()
            .map(|child| (child.name().to_string(), child.short_desc().trim().to_string()))
            .collect();
        push_rows(&mut out, &rows);
    }

    if !ctx.options.is_empty() {
        out.push_str("\nOptions:\n");
        let rows: Vec<(String, String)> = ctx
            .options
            .iter()
            .map(|opt| {
                let mut help = format!("[{}, Type: {}]", requirement(opt.required), opt.kind);
                if !opt.description.trim().is_empty() {
                    help.push(' ');
                    help.push_str(opt.description.trim());
                }
                (opt.display_name(), help)
            })
            .collect();
        push_rows(&mut out, &rows);
    }

    if argument.is_declared() {
        out.push_str(&format!(
            "\nArgument: '{}' ({})\n",
            argument.name,
            requirement(argument.required)
        ));
        if !argument.description.trim().is_empty() {
            out.push_str(&format!("  {}\n", argument.description.trim()));
        }
    }

    out
}
