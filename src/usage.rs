//! Renders aligned help text from field annotations.

use std::fmt::Write;

use crate::{
    dispatch::EXEC,
    tree::{describe, subcommand, Descriptor, Kind, Tree},
    Result,
};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

/// Usage of the node reached by following `path` as far as it names
/// subcommands. Useful for printing help after a failed bind.
pub fn render_at(tree: &mut dyn Tree, path: &[String]) -> Result<String> {
    match path.split_first() {
        Some((token, rest)) => match subcommand(tree, token)? {
            Some(sub) => render_at(sub, rest),
            None => render(tree),
        },
        None => render(tree),
    }
}

/// ```text
/// <about>
///
/// FLAGS
///   --name, -n  <string>  [required]  Who to greet.
///
/// COMMANDS
///   remote, r  Manage remotes.
/// ```
pub fn render(tree: &mut dyn Tree) -> Result<String> {
    let about = tree.about();
    let actions = tree.actions();
    let fields = describe(tree)?;

    let mut buf = String::new();
    if let Some(about) = about {
        w!(buf, "{}\n", about);
    }

    let flags = fields
        .iter()
        .filter_map(|field| match field.kind {
            Kind::Value(kind) => Some(flag_row(field, kind)),
            Kind::Tree => None,
        })
        .collect::<Vec<_>>();
    if !flags.is_empty() {
        section(&mut buf, "FLAGS", &flags);
    }

    let commands = fields
        .iter()
        .filter(|field| field.kind == Kind::Tree)
        .map(command_row)
        .chain(
            actions
                .iter()
                .filter(|it| !it.eq_ignore_ascii_case(EXEC))
                .map(|it| vec![it.to_string(), String::new()]),
        )
        .collect::<Vec<_>>();
    if !commands.is_empty() {
        section(&mut buf, "COMMANDS", &commands);
    }

    Ok(buf)
}

fn flag_row(field: &Descriptor, kind: &str) -> Vec<String> {
    let names = field.tag.aliases.iter().fold(dashed(field.name()), |mut acc, alias| {
        acc.push_str(", ");
        acc.push_str(&dashed(alias));
        acc
    });
    let value = if kind == "bool" { String::new() } else { format!("<{}>", kind) };
    let note = match &field.tag.default {
        Some(default) => format!("[default: {}]", default),
        None if field.tag.required => "[required]".to_string(),
        None => String::new(),
    };
    vec![names, value, note, field.doc.unwrap_or_default().to_string()]
}

fn command_row(field: &Descriptor) -> Vec<String> {
    let mut names = field.name().to_string();
    for alias in &field.tag.aliases {
        names.push_str(", ");
        names.push_str(alias);
    }
    vec![names, field.doc.unwrap_or_default().to_string()]
}

fn dashed(name: &str) -> String {
    let dashes = if name.chars().count() == 1 { "-" } else { "--" };
    format!("{}{}", dashes, name)
}

fn section(buf: &mut String, title: &str, rows: &[Vec<String>]) {
    if !buf.is_empty() {
        w!(buf, "\n");
    }
    w!(buf, "{}\n", title);

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..columns)
        .map(|i| rows.iter().filter_map(|row| row.get(i)).map(|it| it.chars().count()).max())
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>();

    for row in rows {
        let mut line = String::from("  ");
        for (cell, width) in row.iter().zip(&widths) {
            // Empty columns take no room at all.
            if *width == 0 {
                continue;
            }
            w!(line, "{:<width$}  ", cell, width = width);
        }
        w!(buf, "{}\n", line.trim_end());
    }
}
