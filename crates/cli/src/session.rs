use crate::commands::{self, BatchArgs, CleanArgs, PreviewArgs, RenameArgs, SuggestArgs};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use imaginex_core::{AppConfig, RenameEngine};
use std::io::{self, BufRead, IsTerminal, Write};
use std::ops::ControlFlow;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    Clean(CleanArgs),
    Preview(PreviewArgs),
    Rename(RenameArgs),
    Batch(BatchArgs),
    Suggest(SuggestArgs),
    /// Revert the most recent rename or batch.
    Undo,
    /// List undoable batches, newest first.
    History,
    #[command(alias = "exit")]
    Quit,
}

/// Reads commands from stdin until `quit` or end of input. The undo history
/// lives as long as the session.
pub fn run(engine: &mut RenameEngine, config: &AppConfig) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("imaginex> ");
            io::stdout().flush().context("could not flush stdout")?;
        }
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("could not read from stdin")?;

        let tokens = match split_line(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };

        let command = match SessionLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                err.print().context("could not write to stderr")?;
                continue;
            }
        };

        match dispatch(engine, config, command) {
            Ok(ControlFlow::Break(())) => return Ok(()),
            Ok(ControlFlow::Continue(())) => {}
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
}

fn dispatch(
    engine: &mut RenameEngine,
    config: &AppConfig,
    command: SessionCommand,
) -> Result<ControlFlow<()>> {
    match command {
        SessionCommand::Clean(args) => commands::cmd_clean(&args),
        SessionCommand::Preview(args) => commands::cmd_preview(engine, config, &args)?,
        SessionCommand::Rename(args) => commands::cmd_rename(engine, config, &args)?,
        SessionCommand::Batch(args) => commands::cmd_batch(engine, config, &args)?,
        SessionCommand::Suggest(args) => commands::cmd_suggest(config, &args)?,
        SessionCommand::Undo => commands::cmd_undo(engine)?,
        SessionCommand::History => commands::cmd_history(engine.history()),
        SessionCommand::Quit => return Ok(ControlFlow::Break(())),
    }
    Ok(ControlFlow::Continue(()))
}

/// Splits a command line on whitespace. Single or double quotes group words
/// and a backslash escapes the next character outside single quotes.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_token = true;
                }
                None => bail!("dangling backslash at end of line"),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
