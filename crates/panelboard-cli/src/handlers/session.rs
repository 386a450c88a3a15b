//! `panelboard session`: drive one view with an editing script on stdin.
//!
//! One command per line; blank lines and `#` comments are skipped.
//! Everything after the fixed arguments of a line is taken as text.

use crate::context::CliContext;
use crate::output;
use panelboard_domain::{Command, FieldRef, Panel, ViewId, ViewSession};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    AddPanel { title: String },
    AddCard { panel_id: String, text: String },
    DeletePanel { id: String },
    DeleteCard { id: String },
    FocusCard { id: String },
    FocusPanel { id: String },
    Type { text: String },
    Commit,
    EditCard { id: String, text: String },
    RenamePanel { id: String, title: String },
    DragCard { id: String },
    DropCard { panel_id: String, index: usize },
    DragPanel { id: String },
    DropPanel { index: usize },
    CancelDrag,
    Undo,
    Redo,
}

fn split_args(rest: &str, fixed: usize) -> (Vec<&str>, &str) {
    let mut args = Vec::with_capacity(fixed);
    let mut remaining = rest.trim_start();
    for _ in 0..fixed {
        let (arg, tail) = remaining
            .split_once(char::is_whitespace)
            .unwrap_or((remaining, ""));
        if arg.is_empty() {
            break;
        }
        args.push(arg);
        remaining = tail.trim_start();
    }
    (args, remaining)
}

fn take_args<'a>(
    verb: &str,
    rest: &'a str,
    count: usize,
) -> anyhow::Result<(Vec<&'a str>, &'a str)> {
    let (args, text) = split_args(rest, count);
    if args.len() < count {
        anyhow::bail!("'{}' expects {} argument(s)", verb, count);
    }
    Ok((args, text))
}

fn index_arg(value: &str) -> anyhow::Result<usize> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a position", value))
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ScriptStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let need = |count: usize| take_args(verb, rest, count);

    let step = match verb {
        "add-panel" => ScriptStep::AddPanel {
            title: rest.trim().to_string(),
        },
        "add-card" => {
            let (args, text) = need(1)?;
            ScriptStep::AddCard {
                panel_id: args[0].to_string(),
                text: text.to_string(),
            }
        }
        "delete-panel" => ScriptStep::DeletePanel {
            id: need(1)?.0[0].to_string(),
        },
        "delete-card" => ScriptStep::DeleteCard {
            id: need(1)?.0[0].to_string(),
        },
        "focus-card" => ScriptStep::FocusCard {
            id: need(1)?.0[0].to_string(),
        },
        "focus-panel" => ScriptStep::FocusPanel {
            id: need(1)?.0[0].to_string(),
        },
        "type" => ScriptStep::Type {
            text: rest.trim_start().to_string(),
        },
        "commit" => ScriptStep::Commit,
        "edit-card" => {
            let (args, text) = need(1)?;
            ScriptStep::EditCard {
                id: args[0].to_string(),
                text: text.to_string(),
            }
        }
        "rename-panel" => {
            let (args, title) = need(1)?;
            ScriptStep::RenamePanel {
                id: args[0].to_string(),
                title: title.to_string(),
            }
        }
        "drag-card" => ScriptStep::DragCard {
            id: need(1)?.0[0].to_string(),
        },
        "drop-card" => {
            let (args, _) = need(2)?;
            ScriptStep::DropCard {
                panel_id: args[0].to_string(),
                index: index_arg(args[1])?,
            }
        }
        "drag-panel" => ScriptStep::DragPanel {
            id: need(1)?.0[0].to_string(),
        },
        "drop-panel" => ScriptStep::DropPanel {
            index: index_arg(need(1)?.0[0])?,
        },
        "cancel-drag" => ScriptStep::CancelDrag,
        "undo" => ScriptStep::Undo,
        "redo" => ScriptStep::Redo,
        other => anyhow::bail!("unknown session command '{}'", other),
    };
    Ok(Some(step))
}

async fn apply(session: &mut ViewSession, step: ScriptStep) -> anyhow::Result<Option<Command>> {
    let command = match step {
        ScriptStep::AddPanel { title } => {
            session.add_panel(Panel::notes(title), None).await?;
            None
        }
        ScriptStep::AddCard { panel_id, text } => {
            session.add_card(&panel_id, &text).await?;
            None
        }
        ScriptStep::DeletePanel { id } => Some(session.delete_panel(&id).await?),
        ScriptStep::DeleteCard { id } => Some(session.delete_card(&id).await?),
        ScriptStep::FocusCard { id } => session.focus(FieldRef::CardText(id)).await?,
        ScriptStep::FocusPanel { id } => session.focus(FieldRef::PanelTitle(id)).await?,
        ScriptStep::Type { text } => {
            session.type_text(&text)?;
            None
        }
        ScriptStep::Commit => session.commit_field().await?,
        ScriptStep::EditCard { id, text } => {
            session.focus(FieldRef::CardText(id)).await?;
            session.type_text(&text)?;
            session.commit_field().await?
        }
        ScriptStep::RenamePanel { id, title } => {
            session.focus(FieldRef::PanelTitle(id)).await?;
            session.type_text(&title)?;
            session.commit_field().await?
        }
        ScriptStep::DragCard { id } => {
            session.begin_card_drag(&id)?;
            None
        }
        ScriptStep::DropCard { panel_id, index } => session.drop_card(&panel_id, index).await?,
        ScriptStep::DragPanel { id } => {
            session.begin_panel_drag(&id)?;
            None
        }
        ScriptStep::DropPanel { index } => session.drop_panel(index).await?,
        ScriptStep::CancelDrag => {
            session.cancel_drag();
            None
        }
        ScriptStep::Undo => session.undo().await?,
        ScriptStep::Redo => session.redo().await?,
    };
    Ok(command)
}

#[derive(Serialize)]
struct StepReport {
    line: usize,
    command: Option<&'static str>,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    view: ViewId,
    steps: Vec<StepReport>,
    undo_depth: usize,
    redo_depth: usize,
    panels: &'a [Panel],
}

pub async fn handle(ctx: &CliContext, view: ViewId) -> anyhow::Result<()> {
    let mut session = ctx.open(view).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut steps = Vec::new();
    let mut number = 0;

    while let Some(line) = lines.next_line().await? {
        number += 1;
        let Some(step) = parse_line(&line).map_err(|e| anyhow::anyhow!("line {}: {}", number, e))?
        else {
            continue;
        };
        tracing::debug!("session line {}: {:?}", number, step);
        let command = apply(&mut session, step)
            .await
            .map_err(|e| anyhow::anyhow!("line {}: {:#}", number, e))?;
        steps.push(StepReport {
            line: number,
            command: command.as_ref().map(Command::kind),
        });
    }

    session.save().await?;
    output::output_success(SessionReport {
        view,
        steps,
        undo_depth: session.history().undo_depth(),
        redo_depth: session.history().redo_depth(),
        panels: session.panels(),
    });
    Ok(())
}
