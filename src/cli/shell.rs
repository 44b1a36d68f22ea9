use std::{
    fmt,
    io::{self, Lines, StdinLock},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    hint::HistoryHinter,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, KeyEvent,
};
use rustyline::{Helper, Highlighter, Hinter, Validator};
use shell_words::split;

use super::{
    errors::{CliError, CommandError},
    io as cli_io, output,
    shell_context::{CliMode, LoopControl, ShellContext},
};
use crate::ledger::{Category, TransactionKind, ViewWindow};

/// Setting this variable switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "SPENDLY_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        output::disable_color();
    }

    let mut context = ShellContext::new(mode)?;
    let result = LineSource::open(&context).and_then(|mut source| run(&mut context, &mut source));
    context.shutdown();
    result
}

enum Input {
    Line(String),
    Interrupted,
    End,
}

/// A line editor on a terminal, plain stdin lines in script mode.
enum LineSource {
    Terminal(Box<Editor<CommandHelper, DefaultHistory>>),
    Piped(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        match context.mode {
            CliMode::Script => Ok(LineSource::Piped(io::stdin().lines())),
            CliMode::Interactive => {
                let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
                editor.set_helper(Some(CommandHelper::new(context.command_names())));
                editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
                Ok(LineSource::Terminal(Box::new(editor)))
            }
        }
    }

    fn next(&mut self, context: &ShellContext) -> Result<Input, CliError> {
        match self {
            LineSource::Piped(lines) => match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::End),
            },
            LineSource::Terminal(editor) => match editor.readline(&context.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    Ok(Input::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => {
                    cli_io::print_info("Exiting shell.");
                    Ok(Input::End)
                }
                Err(err) => Err(err.into()),
            },
        }
    }
}

fn run(context: &mut ShellContext, source: &mut LineSource) -> Result<(), CliError> {
    loop {
        let line = match source.next(context)? {
            Input::Line(line) => line,
            Input::Interrupted if context.confirm_exit()? => return Ok(()),
            Input::Interrupted => continue,
            Input::End => return Ok(()),
        };
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => return Ok(()),
            Err(err) => context.report_error(err),
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(&err);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Completes whatever the word under the cursor can be: a command name,
/// a view window after `view`, a kind and then a category after `add`.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct CommandHelper {
    commands: Vec<&'static str>,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl CommandHelper {
    fn new(commands: impl Iterator<Item = &'static str>) -> Self {
        Self {
            commands: commands.collect(),
            hinter: HistoryHinter::new(),
        }
    }

    fn candidates(&self, previous: &[&str]) -> Vec<&'static str> {
        match previous {
            [] | ["help"] => self.commands.clone(),
            ["view"] => ViewWindow::ALL.iter().map(|window| window.as_str()).collect(),
            ["add"] => TransactionKind::ALL.iter().map(|kind| kind.as_str()).collect(),
            ["add", _, _] => Category::ALL.iter().map(|category| category.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let lowered = before[..start].to_ascii_lowercase();
        let previous: Vec<&str> = lowered.split_whitespace().collect();
        let needle = before[start..].to_ascii_lowercase();

        let matches = self
            .candidates(&previous)
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, matches))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
