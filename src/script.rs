//! Line-oriented script interpreter.
//!
//! A script is plain text, one instruction per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! load images/koala.ppm koala
//! brighten 10 koala koala-bright
//! vertical-flip koala koala-vertical
//! save out/koala-bright.png koala-bright
//! histogram koala
//! q
//! ```
//!
//! Besides the transform verbs listed in [`VERBS`](crate::command::VERBS), the
//! interpreter understands `load`, `save`, `show`, `histogram`, `menu` and
//! `quit`/`q`. A failing line is reported as `Error: <reason>` on the output
//! and execution continues with the next line. Only a failure to write the
//! output itself stops a run.

use crate::command::{Command, MissingIncrement, Operation, VERBS};
use crate::imaging::{ImageBackend, RustBackend};
use crate::output;
use crate::registry::{Registry, RegistryError};
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Undefined instruction: {0}")]
    UnknownVerb(String),
    #[error("{verb}: missing {what} (usage: {verb} {usage})")]
    MissingArgument {
        verb: String,
        what: &'static str,
        usage: &'static str,
    },
    #[error("{verb}: invalid argument '{arg}': {reason}")]
    InvalidArgument {
        verb: String,
        arg: String,
        reason: String,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What the caller should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line ran.
    Executed,
    /// Blank or comment.
    Skipped,
    /// `quit` or `q`.
    Quit,
}

/// Counts for a finished [`Session::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines that ran, including failed ones.
    pub executed: usize,
    pub failed: usize,
    /// Whether the run ended on `quit` rather than end of input.
    pub quit: bool,
}

pub const WELCOME: &str = "Welcome to imgscript!";
pub const FAREWELL: &str = "Bye.";
pub const PROMPT: &str = "> ";

/// Interpreter state: the registry plus output settings.
pub struct Session<B: ImageBackend = RustBackend> {
    registry: Registry<B>,
    echo: bool,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(registry: Registry<B>) -> Self {
        Self {
            registry,
            echo: false,
        }
    }

    /// Echo every non-blank line as `$ <line>` before running it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn registry(&self) -> &Registry<B> {
        &self.registry
    }

    /// Run one script line, writing any user-facing output to `out`.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Outcome, ScriptError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Skipped);
        }
        if self.echo {
            writeln!(out, "$ {line}")?;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (verb, args) = (tokens[0], &tokens[1..]);
        debug!(verb, ?args, "executing");

        match verb {
            "quit" | "q" => return Ok(Outcome::Quit),
            "menu" => {
                for l in output::format_menu() {
                    writeln!(out, "{l}")?;
                }
            }
            "load" => {
                let path = Path::new(arg(verb, args, 0, "image path", "image-path [image-name]")?);
                no_extra(verb, args, 2)?;
                let name = match args.get(1) {
                    Some(name) => {
                        self.registry.load(path, name)?;
                        name.to_string()
                    }
                    None => self.registry.load_as_stem(path)?,
                };
                writeln!(out, "Loaded {} as {name}", path.display())?;
            }
            "save" => {
                let usage = "image-path image-name";
                let path = Path::new(arg(verb, args, 0, "image path", usage)?);
                let name = arg(verb, args, 1, "image name", usage)?;
                no_extra(verb, args, 2)?;
                self.registry.save(path, name)?;
                writeln!(out, "Saved {name} to {}", path.display())?;
            }
            "show" => {
                let name = arg(verb, args, 0, "image name", "image-name")?;
                no_extra(verb, args, 1)?;
                write!(out, "{}", self.registry.get_image(name)?)?;
            }
            "histogram" => {
                let name = arg(verb, args, 0, "image name", "image-name")?;
                no_extra(verb, args, 1)?;
                let image = self.registry.get_image(name)?;
                for l in output::format_histogram(name, &image, &image.histogram()) {
                    writeln!(out, "{l}")?;
                }
            }
            _ => {
                let command = parse_command(verb, args)?;
                command.execute(&mut self.registry)?;
                debug!(%command, "done");
            }
        }
        Ok(Outcome::Executed)
    }

    /// Run every line of `input` until end of input or `quit`.
    ///
    /// Line failures are written to `out` as `Error: <reason>` and counted.
    /// In interactive mode a welcome banner, the menu and a prompt per line
    /// are printed, plus a farewell at the end.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut out: W,
        interactive: bool,
    ) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        if interactive {
            writeln!(out, "{WELCOME}")?;
            for l in output::format_menu() {
                writeln!(out, "{l}")?;
            }
        }

        let mut lines = input.lines();
        loop {
            if interactive {
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else { break };
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!(error = %e, "unreadable script line");
                    summary.executed += 1;
                    summary.failed += 1;
                    writeln!(out, "Error: {e}")?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            match self.execute_line(&line, &mut out) {
                Ok(Outcome::Skipped) => {}
                Ok(Outcome::Executed) => summary.executed += 1,
                Ok(Outcome::Quit) => {
                    summary.quit = true;
                    break;
                }
                Err(ScriptError::Io(e)) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "script line failed");
                    summary.executed += 1;
                    summary.failed += 1;
                    writeln!(out, "Error: {e}")?;
                }
            }
        }

        if interactive {
            writeln!(out)?;
            writeln!(out, "{FAREWELL}")?;
        }
        out.flush()?;
        Ok(summary)
    }
}

/// Build a transform [`Command`] from its verb and arguments.
///
/// `brighten` takes `increment source dest`; every other verb takes
/// `source dest`.
pub fn parse_command(verb: &str, args: &[&str]) -> Result<Command, ScriptError> {
    let usage = VERBS
        .iter()
        .find(|v| v.name == verb)
        .map(|v| v.usage)
        .ok_or_else(|| ScriptError::UnknownVerb(verb.to_string()))?;

    let (increment, names) = if usage.starts_with("increment ") {
        let raw = arg(verb, args, 0, "increment", usage)?;
        let delta = raw.parse::<i32>().map_err(|e| ScriptError::InvalidArgument {
            verb: verb.to_string(),
            arg: raw.to_string(),
            reason: e.to_string(),
        })?;
        (Some(delta), &args[1..])
    } else {
        (None, args)
    };

    let op = match Operation::from_verb(verb, increment) {
        Some(Ok(op)) => op,
        Some(Err(MissingIncrement)) => {
            return Err(ScriptError::MissingArgument {
                verb: verb.to_string(),
                what: "increment",
                usage,
            });
        }
        None => return Err(ScriptError::UnknownVerb(verb.to_string())),
    };
    let source = arg(verb, names, 0, "image name", usage)?;
    let dest = arg(verb, names, 1, "destination image name", usage)?;
    no_extra(verb, names, 2)?;
    Ok(Command::new(op, source, dest))
}

fn arg<'a>(
    verb: &str,
    args: &[&'a str],
    index: usize,
    what: &'static str,
    usage: &'static str,
) -> Result<&'a str, ScriptError> {
    args.get(index).copied().ok_or_else(|| ScriptError::MissingArgument {
        verb: verb.to_string(),
        what,
        usage,
    })
}

fn no_extra(verb: &str, args: &[&str], expected: usize) -> Result<(), ScriptError> {
    match args.get(expected) {
        Some(extra) => Err(ScriptError::InvalidArgument {
            verb: verb.to_string(),
            arg: extra.to_string(),
            reason: "unexpected argument".into(),
        }),
        None => Ok(()),
    }
}
