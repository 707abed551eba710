//! Interactive yes/no decisions.
//!
//! The run asks a handful of questions (preload the index, delete
//! duplicates, write playlists, ...). Each one is either answered up front
//! through [`Decisions`](crate::config::Decisions) or, when the run is
//! interactive, asked on the terminal through a [`Prompter`].
//!
//! The prompter is generic over its input and output so tests can drive it
//! with in-memory buffers.

use std::io::{self, BufRead, Write};

use crate::config::{Decision, Decisions};

/// Asks yes/no questions over a reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter reading answers from `input` and writing
    /// questions to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask `question` until a yes/no answer (or an empty line) is given.
    ///
    /// Accepts `y`, `yes`, `n`, `no` in any case. An empty line takes
    /// `default`; end of input also takes `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the terminal fails.
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Yes]/No" } else { "Yes/[No]" };
        let mut line = String::new();

        loop {
            line.clear();
            write!(self.output, "{question} <{hint}> : ")?;
            self.output.flush()?;

            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(default);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                "" => return Ok(default),
                _ => continue,
            }
        }
    }
}

impl Prompter<io::StdinLock<'static>, Box<dyn Write>> {
    /// Prompter on the process terminal.
    ///
    /// Questions go to stderr when stdout carries machine-readable output.
    #[must_use]
    pub fn terminal(questions_on_stderr: bool) -> Self {
        let output: Box<dyn Write> = if questions_on_stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self::new(io::stdin().lock(), output)
    }
}

/// Resolves [`Decision`]s from configuration, falling back to a prompt.
///
/// A decision enabled in the configuration is taken as-is. Otherwise the
/// question is asked when a prompter is attached, and answered "no" when
/// it is not.
pub struct Decider<R, W> {
    decisions: Decisions,
    prompter: Option<Prompter<R, W>>,
}

impl<R: BufRead, W: Write> Decider<R, W> {
    /// Decider that never prompts.
    pub fn non_interactive(decisions: Decisions) -> Self {
        Self {
            decisions,
            prompter: None,
        }
    }

    /// Decider that prompts for every decision not enabled up front.
    pub fn interactive(decisions: Decisions, prompter: Prompter<R, W>) -> Self {
        Self {
            decisions,
            prompter: Some(prompter),
        }
    }

    /// Resolve `decision`.
    ///
    /// # Errors
    ///
    /// Returns an error if prompting fails.
    pub fn decide(&mut self, decision: Decision) -> io::Result<bool> {
        if self.decisions.get(decision) {
            log::debug!("{decision:?} enabled by configuration");
            return Ok(true);
        }
        match self.prompter.as_mut() {
            Some(prompter) => prompter.confirm(decision.question(), false),
            None => Ok(false),
        }
    }
}
