//! Host capabilities consumed by native functions.
//!
//! `input` and `sleep` are the suspension points of a running program: the
//! interpreter calls them from its single thread, one at a time, and resumes
//! with whatever the host returns.  A host with its own event loop implements
//! them by waiting on its own channel.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use log::debug;

pub trait System {
    /// Append one line of program output.
    fn log(&mut self, line: &str);

    /// Wait for one line of user input, without its trailing newline.
    fn input(&mut self) -> io::Result<String>;

    /// Ask the host to clear its output surface.
    fn clear(&mut self);

    /// Pause the program for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Terminal host: stdout, stdin, ANSI clear, real sleeping.
#[derive(Debug, Default)]
pub struct StdSystem;

impl System for StdSystem {
    fn log(&mut self, line: &str) {
        println!("{}", line);
    }

    fn input(&mut self) -> io::Result<String> {
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;

        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);

        Ok(line)
    }

    fn clear(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Deterministic host for tests and embedding: input comes from a queue,
/// output is captured, and sleeps are recorded instead of performed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSystem {
    inputs: VecDeque<String>,
    output: Vec<String>,
    clears: usize,
    sleeps: Vec<Duration>,
}

impl ScriptedSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines to be returned by successive `input()` calls.
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl System for ScriptedSystem {
    fn log(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn input(&mut self) -> io::Result<String> {
        let line = self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left")
        })?;

        debug!("Scripted input: {}", line);

        Ok(line)
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
