//! Collaborators supplied by the host: the dynamic engine, notices, and the editor

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Errors reported by a dynamic engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be started
    #[error("failed to start dynamic engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported a failure
    #[error("dynamic engine failed: {message}")]
    Execution { message: String },

    /// The engine produced output that is not valid UTF-8
    #[error("dynamic engine produced invalid UTF-8 output")]
    InvalidOutput,
}

impl EngineError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}

/// Executes dynamic template text.
///
/// Execution is all-or-nothing: either the fully executed text or an error.
pub trait DynamicEngine {
    fn execute(&self, dynamic_content: &str) -> Result<String, EngineError>;
}

/// Shows a user-visible notice
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Moves the caret and selection in the target document
pub trait Editor {
    /// Place the caret at byte `offset`, selecting `selection_length` bytes
    fn place_caret(&mut self, offset: usize, selection_length: usize);
}

/// An engine that runs an external program.
///
/// The dynamic content is written to the program's stdin and its stdout is
/// taken as the executed text. A non-zero exit status is a failure.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add arguments passed to the program
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl DynamicEngine for CommandEngine {
    fn execute(&self, dynamic_content: &str) -> Result<String, EngineError> {
        let spawn_err = |source| EngineError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // stdin is fed from its own thread while stdout drains
        let stdin = child.stdin.take();
        let input = dynamic_content.to_string();
        let writer = std::thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        });

        let output = child.wait_with_output().map_err(spawn_err)?;
        match writer.join() {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(spawn_err(e)),
            Err(_) => return Err(EngineError::execution("engine input writer panicked")),
            _ => {}
        }
        debug!(program = %self.program, status = %output.status, "dynamic engine finished");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("'{}' exited with {}", self.program, output.status),
                detail => detail.to_string(),
            };
            return Err(EngineError::Execution { message });
        }

        String::from_utf8(output.stdout).map_err(|_| EngineError::InvalidOutput)
    }
}
