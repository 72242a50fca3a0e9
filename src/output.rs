//! Command output in human-readable or JSON envelope form.
//!
//! JSON mode prints exactly one document per command on stdout:
//! `{"status":0,"result":...}` on success, or an error envelope carrying
//! the exit code as `status`.

use serde::Serialize;

use crate::error::{MdpackError, EXIT_SUCCESS};

/// Output mode for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<'a, T: Serialize> {
    pub status: i32,
    pub result: &'a T,
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: i32,
    pub name: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorEnvelope {
    pub fn from_error(err: &MdpackError) -> Self {
        let errors = match err {
            MdpackError::RemoteOperation { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };
        Self {
            status: err.exit_code(),
            name: err.name().to_string(),
            category: err.category().to_string(),
            message: err.to_string(),
            errors,
        }
    }
}

/// Render a success envelope as a JSON string
pub fn success_json<T: Serialize>(result: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SuccessEnvelope {
        status: EXIT_SUCCESS,
        result,
    })
}

/// Writes command results in the selected mode
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub mode: OutputMode,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Human },
        }
    }

    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Print a command result: the envelope in JSON mode, else the human message
    pub fn success<T: Serialize>(&self, result: &T, human: &str) -> Result<(), MdpackError> {
        match self.mode {
            OutputMode::Json => println!("{}", success_json(result)?),
            OutputMode::Human => {
                if !human.is_empty() {
                    println!("{}", human);
                }
            }
        }
        Ok(())
    }

    /// Print an error
    pub fn error(&self, err: &MdpackError) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string_pretty(&ErrorEnvelope::from_error(err)) {
                    println!("{}", json);
                }
            }
            OutputMode::Human => {
                let hint = err
                    .is_repollable()
                    .then_some("The request may still complete; run the report command again later");
                crate::cli_style::print_error(&err.to_string(), hint);
            }
        }
    }

    /// Print a warning (suppressed in JSON mode)
    pub fn warning(&self, msg: &str) {
        if !self.is_json() {
            crate::cli_style::print_warning(msg);
        }
    }
}
