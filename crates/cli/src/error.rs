// SPDX-License-Identifier: MIT

//! User-facing error display with context and suggestions.

use heph_adapters::StatusError;
use heph_engine::WaitError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct HephError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl HephError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for HephError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                write!(f, "\n  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n\nsuggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HephError {}

impl From<WaitError> for HephError {
    fn from(err: WaitError) -> Self {
        let message = err.to_string();
        match err {
            WaitError::Timeout {
                resource, timeout, ..
            } => HephError::new(message)
                .with_context(format!(
                    "{} did not reach the required condition/phase within {:?}",
                    resource, timeout
                ))
                .with_suggestion("Raise the deadline: heph wait --timeout 10m ...")
                .with_suggestion(format!(
                    "Inspect the resource: kubectl describe pod {} --namespace {}",
                    resource.name, resource.namespace
                )),
            WaitError::Query {
                source: StatusError::CommandFailed(_),
                ..
            } => HephError::new(message)
                .with_context("kubectl could not be run or exited with an error")
                .with_suggestion("Point at a working binary: heph wait --kubectl /path/to/kubectl")
                .with_suggestion("Check cluster access: kubectl cluster-info"),
            WaitError::Query { .. } => HephError::new(message)
                .with_context("kubectl returned a status that could not be read"),
            WaitError::Config(_) => HephError::new(message).with_suggestion(
                "Use a poll interval above zero and a timeout of at least one interval",
            ),
            WaitError::Cancelled | WaitError::TaskAborted { .. } => HephError::new(message),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
