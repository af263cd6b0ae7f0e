//! Error handling
//!
//! Application-level operations (file I/O, scripts, settings) use anyhow.
//! The tool session and the registry check use typed errors, since callers
//! branch on what went wrong.

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};
use thiserror::Error;

use crate::tools::catalog::ActionToolId;
use crate::tools::instance::LifecycleState;
use crate::tools::tool_id::ToolId;

/// Result type alias for convenience throughout the crate
pub type SketchResult<T> = Result<T>;

/// Helper functions for creating common error contexts
pub trait SketchContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> SketchResult<T>;

    /// Add script line context to an error
    fn with_line_context(self, line: usize, text: &str) -> SketchResult<T>;
}

impl<T, E> SketchContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> SketchResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }

    fn with_line_context(self, line: usize, text: &str) -> SketchResult<T> {
        self.with_context(|| format!("line {line}: '{}'", text.trim()))
    }
}

/// Errors reported by the tool session.
///
/// `CannotBegin` is the ordinary "tool is not applicable right now" outcome;
/// callers show it as a disabled action rather than a failure.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("tool {0} is already active")]
    ToolActive(ToolId),

    #[error("no tool is active")]
    NoActiveTool,

    #[error("{0} cannot begin with the current document and selection")]
    CannotBegin(ToolId),

    #[error("document is read-only")]
    ReadOnly,

    #[error("{tool}: cannot {operation} while {state}")]
    Lifecycle {
        tool: ToolId,
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("{tool} failed")]
    Failed {
        tool: ToolId,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Inconsistencies between the tool identity table, the action catalog,
/// the lookup tables and the factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} has no action catalog entry")]
    MissingCatalogEntry(ActionToolId),

    #[error("{0} has more than one action catalog entry")]
    DuplicateCatalogEntry(ActionToolId),

    #[error("{0} has no lookup table entry")]
    MissingLutEntry(ActionToolId),

    #[error("lookup name \"{name}\" does not resolve back to {id}")]
    LutMismatch { id: ActionToolId, name: &'static str },

    #[error("{kind} code {code} is used more than once")]
    DuplicateCode { kind: &'static str, code: u16 },

    #[error("factory built {built} when asked for {requested}")]
    FactoryMismatch { requested: ToolId, built: ToolId },

    #[error("{tool}: catalog SPECIFIC flag is {declared} but the tool reports {actual}")]
    SpecificMismatch {
        tool: ToolId,
        declared: bool,
        actual: bool,
    },
}

/// Validation helpers that return anyhow errors
pub fn validate_finite_coords(x: f64, y: f64) -> SketchResult<()> {
    ensure!(x.is_finite(), "X coordinate must be finite, got: {}", x);
    ensure!(y.is_finite(), "Y coordinate must be finite, got: {}", y);
    Ok(())
}

pub fn validate_datum(value: f64) -> SketchResult<()> {
    ensure!(value.is_finite(), "datum must be finite, got: {}", value);
    ensure!(value > 0.0, "datum must be positive, got: {}", value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_names_the_path() {
        let err: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = err.with_file_context("read", "part.json").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read file: part.json");
    }

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::CannotBegin(ToolId::Extrude);
        assert_eq!(
            err.to_string(),
            "EXTRUDE cannot begin with the current document and selection"
        );
        let err = ToolError::Lifecycle {
            tool: ToolId::Delete,
            operation: "begin",
            state: LifecycleState::Uninitialized,
        };
        assert_eq!(err.to_string(), "DELETE: cannot begin while uninitialized");
    }

    #[test]
    fn test_validate_datum() {
        assert!(validate_datum(2.5).is_ok());
        assert!(validate_datum(0.0).is_err());
        assert!(validate_datum(f64::NAN).is_err());
        assert!(validate_finite_coords(1.0, f64::INFINITY).is_err());
    }
}
