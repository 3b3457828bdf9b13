use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("composition '{name}' is not mounted")]
    Unmounted { name: String },
    #[error("composition '{name}' was still dirty after {limit} recompositions")]
    RecompositionLimit { name: String, limit: usize },
}

#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub component: String,
}

/// Catches a panic unwinding out of `content`, e.g. from a side effect run
/// during `Composition::render`, and reports it instead.
pub fn error_boundary<R>(
    component: impl Into<String>,
    content: impl FnOnce() -> R,
) -> Result<R, ErrorInfo> {
    let component = component.into();
    match catch_unwind(AssertUnwindSafe(content)) {
        Ok(value) => Ok(value),
        Err(err) => {
            let message = if let Some(s) = err.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = err.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            log::error!("{component}: caught panic: {message}");
            Err(ErrorInfo { message, component })
        }
    }
}
