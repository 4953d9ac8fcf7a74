use adamw_core::error::CoreError;
use thiserror::Error;

/// Errors raised by optimizer construction and stepping.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum OptimError {
    /// Invalid hyperparameter. Raised at construction (or `set_lr`), never
    /// mid-step.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A parameter carried a sparse gradient. Aborts the whole step.
    #[error("AdamW does not support sparse gradients, please consider SparseAdam instead (parameter {param})")]
    SparseGradient { param: String },

    #[error("Parameter group index {index} out of range ({len} groups)")]
    UnknownParamGroup { index: usize, len: usize },

    #[error("Incompatible optimizer state: {0}")]
    StateDictMismatch(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
