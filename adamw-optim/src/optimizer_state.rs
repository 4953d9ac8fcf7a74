use std::collections::HashMap;

use adamw_core::ParamId;

use crate::param_group::ParamGroup;
use crate::state::MomentState;

/// In-memory snapshot of an optimizer's state.
///
/// Produced by `Optimizer::state_dict` and consumed by
/// `Optimizer::load_state_dict`. Parameter identities are only meaningful
/// within the process that created them; this is not a checkpoint format.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptimizerState {
    /// State of an [`AdamW`](crate::AdamW) optimizer.
    AdamW {
        /// Parameter groups with every option resolved.
        param_groups: Vec<ParamGroup>,
        /// Moment estimates keyed by parameter identity.
        state: HashMap<ParamId, MomentState>,
    },
    /// State of an optimizer that has nothing to save.
    #[default]
    Placeholder,
}

impl OptimizerState {
    /// Name of the optimizer that produced this state.
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizerState::AdamW { .. } => "AdamW",
            OptimizerState::Placeholder => "Placeholder",
        }
    }
}
