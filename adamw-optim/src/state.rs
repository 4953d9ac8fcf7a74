//! Per-parameter moment storage for adaptive optimizers.

use std::collections::hash_map::{Entry, HashMap};

use adamw_core::error::CoreError;
use adamw_core::tensor::create::zeros_like_with_dtype;
use adamw_core::{DType, ParamId, Tensor};
use log::debug;

/// Moment estimates and step count of one parameter.
///
/// Both moment tensors have the parameter's shape and are stored in its
/// compute precision (`f32` at minimum).
#[derive(Debug, Clone, PartialEq)]
pub struct MomentState {
    /// Number of updates applied with a present gradient.
    pub step: u64,
    /// Exponential moving average of gradients.
    pub exp_avg: Tensor,
    /// Exponential moving average of squared gradients.
    pub exp_avg_sq: Tensor,
}

impl MomentState {
    /// Fresh state for `param`: `step = 0`, zero moments.
    pub fn zeros_for(param: &Tensor) -> Result<Self, CoreError> {
        let dtype = param.dtype().compute_dtype();
        Ok(MomentState {
            step: 0,
            exp_avg: zeros_like_with_dtype(param, dtype)?,
            exp_avg_sq: zeros_like_with_dtype(param, dtype)?,
        })
    }

    pub fn dtype(&self) -> DType {
        self.exp_avg.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        self.exp_avg.shape()
    }

    /// Bias-corrected copies `(exp_avg / (1 - beta1^step), exp_avg_sq / (1 - beta2^step))`.
    ///
    /// The stored moments are not modified. Returns the raw moments for a
    /// state that has not stepped yet.
    pub fn bias_corrected(&self, beta1: f64, beta2: f64) -> (Vec<f64>, Vec<f64>) {
        let (bc1, bc2) = if self.step == 0 {
            (1.0, 1.0)
        } else {
            bias_corrections(beta1, beta2, self.step)
        };
        let m = self.exp_avg.to_f64_vec().into_iter().map(|m| m / bc1).collect();
        let v = self.exp_avg_sq.to_f64_vec().into_iter().map(|v| v / bc2).collect();
        (m, v)
    }

    /// Checks that both buffers agree on shape and use a compute dtype.
    pub(crate) fn check_consistent(&self) -> Result<(), CoreError> {
        self.exp_avg
            .check_same_shape(self.exp_avg_sq.shape(), "MomentState")?;
        if self.exp_avg.dtype() != self.exp_avg_sq.dtype() {
            return Err(CoreError::DataTypeMismatch {
                expected: self.exp_avg.dtype(),
                actual: self.exp_avg_sq.dtype(),
                operation: "MomentState".to_string(),
            });
        }
        if self.dtype().is_half() {
            return Err(CoreError::UnsupportedOperation(format!(
                "moment buffers must be f32 or f64, got {:?}",
                self.dtype()
            )));
        }
        Ok(())
    }

    /// Checks that this state can drive updates of `param`.
    pub(crate) fn check_matches(&self, param: &Tensor) -> Result<(), CoreError> {
        param.check_same_shape(self.shape(), "MomentState for parameter")?;
        let expected = param.dtype().compute_dtype();
        if self.dtype() != expected {
            return Err(CoreError::DataTypeMismatch {
                expected,
                actual: self.dtype(),
                operation: "MomentState for parameter".to_string(),
            });
        }
        Ok(())
    }
}

/// `(1 - beta1^step, 1 - beta2^step)`.
pub(crate) fn bias_corrections(beta1: f64, beta2: f64, step: u64) -> (f64, f64) {
    let t = step as f64;
    (1.0 - beta1.powf(t), 1.0 - beta2.powf(t))
}

/// Owned mapping from parameter identity to its [`MomentState`].
///
/// Entries are created on first touch and live as long as the store.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    entries: HashMap<ParamId, MomentState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `id`, creating zeroed state shaped like `param`
    /// on first touch. An existing entry is returned unchanged.
    pub fn get_or_init(
        &mut self,
        id: ParamId,
        param: &Tensor,
    ) -> Result<&mut MomentState, CoreError> {
        match self.entries.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let state = MomentState::zeros_for(param)?;
                debug!(
                    "Initialized moment state for {} (shape {:?}, {:?})",
                    id,
                    state.shape(),
                    state.dtype()
                );
                Ok(entry.insert(state))
            }
        }
    }

    pub fn get(&self, id: ParamId) -> Option<&MomentState> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ParamId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamId, &MomentState)> {
        self.entries.iter()
    }

    pub(crate) fn entries(&self) -> &HashMap<ParamId, MomentState> {
        &self.entries
    }

    pub(crate) fn replace(&mut self, entries: HashMap<ParamId, MomentState>) {
        self.entries = entries;
    }
}
