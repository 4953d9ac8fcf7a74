use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::CoreError;
use crate::tensor::{SparseTensor, Tensor};
use crate::types::DType;

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a [`Parameter`].
///
/// Assigned once at construction, unique within the process, and unchanged
/// for the parameter's lifetime. Optimizers key their per-parameter state
/// on it instead of on memory addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u64);

impl ParamId {
    fn next() -> Self {
        ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "param#{}", self.0)
    }
}

/// Gradient attached to a parameter by the gradient-computation subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Dense(Tensor),
    Sparse(SparseTensor),
}

impl Gradient {
    pub fn is_sparse(&self) -> bool {
        matches!(self, Gradient::Sparse(_))
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Gradient::Dense(t) => t.shape(),
            Gradient::Sparse(s) => s.shape(),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Gradient::Dense(t) => t.dtype(),
            Gradient::Sparse(s) => s.dtype(),
        }
    }

    /// Returns the dense tensor, or `None` for a sparse gradient.
    pub fn as_dense(&self) -> Option<&Tensor> {
        match self {
            Gradient::Dense(t) => Some(t),
            Gradient::Sparse(_) => None,
        }
    }
}

impl From<Tensor> for Gradient {
    fn from(tensor: Tensor) -> Self {
        Gradient::Dense(tensor)
    }
}

impl From<SparseTensor> for Gradient {
    fn from(sparse: SparseTensor) -> Self {
        Gradient::Sparse(sparse)
    }
}

/// A learnable tensor together with its (optional) gradient.
///
/// The caller owns parameters. Optimizers only borrow them mutably for the
/// duration of a step and remember nothing but their [`ParamId`].
/// `Parameter` is not `Clone`, since a copy would share the identity
/// of the original. Use [`Parameter::duplicate`] for an independent copy.
pub struct Parameter {
    id: ParamId,
    name: Option<String>,
    tensor: Tensor,
    grad: Option<Gradient>,
}

impl Parameter {
    /// Creates a new Parameter from a Tensor with an optional name.
    pub fn new(tensor: Tensor, name: Option<String>) -> Self {
        Parameter {
            id: ParamId::next(),
            name,
            tensor,
            grad: None,
        }
    }

    /// Creates a new Parameter without a name.
    pub fn new_unnamed(tensor: Tensor) -> Self {
        Self::new(tensor, None)
    }

    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if set, otherwise the id. Used in log and error messages.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn tensor_mut(&mut self) -> &mut Tensor {
        &mut self.tensor
    }

    pub fn grad(&self) -> Option<&Gradient> {
        self.grad.as_ref()
    }

    /// Replaces the gradient.
    ///
    /// # Errors
    /// `ShapeMismatch` if the gradient's shape differs from the parameter's.
    pub fn set_grad(&mut self, grad: impl Into<Gradient>) -> Result<(), CoreError> {
        let grad = grad.into();
        self.tensor.check_same_shape(grad.shape(), "Parameter::set_grad")?;
        self.grad = Some(grad);
        Ok(())
    }

    /// Accumulates a dense gradient into the existing one.
    ///
    /// With no existing gradient this is `set_grad`. A sparse existing
    /// gradient is densified first, so the result is always dense.
    pub fn acc_grad(&mut self, grad: Tensor) -> Result<(), CoreError> {
        self.tensor.check_same_shape(grad.shape(), "Parameter::acc_grad")?;
        let accumulated = match self.grad.take() {
            None => grad,
            Some(Gradient::Dense(mut existing)) => {
                existing.add_assign(&grad)?;
                existing
            }
            Some(Gradient::Sparse(sparse)) => {
                debug!(
                    "Densifying sparse gradient of {} before accumulation",
                    self.display_name()
                );
                let mut existing = sparse.to_dense()?;
                existing.add_assign(&grad)?;
                existing
            }
        };
        self.grad = Some(Gradient::Dense(accumulated));
        Ok(())
    }

    /// Removes and returns the gradient.
    pub fn take_grad(&mut self) -> Option<Gradient> {
        self.grad.take()
    }

    /// Drops the gradient so the parameter is skipped by the next step.
    pub fn clear_grad(&mut self) {
        self.grad = None;
    }

    /// Returns a copy of the value under a fresh identity, without gradient.
    pub fn duplicate(&self) -> Parameter {
        Parameter::new(self.tensor.clone(), self.name.clone())
    }
}

// Allow accessing the underlying Tensor immutably via Deref.
impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.tensor
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.tensor.shape())
            .field("dtype", &self.tensor.dtype())
            .field("has_grad", &self.grad.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
