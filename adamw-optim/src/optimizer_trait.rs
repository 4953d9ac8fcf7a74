use adamw_core::Parameter;

use crate::error::OptimError;
use crate::optimizer_state::OptimizerState;
use crate::param_group::ParamGroup;

/// Trait defining the common interface for all optimizers.
///
/// Optimizers are responsible for updating model parameters based on their gradients.
/// They never hold on to parameters: each call borrows them mutably and
/// returns them untouched by any lingering reference.
pub trait Optimizer {
    /// Performs a single optimization step.
    ///
    /// Every parameter of `params` that belongs to one of the optimizer's
    /// groups and carries a gradient is updated in place. Parameters without
    /// a gradient are skipped.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the step was successful, or an `OptimError` otherwise.
    fn step(&mut self, params: &mut [Parameter]) -> Result<(), OptimError>;

    /// Re-evaluates the model through `closure`, then performs a step.
    ///
    /// The closure runs to completion, with full mutable access to
    /// `params` (typically to recompute gradients), before any parameter
    /// is updated. Its return value (typically the loss) is passed back.
    /// A closure error aborts the call with no update applied.
    fn step_with<L, E, F>(&mut self, params: &mut [Parameter], closure: F) -> Result<L, E>
    where
        Self: Sized,
        F: FnOnce(&mut [Parameter]) -> Result<L, E>,
        E: From<OptimError>,
    {
        let loss = closure(params)?;
        self.step(params)?;
        Ok(loss)
    }

    /// Clears the gradients of all parameters managed by the optimizer.
    ///
    /// Parameters in `params` that belong to no group are left alone.
    fn zero_grad(&self, params: &mut [Parameter]);

    /// Returns an immutable slice of the parameter groups managed by the optimizer.
    fn param_groups(&self) -> &[ParamGroup];

    /// Returns the optimizer's current state as an `OptimizerState` object.
    fn state_dict(&self) -> Result<OptimizerState, OptimError>;

    /// Loads the optimizer's state from an `OptimizerState` object.
    ///
    /// On error the optimizer is left exactly as it was.
    fn load_state_dict(&mut self, state_dict: &OptimizerState) -> Result<(), OptimError>;
}
