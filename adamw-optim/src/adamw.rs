use std::collections::hash_map::{Entry, HashMap};

use adamw_core::{ComputeElement, DType, Gradient, ParamId, Parameter};
use log::{debug, trace, warn};

use crate::config::{validate_lr, AdamWConfig};
use crate::error::OptimError;
use crate::kernel::{adamw_update, StepScalars};
use crate::optimizer_state::OptimizerState;
use crate::optimizer_trait::Optimizer;
use crate::param_group::{ParamGroup, ParamGroupOptions};
use crate::state::{MomentState, StateStore};

/// Adam with decoupled weight decay.
///
/// Keeps one [`MomentState`] per parameter identity, created on the first
/// step in which that parameter has a gradient. Weight decay is applied to
/// the parameter after the gradient-based update and is scaled by the
/// learning rate, rather than being folded into the gradient as an L2 term.
///
/// `correct_bias` is accepted and validated but bias correction is always
/// applied, whatever its value. A warning is logged at construction when a
/// group sets it to `false`.
#[derive(Debug)]
pub struct AdamW {
    param_groups: Vec<ParamGroup>,
    /// Resolved hyperparameters, parallel to `param_groups`.
    configs: Vec<AdamWConfig>,
    /// Group index of every registered parameter.
    membership: HashMap<ParamId, usize>,
    state: StateStore,
}

/// Validated groups, ready to be swapped into an optimizer.
struct ResolvedGroups {
    param_groups: Vec<ParamGroup>,
    configs: Vec<AdamWConfig>,
    membership: HashMap<ParamId, usize>,
}

/// Resolves each group against its defaults and validates it.
///
/// Errors name the offending group. A parameter may belong to one group
/// only, and only once.
fn resolve_groups<'a>(
    groups: impl IntoIterator<Item = (ParamGroup, &'a AdamWConfig)>,
) -> Result<ResolvedGroups, OptimError> {
    let mut resolved = ResolvedGroups {
        param_groups: Vec::new(),
        configs: Vec::new(),
        membership: HashMap::new(),
    };

    for (group_idx, (group, defaults)) in groups.into_iter().enumerate() {
        let config = group.options.resolve(defaults);
        config.validate().map_err(|e| match e {
            OptimError::ConfigurationError(msg) => {
                OptimError::ConfigurationError(format!("param group {}: {}", group_idx, msg))
            }
            other => other,
        })?;
        for &id in &group.params {
            match resolved.membership.entry(id) {
                Entry::Occupied(_) => {
                    return Err(OptimError::ConfigurationError(format!(
                        "param group {}: {} appears more than once across parameter groups",
                        group_idx, id
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(group_idx);
                }
            }
        }
        if !config.correct_bias {
            warn!(
                "AdamW: param group {} sets correct_bias = false, but bias correction is always applied",
                group_idx
            );
        }
        resolved.param_groups.push(ParamGroup {
            params: group.params,
            options: ParamGroupOptions::from(&config),
        });
        resolved.configs.push(config);
    }
    Ok(resolved)
}

impl AdamW {
    /// Creates an optimizer with a single group holding `params`.
    pub fn new(
        params: impl IntoIterator<Item = ParamId>,
        config: AdamWConfig,
    ) -> Result<Self, OptimError> {
        Self::with_groups(vec![ParamGroup::new(params)], config)
    }

    /// Creates an optimizer over several groups.
    ///
    /// Options a group leaves unset are taken from `defaults`. Every
    /// resolved group is validated here; nothing is validated later.
    ///
    /// # Errors
    /// `ConfigurationError` for an out-of-range hyperparameter or a
    /// parameter listed more than once across the groups.
    pub fn with_groups(
        groups: Vec<ParamGroup>,
        defaults: AdamWConfig,
    ) -> Result<Self, OptimError> {
        let ResolvedGroups {
            param_groups,
            configs,
            membership,
        } = resolve_groups(groups.into_iter().map(|group| (group, &defaults)))?;

        debug!(
            "AdamW: created with {} param group(s), {} parameter(s)",
            param_groups.len(),
            membership.len()
        );
        Ok(AdamW {
            param_groups,
            configs,
            membership,
            state: StateStore::new(),
        })
    }

    /// Per-parameter moment state.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Resolved hyperparameters of group `index`.
    pub fn group_config(&self, index: usize) -> Option<&AdamWConfig> {
        self.configs.get(index)
    }

    /// Sets the learning rate of one group (e.g. from an LR scheduler).
    pub fn set_lr(&mut self, group_idx: usize, lr: f64) -> Result<(), OptimError> {
        let len = self.configs.len();
        let config = self
            .configs
            .get_mut(group_idx)
            .ok_or(OptimError::UnknownParamGroup {
                index: group_idx,
                len,
            })?;
        validate_lr(lr)?;
        config.lr = lr;
        self.param_groups[group_idx].options.lr = Some(lr);
        Ok(())
    }

    /// Sets the learning rate of every group.
    pub fn set_lr_all(&mut self, lr: f64) -> Result<(), OptimError> {
        validate_lr(lr)?;
        for idx in 0..self.configs.len() {
            self.set_lr(idx, lr)?;
        }
        Ok(())
    }

    /// Maps each identity to its position in `params`, keeping only
    /// parameters that belong to some group.
    fn index_params(&self, params: &[Parameter]) -> HashMap<ParamId, usize> {
        let mut index = HashMap::with_capacity(params.len());
        for (pos, param) in params.iter().enumerate() {
            if self.membership.contains_key(&param.id()) {
                index.insert(param.id(), pos);
            } else {
                debug!(
                    "AdamW: {} belongs to no param group, ignoring",
                    param.display_name()
                );
            }
        }
        index
    }

    /// Rejects the step before anything is mutated: sparse gradients,
    /// gradients or saved moments that do not fit their parameter.
    fn check_step_inputs(
        &self,
        params: &[Parameter],
        index: &HashMap<ParamId, usize>,
    ) -> Result<(), OptimError> {
        for group in &self.param_groups {
            for id in &group.params {
                let Some(&pos) = index.get(id) else {
                    continue;
                };
                let param = &params[pos];
                match param.grad() {
                    None => {}
                    Some(Gradient::Sparse(_)) => {
                        return Err(OptimError::SparseGradient {
                            param: param.display_name(),
                        });
                    }
                    Some(Gradient::Dense(grad)) => {
                        param
                            .tensor()
                            .check_same_shape(grad.shape(), "AdamW::step gradient")?;
                        if let Some(moments) = self.state.get(*id) {
                            moments.check_matches(param.tensor())?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Updates one parameter in its compute precision `F`.
///
/// Returns `false` when the parameter had no gradient and was skipped.
fn update_param<F: ComputeElement>(
    param: &mut Parameter,
    config: &AdamWConfig,
    state: &mut StateStore,
) -> Result<bool, OptimError> {
    // Coerced copy; the caller's gradient keeps its own dtype.
    let grad: Vec<F> = match param.grad() {
        None => return Ok(false),
        Some(Gradient::Dense(g)) => g.to_vec(),
        Some(Gradient::Sparse(_)) => {
            return Err(OptimError::SparseGradient {
                param: param.display_name(),
            })
        }
    };

    let id = param.id();
    let moments = state.get_or_init(id, param.tensor())?;
    moments.step += 1;
    let scalars = StepScalars::<F>::new(config, moments.step);

    let MomentState {
        exp_avg, exp_avg_sq, ..
    } = moments;
    let exp_avg = exp_avg.as_mut_slice::<F>()?;
    let exp_avg_sq = exp_avg_sq.as_mut_slice::<F>()?;

    let tensor = param.tensor_mut();
    if tensor.dtype() == F::DTYPE {
        adamw_update(tensor.as_mut_slice::<F>()?, &grad, exp_avg, exp_avg_sq, &scalars);
    } else {
        // Narrower storage: widen, update, round back.
        let mut values: Vec<F> = tensor.to_vec();
        adamw_update(&mut values, &grad, exp_avg, exp_avg_sq, &scalars);
        tensor.assign(&values)?;
    }
    Ok(true)
}

impl Optimizer for AdamW {
    fn step(&mut self, params: &mut [Parameter]) -> Result<(), OptimError> {
        let index = self.index_params(params);
        self.check_step_inputs(params, &index)?;

        let AdamW {
            param_groups,
            configs,
            state,
            ..
        } = self;

        let mut updated = 0usize;
        for (group_idx, (group, config)) in param_groups.iter().zip(configs.iter()).enumerate() {
            for id in &group.params {
                let Some(&pos) = index.get(id) else {
                    continue;
                };
                let param = &mut params[pos];
                let applied = match param.dtype().compute_dtype() {
                    DType::F64 => update_param::<f64>(param, config, state)?,
                    _ => update_param::<f32>(param, config, state)?,
                };
                if applied {
                    updated += 1;
                } else {
                    trace!(
                        "AdamW: no gradient for {} in group {}, skipping",
                        param.display_name(),
                        group_idx
                    );
                }
            }
        }
        debug!("AdamW: step updated {} parameter(s)", updated);
        Ok(())
    }

    fn zero_grad(&self, params: &mut [Parameter]) {
        for param in params.iter_mut() {
            if self.membership.contains_key(&param.id()) {
                param.clear_grad();
            }
        }
    }

    fn param_groups(&self) -> &[ParamGroup] {
        &self.param_groups
    }

    fn state_dict(&self) -> Result<OptimizerState, OptimError> {
        Ok(OptimizerState::AdamW {
            param_groups: self.param_groups.clone(),
            state: self.state.entries().clone(),
        })
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState) -> Result<(), OptimError> {
        let OptimizerState::AdamW {
            param_groups,
            state,
        } = state_dict
        else {
            return Err(OptimError::StateDictMismatch(format!(
                "cannot load {} state into AdamW",
                state_dict.kind()
            )));
        };
        if param_groups.len() != self.param_groups.len() {
            return Err(OptimError::StateDictMismatch(format!(
                "state has {} param group(s), optimizer has {}",
                param_groups.len(),
                self.param_groups.len()
            )));
        }

        let resolved = resolve_groups(param_groups.iter().cloned().zip(&self.configs))?;
        for (id, moments) in state {
            moments.check_consistent().map_err(|e| {
                OptimError::StateDictMismatch(format!("moment state of {}: {}", id, e))
            })?;
        }

        self.param_groups = resolved.param_groups;
        self.configs = resolved.configs;
        self.membership = resolved.membership;
        self.state.replace(state.clone());
        debug!(
            "AdamW: loaded state for {} parameter(s)",
            self.state.len()
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "adamw_test.rs"]
mod tests;
