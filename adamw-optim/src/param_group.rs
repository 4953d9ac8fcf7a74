use adamw_core::ParamId;

use crate::config::AdamWConfig;

/// Defines a group of parameters with specific optimizer hyperparameters.
///
/// This allows applying different settings (like learning rate or weight decay)
/// to different parts of a model. Groups hold parameter identities only; the
/// parameters themselves stay with the caller and are lent to each `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamGroup {
    /// The parameters included in this group, in update order.
    pub params: Vec<ParamId>,

    /// Specific options/hyperparameters for this group.
    pub options: ParamGroupOptions,
}

/// Per-group overrides. `None` falls back to the optimizer-level
/// [`AdamWConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamGroupOptions {
    pub lr: Option<f64>,
    pub betas: Option<(f64, f64)>,
    pub eps: Option<f64>,
    pub weight_decay: Option<f64>,
    pub correct_bias: Option<bool>,
}

impl ParamGroupOptions {
    /// Fills every unset option from `defaults`.
    pub fn resolve(&self, defaults: &AdamWConfig) -> AdamWConfig {
        AdamWConfig {
            lr: self.lr.unwrap_or(defaults.lr),
            betas: self.betas.unwrap_or(defaults.betas),
            eps: self.eps.unwrap_or(defaults.eps),
            weight_decay: self.weight_decay.unwrap_or(defaults.weight_decay),
            correct_bias: self.correct_bias.unwrap_or(defaults.correct_bias),
        }
    }
}

impl From<&AdamWConfig> for ParamGroupOptions {
    fn from(config: &AdamWConfig) -> Self {
        ParamGroupOptions {
            lr: Some(config.lr),
            betas: Some(config.betas),
            eps: Some(config.eps),
            weight_decay: Some(config.weight_decay),
            correct_bias: Some(config.correct_bias),
        }
    }
}

impl ParamGroup {
    /// Creates a new parameter group with default options.
    pub fn new(params: impl IntoIterator<Item = ParamId>) -> Self {
        ParamGroup {
            params: params.into_iter().collect(),
            options: ParamGroupOptions::default(),
        }
    }

    pub fn with_lr(mut self, lr: f64) -> Self {
        self.options.lr = Some(lr);
        self
    }

    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.options.betas = Some((beta1, beta2));
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.options.eps = Some(eps);
        self
    }

    pub fn with_weight_decay(mut self, weight_decay: f64) -> Self {
        self.options.weight_decay = Some(weight_decay);
        self
    }

    pub fn with_correct_bias(mut self, correct_bias: bool) -> Self {
        self.options.correct_bias = Some(correct_bias);
        self
    }

    pub fn contains(&self, id: ParamId) -> bool {
        self.params.contains(&id)
    }

    pub fn get_lr(&self) -> Option<f64> {
        self.options.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adamw_core::{DType, Parameter};
    use adamw_core::tensor::zeros;

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        let defaults = AdamWConfig::default().with_weight_decay(0.01);
        let options = ParamGroupOptions {
            lr: Some(0.1),
            ..Default::default()
        };
        let resolved = options.resolve(&defaults);
        assert_eq!(resolved.lr, 0.1);
        assert_eq!(resolved.weight_decay, 0.01);
        assert_eq!(resolved.betas, defaults.betas);
    }

    #[test]
    fn test_builder_and_contains() {
        let p = Parameter::new_unnamed(zeros(&[1], DType::F32).unwrap());
        let other = Parameter::new_unnamed(zeros(&[1], DType::F32).unwrap());
        let group = ParamGroup::new([p.id()]).with_lr(0.5).with_correct_bias(false);
        assert!(group.contains(p.id()));
        assert!(!group.contains(other.id()));
        assert_eq!(group.get_lr(), Some(0.5));
        assert_eq!(group.options.correct_bias, Some(false));
    }
}
