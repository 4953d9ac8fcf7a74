use crate::error::OptimError;

/// Optimizer-level hyperparameters for [`AdamW`](crate::AdamW).
///
/// Also serves as the fallback for every [`ParamGroupOptions`](crate::ParamGroupOptions)
/// field a group leaves unset.
#[derive(Clone, Debug, PartialEq)]
pub struct AdamWConfig {
    /// Step size.
    pub lr: f64,
    /// Decay rates of the first and second moment averages.
    pub betas: (f64, f64),
    /// Denominator stabilizer.
    pub eps: f64,
    /// Decoupled decay coefficient, scaled by `lr` when applied.
    pub weight_decay: f64,
    /// Accepted and validated, but bias correction is applied whatever its
    /// value. See `AdamW::new`.
    pub correct_bias: bool,
}

impl Default for AdamWConfig {
    fn default() -> Self {
        AdamWConfig {
            lr: 1e-3,
            betas: (0.9, 0.999),
            eps: 1e-6,
            weight_decay: 0.0,
            correct_bias: true,
        }
    }
}

impl AdamWConfig {
    pub fn with_lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }

    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.betas = (beta1, beta2);
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_weight_decay(mut self, weight_decay: f64) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    pub fn with_correct_bias(mut self, correct_bias: bool) -> Self {
        self.correct_bias = correct_bias;
        self
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), OptimError> {
        validate_lr(self.lr)?;
        validate_beta(self.betas.0, 0)?;
        validate_beta(self.betas.1, 1)?;
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(OptimError::ConfigurationError(format!(
                "Invalid epsilon value: {} - should be >= 0.0",
                self.eps
            )));
        }
        if !self.weight_decay.is_finite() {
            return Err(OptimError::ConfigurationError(format!(
                "Invalid weight_decay value: {} - should be finite",
                self.weight_decay
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_lr(lr: f64) -> Result<(), OptimError> {
    if !lr.is_finite() || lr < 0.0 {
        return Err(OptimError::ConfigurationError(format!(
            "Invalid learning rate: {} - should be >= 0.0",
            lr
        )));
    }
    Ok(())
}

fn validate_beta(beta: f64, index: usize) -> Result<(), OptimError> {
    if !(0.0..1.0).contains(&beta) {
        return Err(OptimError::ConfigurationError(format!(
            "Invalid beta parameter at index {}: {} - should be in [0.0, 1.0[",
            index, beta
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AdamWConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.betas, (0.9, 0.999));
        assert_eq!(config.eps, 1e-6);
        assert!(config.correct_bias);
    }

    #[test]
    fn test_zero_lr_and_eps_allowed() {
        let config = AdamWConfig::default().with_lr(0.0).with_eps(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_decay_allowed() {
        let config = AdamWConfig::default().with_weight_decay(-0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad = [
            AdamWConfig::default().with_lr(-1e-3),
            AdamWConfig::default().with_lr(f64::NAN),
            AdamWConfig::default().with_betas(1.0, 0.999),
            AdamWConfig::default().with_betas(-0.1, 0.999),
            AdamWConfig::default().with_betas(0.9, 1.0),
            AdamWConfig::default().with_betas(0.9, f64::NAN),
            AdamWConfig::default().with_eps(-1e-8),
            AdamWConfig::default().with_weight_decay(f64::INFINITY),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(OptimError::ConfigurationError(_))),
                "expected rejection of {:?}",
                config
            );
        }
    }

    #[test]
    fn test_error_message_names_value() {
        let err = AdamWConfig::default()
            .with_betas(0.9, 1.5)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid beta parameter at index 1: 1.5 - should be in [0.0, 1.0["
        );
    }
}
