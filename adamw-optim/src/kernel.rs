// Elementwise AdamW update
//
//   m     = β1·m + (1 − β1)·g
//   v     = β2·v + (1 − β2)·g²
//   m̂     = m / (1 − β1^t)
//   v̂     = v / (1 − β2^t)
//   θ     = θ − lr·m̂ / (√v̂ + ε)
//   θ     = θ − lr·λ·θ            (only when λ ≠ 0)
//
// m̂ and v̂ are per-element temporaries; only m and v persist.

use adamw_core::ComputeElement;

use crate::config::AdamWConfig;
use crate::state::bias_corrections;

/// Scalars of one update, converted to the compute type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepScalars<F> {
    pub lr: F,
    pub beta1: F,
    pub beta2: F,
    pub eps: F,
    pub weight_decay: F,
    pub bias_correction1: F,
    pub bias_correction2: F,
}

impl<F: ComputeElement> StepScalars<F> {
    /// Scalars for the update that brings a parameter to step `step` (≥ 1).
    pub fn new(config: &AdamWConfig, step: u64) -> Self {
        let (beta1, beta2) = config.betas;
        let (bc1, bc2) = bias_corrections(beta1, beta2, step);
        StepScalars {
            lr: F::from_f64(config.lr),
            beta1: F::from_f64(beta1),
            beta2: F::from_f64(beta2),
            eps: F::from_f64(config.eps),
            weight_decay: F::from_f64(config.weight_decay),
            bias_correction1: F::from_f64(bc1),
            bias_correction2: F::from_f64(bc2),
        }
    }
}

/// Applies one AdamW update in place.
///
/// All four slices have the parameter's element count.
pub(crate) fn adamw_update<F: ComputeElement>(
    param: &mut [F],
    grad: &[F],
    exp_avg: &mut [F],
    exp_avg_sq: &mut [F],
    s: &StepScalars<F>,
) {
    debug_assert_eq!(param.len(), grad.len());
    debug_assert_eq!(param.len(), exp_avg.len());
    debug_assert_eq!(param.len(), exp_avg_sq.len());

    let one = F::one();
    let zero = F::zero();
    let decay = s.weight_decay != zero;

    for (((p, &g), m), v) in param
        .iter_mut()
        .zip(grad)
        .zip(exp_avg.iter_mut())
        .zip(exp_avg_sq.iter_mut())
    {
        *m = s.beta1 * *m + (one - s.beta1) * g;
        *v = s.beta2 * *v + (one - s.beta2) * g * g;

        let m_hat = *m / s.bias_correction1;
        let v_hat = *v / s.bias_correction2;
        let denom = v_hat.sqrt() + s.eps;
        // 0 / 0 (eps = 0, nothing accumulated yet) leaves p alone. A zero
        // denominator under a nonzero m̂, as when g² underflows, still
        // produces ±inf.
        if !(denom == zero && m_hat == zero) {
            *p = *p - s.lr * m_hat / denom;
        }

        if decay {
            *p = *p - s.lr * s.weight_decay * *p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scalars(config: &AdamWConfig, step: u64) -> StepScalars<f64> {
        StepScalars::new(config, step)
    }

    #[test]
    fn test_single_scalar_first_step() {
        let config = AdamWConfig::default().with_lr(1e-3);
        let mut p = [1.0f64];
        let mut m = [0.0f64];
        let mut v = [0.0f64];
        adamw_update(&mut p, &[0.1], &mut m, &mut v, &scalars(&config, 1));

        assert_relative_eq!(m[0], 0.01, epsilon = 1e-12);
        assert_relative_eq!(v[0], 1e-5, epsilon = 1e-12);
        // m̂ = 0.1, v̂ = 0.01, √v̂ = 0.1
        assert_relative_eq!(p[0], 1.0 - 1e-3 * 0.1 / (0.1 + 1e-6), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_eps_zero_grad_is_noop() {
        let config = AdamWConfig::default().with_eps(0.0);
        let mut p = [2.0f32, -3.0];
        let mut m = [0.0f32; 2];
        let mut v = [0.0f32; 2];
        adamw_update(&mut p, &[0.0, 0.0], &mut m, &mut v, &StepScalars::new(&config, 1));
        assert_eq!(p, [2.0, -3.0]);
    }

    #[test]
    fn test_zero_eps_underflowing_second_moment_diverges() {
        let config = AdamWConfig::default().with_eps(0.0);
        let mut p = [1.0f32];
        let mut m = [0.0f32];
        let mut v = [0.0f32];
        // g² underflows to 0 in f32 while g itself does not.
        adamw_update(&mut p, &[1e-30], &mut m, &mut v, &StepScalars::new(&config, 1));
        assert_eq!(v[0], 0.0);
        assert!(m[0] > 0.0);
        assert_eq!(p[0], f32::NEG_INFINITY);
    }

    #[test]
    fn test_weight_decay_applies_after_gradient_update() {
        let config = AdamWConfig::default().with_lr(0.1).with_weight_decay(0.5);
        let mut p = [1.0f64];
        let mut m = [0.0f64];
        let mut v = [0.0f64];
        adamw_update(&mut p, &[1.0], &mut m, &mut v, &scalars(&config, 1));

        let after_grad = 1.0 - 0.1 * 1.0 / (1.0 + 1e-6);
        let expected = after_grad - 0.1 * 0.5 * after_grad;
        assert_relative_eq!(p[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_bias_correction_factors() {
        let config = AdamWConfig::default();
        let s = scalars(&config, 2);
        assert_relative_eq!(s.bias_correction1, 1.0 - 0.81, epsilon = 1e-12);
        assert_relative_eq!(s.bias_correction2, 1.0 - 0.999 * 0.999, epsilon = 1e-12);
    }
}
