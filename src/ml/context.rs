// ============================================================
// Layer 5 — Forward Context
// ============================================================
// The execution mode of one forward pass, passed explicitly to
// every component instead of living as a hidden flag on the
// modules themselves.
//
// Only one thing depends on it today: dropout. In training mode
// activations are zeroed with probability p and the survivors
// scaled by 1 / (1 - p); in inference mode dropout is the
// identity, which makes the whole pass deterministic.
//
// Burn's own Dropout::forward decides by looking at whether the
// backend records gradients. Here the Dropout module only holds
// p; whether it fires is decided by the context.
//
// Reference: Srivastava et al. (2014) Dropout
//            Burn Book §3 (Modules)

use burn::{
    nn::Dropout,
    prelude::*,
    tensor::Distribution,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardContext {
    /// true while the caller is training (dropout active)
    pub training: bool,
}

impl ForwardContext {
    pub const fn inference() -> Self {
        Self { training: false }
    }

    pub const fn training() -> Self {
        Self { training: true }
    }

    /// Apply `layer` to `x` according to this context.
    pub fn dropout<B: Backend, const D: usize>(
        &self,
        layer: &Dropout,
        x:     Tensor<B, D>,
    ) -> Tensor<B, D> {
        if !self.training || layer.prob == 0.0 {
            return x;
        }
        let keep = 1.0 - layer.prob;
        let mask = x.random_like(Distribution::Bernoulli(keep));
        (x * mask).div_scalar(keep)
    }
}
