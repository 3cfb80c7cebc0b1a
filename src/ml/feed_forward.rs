// ============================================================
// Layer 5 — Position-wise Feed-Forward Network
// ============================================================
// The same two-layer MLP applied independently at every position:
//
//   [batch, seq, E] ─ Linear(E → E·k) ─ ReLU ─ Linear(E·k → E) ─ Dropout ─► [batch, seq, E]
//
// where k = ff_expansion. The output width equals the input
// width so the calling block can add it back as a residual.
//
// Reference: Vaswani et al. (2017) §3.3

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};

use crate::ml::context::ForwardContext;

#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    pub embed_size:   usize,
    pub ff_expansion: usize,
    #[config(default = 0.1)]
    pub dropout:      f64,
}

impl FeedForwardConfig {
    pub fn hidden_size(&self) -> usize {
        self.embed_size * self.ff_expansion
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> FeedForwardNetwork<B> {
        FeedForwardNetwork {
            expand:   LinearConfig::new(self.embed_size, self.hidden_size()).init(device),
            contract: LinearConfig::new(self.hidden_size(), self.embed_size).init(device),
            dropout:  DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForwardNetwork<B: Backend> {
    pub expand:   Linear<B>,
    pub contract: Linear<B>,
    pub dropout:  Dropout,
}

impl<B: Backend> FeedForwardNetwork<B> {
    pub fn forward(&self, x: Tensor<B, 3>, ctx: &ForwardContext) -> Tensor<B, 3> {
        let hidden = activation::relu(self.expand.forward(x));
        ctx.dropout(&self.dropout, self.contract.forward(hidden))
    }
}
