// ============================================================
// Layer 5 — Encoder Block
// ============================================================
// One layer of the encoder stack (post-norm, as in the paper):
//
//   x ─┬─► MultiHeadAttention(x, x, x, padding) ─► Dropout ─┐
//      └──────────────────────────────────────────────────(+)─► LayerNorm ─► x1
//
//   x1 ─┬─► FeedForward ─► Dropout ─┐
//       └─────────────────────────(+)─► LayerNorm ─► x2
//
// The padding mask is given per batch item as [batch, seq] and
// applied to every query row, so pad positions never act as
// keys. Pad rows still produce output; the caller ignores them.
//
// Reference: Vaswani et al. (2017) §3.1
//            Burn Book §3 (Building Blocks — MultiHeadAttention)

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
    },
    prelude::*,
};

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::config::validate_block;
use crate::ml::context::ForwardContext;
use crate::ml::feed_forward::{FeedForwardConfig, FeedForwardNetwork};
use crate::ml::mask::{check_padding_mask, to_key_padding_mask};

#[derive(Config, Debug)]
pub struct EncoderBlockConfig {
    pub embed_size:   usize,
    pub num_heads:    usize,
    pub ff_expansion: usize,
    #[config(default = 0.1)]
    pub dropout:      f64,
    #[config(default = 1e-6)]
    pub layer_norm_epsilon: f64,
}

impl EncoderBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<EncoderBlock<B>> {
        validate_block(self.embed_size, self.num_heads, self.ff_expansion, self.dropout)?;

        // Attention-weight dropout stays off; dropout is applied to the
        // sublayer output below, under the caller's ForwardContext.
        let self_attn = MultiHeadAttentionConfig::new(self.embed_size, self.num_heads)
            .with_dropout(0.0)
            .init(device);
        let norm = || -> LayerNorm<B> {
            LayerNormConfig::new(self.embed_size)
                .with_epsilon(self.layer_norm_epsilon)
                .init(device)
        };
        let ffn = FeedForwardConfig::new(self.embed_size, self.ff_expansion)
            .with_dropout(self.dropout)
            .init(device);

        Ok(EncoderBlock {
            self_attn,
            norm1:      norm(),
            norm2:      norm(),
            ffn,
            dropout1:   DropoutConfig::new(self.dropout).init(),
            dropout2:   DropoutConfig::new(self.dropout).init(),
            embed_size: self.embed_size,
        })
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:  MultiHeadAttention<B>,
    pub norm1:      LayerNorm<B>,
    pub norm2:      LayerNorm<B>,
    pub ffn:        FeedForwardNetwork<B>,
    pub dropout1:   Dropout,
    pub dropout2:   Dropout,
    pub embed_size: usize,
}

impl<B: Backend> EncoderBlock<B> {
    /// x: [batch, seq, embed], padding_mask: [batch, seq] (1 = token, 0 = pad)
    pub fn forward(
        &self,
        x:            Tensor<B, 3>,
        padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:          &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let [batch, seq_len, features] = x.dims();
        if features != self.embed_size {
            return Err(ModelError::FeatureSizeMismatch {
                what:     "encoder block input",
                expected: self.embed_size,
                actual:   features,
            });
        }
        if let Some(mask) = &padding_mask {
            check_padding_mask("encoder padding mask", mask, [batch, seq_len])?;
        }
        Ok(self.forward_checked(x, padding_mask, ctx))
    }

    /// `forward` without the input checks; the Transformer validates
    /// its masks once and then runs every block through here.
    pub(crate) fn forward_checked(
        &self,
        x:            Tensor<B, 3>,
        padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:          &ForwardContext,
    ) -> Tensor<B, 3> {
        let mut attn_input = MhaInput::self_attn(x.clone());
        if let Some(mask) = padding_mask {
            attn_input = attn_input.mask_pad(to_key_padding_mask(mask));
        }

        let attn_output = self.self_attn.forward(attn_input).context;
        let x1 = self.norm1.forward(x + ctx.dropout(&self.dropout1, attn_output));

        let ffn_output = self.ffn.forward(x1.clone(), ctx);
        self.norm2.forward(x1 + ctx.dropout(&self.dropout2, ffn_output))
    }
}
