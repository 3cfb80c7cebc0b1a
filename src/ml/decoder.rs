// ============================================================
// Layer 5 — Decoder Block
// ============================================================
// One layer of the decoder stack. Three sublayers, each wrapped
// in Dropout → residual add → LayerNorm:
//
//   1. Masked self-attention over the target prefix
//        mask = causal  ∧  target padding
//   2. Cross-attention: queries from the decoder, keys/values
//      from the final encoder output ("memory")
//        mask = source padding (never causal)
//   3. Position-wise feed-forward
//
//   x ──► SelfAttn ──(+)─► LN ─► x1 ──► CrossAttn(x1, mem) ──(+)─► LN ─► x2 ──► FFN ──(+)─► LN ─► x3
//
// The causal mask is rebuilt on every call from the current
// target length; target lengths change from batch to batch and
// during incremental decoding.
//
// Reference: Vaswani et al. (2017) §3.1, §3.2.3

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
use crate::ml::mask::{
    check_padding_mask, decoder_self_attention_mask,
    to_attention_mask, to_key_padding_mask,
};

/// The two padding masks a decoder block may receive.
#[derive(Debug, Clone)]
pub struct DecoderMasks<B: Backend> {
    /// [batch, target_len], combined with the causal mask for self-attention
    pub target: Option<Tensor<B, 2, Int>>,
    /// [batch, source_len], hides encoder pad positions from cross-attention
    pub memory: Option<Tensor<B, 2, Int>>,
}

impl<B: Backend> DecoderMasks<B> {
    pub fn new(
        target: Option<Tensor<B, 2, Int>>,
        memory: Option<Tensor<B, 2, Int>>,
    ) -> Self {
        Self { target, memory }
    }

    pub fn none() -> Self {
        Self { target: None, memory: None }
    }

    /// Check each mask against `[batch, target_len]` / `[batch, source_len]`.
    pub fn check(&self, target: [usize; 2], memory: [usize; 2]) -> ModelResult<()> {
        if let Some(mask) = &self.target {
            check_padding_mask("decoder padding mask", mask, target)?;
        }
        if let Some(mask) = &self.memory {
            check_padding_mask("encoder padding mask", mask, memory)?;
        }
        Ok(())
    }
}

#[derive(Config, Debug)]
pub struct DecoderBlockConfig {
    pub embed_size:   usize,
    pub num_heads:    usize,
    pub ff_expansion: usize,
    #[config(default = 0.1)]
    pub dropout:      f64,
    #[config(default = 1e-6)]
    pub layer_norm_epsilon: f64,
}

impl DecoderBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<DecoderBlock<B>> {
        validate_block(self.embed_size, self.num_heads, self.ff_expansion, self.dropout)?;

        let attention = || -> MultiHeadAttention<B> {
            MultiHeadAttentionConfig::new(self.embed_size, self.num_heads)
                .with_dropout(0.0)
                .init(device)
        };
        let norm = || -> LayerNorm<B> {
            LayerNormConfig::new(self.embed_size)
                .with_epsilon(self.layer_norm_epsilon)
                .init(device)
        };
        let dropout = || DropoutConfig::new(self.dropout).init();

        Ok(DecoderBlock {
            self_attn:  attention(),
            cross_attn: attention(),
            norm1:      norm(),
            norm2:      norm(),
            norm3:      norm(),
            ffn:        FeedForwardConfig::new(self.embed_size, self.ff_expansion)
                .with_dropout(self.dropout)
                .init(device),
            dropout1:   dropout(),
            dropout2:   dropout(),
            dropout3:   dropout(),
            embed_size: self.embed_size,
        })
    }
}

#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    pub self_attn:  MultiHeadAttention<B>,
    pub cross_attn: MultiHeadAttention<B>,
    pub norm1:      LayerNorm<B>,
    pub norm2:      LayerNorm<B>,
    pub norm3:      LayerNorm<B>,
    pub ffn:        FeedForwardNetwork<B>,
    pub dropout1:   Dropout,
    pub dropout2:   Dropout,
    pub dropout3:   Dropout,
    pub embed_size: usize,
}

impl<B: Backend> DecoderBlock<B> {
    /// x: [batch, target_len, embed], encoder_output: [batch, source_len, embed]
    pub fn forward(
        &self,
        x:              Tensor<B, 3>,
        encoder_output: &Tensor<B, 3>,
        masks:          DecoderMasks<B>,
        ctx:            &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let [batch, seq_len, features] = x.dims();
        let [mem_batch, mem_len, mem_features] = encoder_output.dims();

        if features != self.embed_size {
            return Err(ModelError::FeatureSizeMismatch {
                what:     "decoder block input",
                expected: self.embed_size,
                actual:   features,
            });
        }
        if mem_features != self.embed_size {
            return Err(ModelError::FeatureSizeMismatch {
                what:     "encoder output",
                expected: self.embed_size,
                actual:   mem_features,
            });
        }
        if mem_batch != batch {
            return Err(ModelError::BatchSizeMismatch {
                what:     "encoder output",
                expected: batch,
                actual:   mem_batch,
            });
        }
        masks.check([batch, seq_len], [batch, mem_len])?;
        Ok(self.forward_checked(x, encoder_output, masks, ctx))
    }

    /// `forward` without the input checks; the Transformer validates
    /// its masks once and then runs every block through here.
    pub(crate) fn forward_checked(
        &self,
        x:              Tensor<B, 3>,
        encoder_output: &Tensor<B, 3>,
        masks:          DecoderMasks<B>,
        ctx:            &ForwardContext,
    ) -> Tensor<B, 3> {
        let [batch, seq_len, _] = x.dims();

        // ── 1. Masked self-attention ──────────────────────────────────────────
        let self_mask = decoder_self_attention_mask(masks.target, batch, seq_len, &x.device());
        let self_input = MhaInput::self_attn(x.clone()).mask_attn(to_attention_mask(self_mask));
        let self_output = self.self_attn.forward(self_input).context;
        let x1 = self.norm1.forward(x + ctx.dropout(&self.dropout1, self_output));

        // ── 2. Cross-attention over the encoder output ────────────────────────
        let mut cross_input = MhaInput::new(
            x1.clone(),
            encoder_output.clone(),
            encoder_output.clone(),
        );
        if let Some(mask) = masks.memory {
            cross_input = cross_input.mask_pad(to_key_padding_mask(mask));
        }
        let cross_output = self.cross_attn.forward(cross_input).context;
        let x2 = self.norm2.forward(x1 + ctx.dropout(&self.dropout2, cross_output));

        // ── 3. Feed-forward ───────────────────────────────────────────────────
        let ffn_output = self.ffn.forward(x2.clone(), ctx);
        self.norm3.forward(x2 + ctx.dropout(&self.dropout3, ffn_output))
    }
}
