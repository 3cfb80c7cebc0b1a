// ============================================================
// Layer 5 — Model Configuration
// ============================================================
// Everything needed to build a Transformer, as one immutable
// value passed in at construction time.
//
// Required hyperparameters (positional arguments to ::new):
//   num_layers         — encoder blocks = decoder blocks = N
//   embed_size         — width of every token vector (d_model)
//   num_heads          — attention heads; must divide embed_size
//   ff_expansion       — feed-forward hidden size = embed_size * this
//   source_vocab_size  — ids accepted on the encoder side
//   target_vocab_size  — ids accepted on the decoder side and the
//                        width of the output distribution
//   max_seq_length     — longest sequence either side may have
//   source_language    — key of the source tensor in the input map
//   target_language    — key of the target tensor in the input map
//
// Optional (with_* builders):
//   dropout              default 0.1
//   positional_encoding  default Learned
//   layer_norm_epsilon   default 1e-6
//
// #[derive(Config)] gives us Clone, serde and JSON save/load,
// so a config can be written next to a run and rebuilt later.
//
// Reference: Burn Book §3 (Config)

use burn::prelude::*;

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::model::Transformer;

/// How position information is added to token embeddings.
#[derive(Config, Debug, PartialEq)]
pub enum PositionalEncodingKind {
    /// A trainable `max_seq_length × embed_size` table
    Learned,
    /// The fixed sine/cosine encoding from Vaswani et al.
    Sinusoidal,
}

#[derive(Config, Debug)]
pub struct TransformerConfig {
    pub num_layers:        usize,
    pub embed_size:        usize,
    pub num_heads:         usize,
    pub ff_expansion:      usize,
    pub source_vocab_size: usize,
    pub target_vocab_size: usize,
    pub max_seq_length:    usize,
    pub source_language:   String,
    pub target_language:   String,
    #[config(default = 0.1)]
    pub dropout:           f64,
    #[config(default = "PositionalEncodingKind::Learned")]
    pub positional_encoding: PositionalEncodingKind,
    #[config(default = 1e-6)]
    pub layer_norm_epsilon: f64,
}

impl TransformerConfig {
    /// Check every field before any weights are allocated.
    pub fn validate(&self) -> ModelResult<()> {
        let sizes = [
            ("num_layers",        self.num_layers),
            ("source_vocab_size", self.source_vocab_size),
            ("target_vocab_size", self.target_vocab_size),
            ("max_seq_length",    self.max_seq_length),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(ModelError::ZeroSized(name));
            }
        }
        validate_block(self.embed_size, self.num_heads, self.ff_expansion, self.dropout)
    }

    /// Validate, then build the model on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<Transformer<B>> {
        self.validate()?;
        Transformer::build(self, device)
    }
}

/// Checks shared by every block config.
pub(crate) fn validate_block(
    embed_size:   usize,
    num_heads:    usize,
    ff_expansion: usize,
    dropout:      f64,
) -> ModelResult<()> {
    if embed_size == 0 {
        return Err(ModelError::ZeroSized("embed_size"));
    }
    if num_heads == 0 {
        return Err(ModelError::ZeroSized("num_heads"));
    }
    if ff_expansion == 0 {
        return Err(ModelError::ZeroSized("ff_expansion"));
    }
    if embed_size % num_heads != 0 {
        return Err(ModelError::HeadsDoNotDivide { embed_size, num_heads });
    }
    if !(0.0..1.0).contains(&dropout) {
        return Err(ModelError::InvalidDropout(dropout));
    }
    Ok(())
}
