#![recursion_limit = "256"]

// ============================================================
// seq2seq-transformer
// ============================================================
// Encoder-decoder Transformer (Vaswani et al., 2017) on Burn.
//
//   domain/  — plain types: TranslationPair, ModelError
//   data/    — batching pairs into padded, masked tensors
//   ml/      — every Burn component, up to the full Transformer
//              and a greedy decoder
//
// The `seq2seq` binary in main.rs is a thin CLI on top.

pub mod data;
pub mod domain;
pub mod ml;

pub use data::batcher::Seq2SeqBatcher;
pub use domain::error::{ModelError, ModelResult};
pub use domain::translation_pair::TranslationPair;
pub use ml::config::{PositionalEncodingKind, TransformerConfig};
pub use ml::context::ForwardContext;
pub use ml::inferencer::{GreedyDecoder, GreedyDecoderConfig};
pub use ml::model::{Seq2SeqInput, Transformer};
