// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// The domain layer only sees plain ids and ModelError.
//
// What's in this layer, bottom-up:
//
//   config.rs       — TransformerConfig + validation
//   context.rs      — ForwardContext (training vs inference)
//   convert.rs      — host ↔ tensor helpers
//   mask.rs         — causal / padding masks and their combination
//   embedding.rs    — token + positional embedding (learned or sinusoidal)
//   feed_forward.rs — position-wise two-layer MLP
//   encoder.rs      — EncoderBlock: self-attention + FFN
//   decoder.rs      — DecoderBlock: masked self-attention + cross-attention + FFN
//   model.rs        — the full encoder-decoder Transformer
//   inferencer.rs   — greedy autoregressive decoding
//
// Attention itself is burn's MultiHeadAttention; this layer
// only decides what it may look at.
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need

/// Hyperparameters and validation
pub mod config;

/// Explicit training / inference mode
pub mod context;

/// Tensor ↔ Vec helpers
pub mod convert;

pub mod mask;

/// Token + position embedding
pub mod embedding;

pub mod feed_forward;

pub mod encoder;

pub mod decoder;

/// Encoder-decoder Transformer
pub mod model;

/// Greedy decoding on top of a Transformer
pub mod inferencer;
