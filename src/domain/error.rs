// ============================================================
// Layer 3 — Model Errors
// ============================================================
// Every failure the model core can report, grouped the same way
// callers have to react to them:
//
//   Shape / range   — sequence too long, token id outside the
//                     vocabulary, batch sizes that disagree,
//                     empty batches
//   Configuration   — head count not dividing the embedding size,
//                     zero-sized fields, dropout outside [0, 1)
//   Mask            — a padding mask whose shape or values do not
//                     match the token tensor it belongs to
//
// None of these are transient: a failed check is a programming
// error on the caller's side, so nothing here is retried.
//
// Reference: thiserror crate documentation

use thiserror::Error;

/// Convenience alias used across the model layer.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    // ── Shape / range ─────────────────────────────────────────────────────────
    #[error("sequence length {len} exceeds max_seq_length {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("token id {id} is outside the vocabulary range [0, {vocab_size})")]
    TokenOutOfRange { id: i64, vocab_size: usize },

    #[error("{what}: expected batch size {expected}, got {actual}")]
    BatchSizeMismatch {
        what:     &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("{what}: expected feature size {expected}, got {actual}")]
    FeatureSizeMismatch {
        what:     &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("empty input: batch={batch}, seq_len={seq_len}")]
    EmptyInput { batch: usize, seq_len: usize },

    #[error("no token tensor for language '{0}' in the forward input")]
    MissingLanguage(String),

    // ── Configuration ─────────────────────────────────────────────────────────
    #[error("config field '{0}' must be greater than zero")]
    ZeroSized(&'static str),

    #[error("embed_size {embed_size} is not divisible by num_heads {num_heads}")]
    HeadsDoNotDivide { embed_size: usize, num_heads: usize },

    #[error("dropout rate {0} is outside [0, 1)")]
    InvalidDropout(f64),

    // ── Mask ──────────────────────────────────────────────────────────────────
    #[error("{what}: mask shape {actual:?} does not match token shape {expected:?}")]
    MaskShapeMismatch {
        what:     &'static str,
        expected: [usize; 2],
        actual:   [usize; 2],
    },

    #[error("{what}: mask values must be 0 or 1, found range [{min}, {max}]")]
    InvalidMaskValue {
        what: &'static str,
        min:  i64,
        max:  i64,
    },

    // ── Engine ────────────────────────────────────────────────────────────────
    #[error("could not read tensor data: {0}")]
    TensorData(String),
}

impl ModelError {
    /// True for errors raised while validating a configuration,
    /// as opposed to errors raised by a forward pass.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ModelError::ZeroSized(_)
                | ModelError::HeadsDoNotDivide { .. }
                | ModelError::InvalidDropout(_)
        )
    }
}
