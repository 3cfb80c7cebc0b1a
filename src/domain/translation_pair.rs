// ============================================================
// Layer 3 — TranslationPair Domain Type
// ============================================================
// One already-tokenised training or inference example:
//   - a source sentence as token ids (e.g. English)
//   - a target sentence as token ids (e.g. Icelandic)
//
// Tokenisation happens outside this crate. By the time a pair
// reaches us every entry is a plain vocabulary index; the two
// sides may have different lengths and different vocabularies.
//
// Example:
//   source: [1, 57, 903, 12, 2]      "<s> the cat sat </s>"
//   target: [1, 88, 411, 2]          "<s> kötturinn sat </s>"
//
// Reference: Vaswani et al. (2017) Attention Is All You Need
//            Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// A tokenised source/target sentence pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPair {
    /// Token ids of the sentence being translated
    pub source: Vec<u32>,

    /// Token ids of the reference translation
    /// (for inference this is usually just the BOS token)
    pub target: Vec<u32>,
}

impl TranslationPair {
    /// Create a new TranslationPair
    pub fn new(source: Vec<u32>, target: Vec<u32>) -> Self {
        Self { source, target }
    }
}
