// ============================================================
// Layer 4 — Seq2Seq Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<TranslationPair>
// into a Seq2SeqInput the Transformer can consume directly.
//
// Sentences in one batch rarely share a length, so each side is
// padded to its own longest row:
//
//   source  [5, 6, 7]      →  [5, 6, 7]     mask [1, 1, 1]
//           [8]            →  [8, 0, 0]     mask [1, 0, 0]
//
//   target  [1, 9]         →  [1, 9]        mask [1, 1]
//           [1, 4]         →  [1, 4]        mask [1, 1]
//
// Source and target are padded independently; their lengths
// never have to agree.
//
// Nothing is truncated. A sentence longer than max_seq_length
// makes the whole batch fail.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::error::{ModelError, ModelResult};
use crate::domain::translation_pair::TranslationPair;
use crate::ml::config::TransformerConfig;
use crate::ml::convert::token_tensor;
use crate::ml::model::Seq2SeqInput;

// ─── Seq2SeqBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct Seq2SeqBatcher<B: Backend> {
    /// The device to create tensors on
    pub device:          B::Device,
    pub pad_id:          u32,
    pub source_language: String,
    pub target_language: String,
    pub max_seq_length:  usize,
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn new(
        device:          B::Device,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        max_seq_length:  usize,
    ) -> Self {
        Self {
            device,
            pad_id: 0,
            source_language: source_language.into(),
            target_language: target_language.into(),
            max_seq_length,
        }
    }

    /// Batcher whose keys and length limit match a model config.
    pub fn for_config(cfg: &TransformerConfig, device: B::Device) -> Self {
        Self::new(
            device,
            cfg.source_language.clone(),
            cfg.target_language.clone(),
            cfg.max_seq_length,
        )
    }

    pub fn with_pad_id(mut self, pad_id: u32) -> Self {
        self.pad_id = pad_id;
        self
    }

    /// Pad `rows` to a common length, returning ids and a 1/0 mask.
    fn pad(&self, rows: Vec<&[u32]>) -> ModelResult<(Tensor<B, 2, Int>, Tensor<B, 2, Int>)> {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        if let Some(row) = rows.iter().find(|row| row.is_empty()) {
            return Err(ModelError::EmptyInput { batch: rows.len(), seq_len: row.len() });
        }
        if width > self.max_seq_length {
            return Err(ModelError::SequenceTooLong { len: width, max: self.max_seq_length });
        }

        let mut ids:  Vec<Vec<u32>> = Vec::with_capacity(rows.len());
        let mut mask: Vec<Vec<u32>> = Vec::with_capacity(rows.len());
        for row in rows {
            let pad = width - row.len();
            ids.push(row.iter().copied().chain(std::iter::repeat(self.pad_id).take(pad)).collect());
            mask.push(std::iter::repeat(1).take(row.len()).chain(std::iter::repeat(0).take(pad)).collect());
        }

        Ok((token_tensor(&ids, &self.device), token_tensor(&mask, &self.device)))
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// Output is a Result; a bad batch is reported, not panicked on.
impl<B: Backend> Batcher<TranslationPair, ModelResult<Seq2SeqInput<B>>> for Seq2SeqBatcher<B> {
    fn batch(&self, items: Vec<TranslationPair>) -> ModelResult<Seq2SeqInput<B>> {
        if items.is_empty() {
            return Err(ModelError::EmptyInput { batch: 0, seq_len: 0 });
        }

        let (source_ids, source_mask) =
            self.pad(items.iter().map(|pair| pair.source.as_slice()).collect())?;
        let (target_ids, target_mask) =
            self.pad(items.iter().map(|pair| pair.target.as_slice()).collect())?;

        tracing::debug!(
            "batched {} pairs: source {:?}, target {:?}",
            items.len(), source_ids.dims(), target_ids.dims(),
        );

        Ok(Seq2SeqInput::new()
            .with_tokens(self.source_language.clone(), source_ids)
            .with_tokens(self.target_language.clone(), target_ids)
            .with_encoder_padding_mask(source_mask)
            .with_decoder_padding_mask(target_mask))
    }
}
