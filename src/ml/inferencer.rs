// ============================================================
// Layer 5 — Greedy Inferencer
// ============================================================
// Turns a trained (or freshly initialised) Transformer into a
// translator by feeding its own predictions back in:
//
//   1. encode the source once                      → memory
//   2. target = [bos]
//   3. loop:
//        decode(target, memory) → project → argmax of the LAST position
//        append the winner to every row still running
//        rows that already emitted eos are padded with eos
//      until every row has emitted eos, or max_len tokens exist
//   4. cut each row right after its first eos
//
// The causal mask is what makes this valid: position t never saw
// tokens after t during training, so re-running the prefix gives
// the same prediction the full pass would.
//
// Dropout is always off here.
//
// Reference: Vaswani et al. (2017) §6.1 (beam size 1)

use burn::prelude::*;

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::context::ForwardContext;
use crate::ml::convert::{read_ints, token_tensor};
use crate::ml::decoder::DecoderMasks;
use crate::ml::model::Transformer;

#[derive(Config, Debug)]
pub struct GreedyDecoderConfig {
    /// Longest output, including bos. Capped at the model's max_seq_length.
    pub max_len: usize,
    #[config(default = 1)]
    pub bos_id:  u32,
    #[config(default = 2)]
    pub eos_id:  u32,
}

impl GreedyDecoderConfig {
    pub fn init(&self) -> GreedyDecoder {
        GreedyDecoder {
            bos_id:  self.bos_id,
            eos_id:  self.eos_id,
            max_len: self.max_len,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GreedyDecoder {
    bos_id:  u32,
    eos_id:  u32,
    max_len: usize,
}

impl GreedyDecoder {
    /// source_ids: [batch, source_len] → one id vector per row, starting with bos.
    pub fn decode<B: Backend>(
        &self,
        model:                &Transformer<B>,
        source_ids:           Tensor<B, 2, Int>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
    ) -> ModelResult<Vec<Vec<u32>>> {
        let max_len = self.max_len.min(model.max_seq_length());
        if max_len == 0 {
            return Err(ModelError::ZeroSized("max_len"));
        }
        let vocab_size = model.target_vocab_size();
        for id in [self.bos_id, self.eos_id] {
            if id as usize >= vocab_size {
                return Err(ModelError::TokenOutOfRange { id: i64::from(id), vocab_size });
            }
        }

        let ctx    = ForwardContext::inference();
        let device = source_ids.device();
        let [batch, _] = source_ids.dims();

        // ── Encode once (this also validates the encoder mask) ────────────────
        let memory = model.encode(source_ids, encoder_padding_mask.clone(), &ctx)?;

        let mut rows     = vec![vec![self.bos_id]; batch];
        let mut finished = vec![false; batch];
        let mut len      = 1;

        // ── Extend the prefix one token at a time ─────────────────────────────
        while len < max_len && !finished.iter().all(|done| *done) {
            let target = token_tensor::<B>(&rows, &device);
            let masks  = DecoderMasks::new(None, encoder_padding_mask.clone());
            let hidden = model.decode_checked(target, &memory, masks, &ctx)?;
            let [_, _, embed] = hidden.dims();
            let last   = hidden.slice([0..batch, len - 1..len, 0..embed]);
            let next   = read_ints(model.project(last).argmax(2))?;

            for ((row, done), id) in rows.iter_mut().zip(finished.iter_mut()).zip(next) {
                let id = if *done {
                    self.eos_id
                } else {
                    u32::try_from(id)
                        .map_err(|_| ModelError::TokenOutOfRange { id, vocab_size })?
                };
                *done |= id == self.eos_id;
                row.push(id);
            }
            len += 1;

            tracing::debug!(
                "greedy step {len}/{max_len}: {} of {batch} rows finished",
                finished.iter().filter(|done| **done).count(),
            );
        }

        Ok(rows
            .into_iter()
            .map(|row| trim_after_eos(row, self.eos_id))
            .collect())
    }
}

/// Drop everything after the first eos that follows the leading bos.
fn trim_after_eos(mut row: Vec<u32>, eos_id: u32) -> Vec<u32> {
    if let Some(pos) = row.iter().skip(1).position(|&id| id == eos_id) {
        row.truncate(pos + 2);
    }
    row
}
