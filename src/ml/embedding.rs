// ============================================================
// Layer 5 — Positional Embedding
// ============================================================
// Turns a batch of token ids into vectors that carry both
// WHAT the token is and WHERE it sits in the sequence:
//
//   ids [batch, seq]  ──►  content(id) + position(index)  ──►  [batch, seq, embed]
//
// Self-attention is permutation-invariant, so without the
// position term "dog bites man" and "man bites dog" would look
// identical to the encoder.
//
// Two position strategies share this one interface:
//
//   Learned     — a second Embedding table indexed by position
//                 0..max_seq_length-1, trained with the model
//   Sinusoidal  — the fixed encoding
//                   pe[p, 2i]   = sin(p / 10000^(2i/E))
//                   pe[p, 2i+1] = cos(p / 10000^(2i/E))
//                 computed for the current length on each call
//
// Padding ids are embedded like any other id. Keeping them out
// of the computation is the job of the attention masks.
//
// Reference: Vaswani et al. (2017) §3.5
//            Burn Book §3 (Building Blocks — Embedding)

use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
    tensor::TensorData,
};

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::config::PositionalEncodingKind;
use crate::ml::convert::int_range;

#[derive(Config, Debug)]
pub struct PositionalEmbeddingConfig {
    pub vocab_size:     usize,
    pub max_seq_length: usize,
    pub embed_size:     usize,
    #[config(default = "PositionalEncodingKind::Learned")]
    pub kind:           PositionalEncodingKind,
}

impl PositionalEmbeddingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PositionalEmbedding<B> {
        let token = EmbeddingConfig::new(self.vocab_size, self.embed_size).init(device);
        let position = match self.kind {
            PositionalEncodingKind::Learned => Some(
                EmbeddingConfig::new(self.max_seq_length, self.embed_size).init(device),
            ),
            PositionalEncodingKind::Sinusoidal => None,
        };
        PositionalEmbedding {
            token,
            position,
            vocab_size:     self.vocab_size,
            max_seq_length: self.max_seq_length,
            embed_size:     self.embed_size,
        }
    }
}

#[derive(Module, Debug)]
pub struct PositionalEmbedding<B: Backend> {
    pub token:          Embedding<B>,
    /// `None` selects the sinusoidal encoding
    pub position:       Option<Embedding<B>>,
    pub vocab_size:     usize,
    pub max_seq_length: usize,
    pub embed_size:     usize,
}

impl<B: Backend> PositionalEmbedding<B> {
    pub fn kind(&self) -> PositionalEncodingKind {
        match self.position {
            Some(_) => PositionalEncodingKind::Learned,
            None    => PositionalEncodingKind::Sinusoidal,
        }
    }

    /// ids: [batch, seq_len] → [batch, seq_len, embed_size]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> ModelResult<Tensor<B, 3>> {
        let [batch, seq_len] = ids.dims();
        self.check_ids(&ids)?;

        let device = ids.device();
        let content = self.token.forward(ids);

        let position = match &self.position {
            Some(table) => {
                let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
                    .unsqueeze::<2>()
                    .expand([batch, seq_len]);
                table.forward(positions)
            }
            None => sinusoidal_encoding::<B>(seq_len, self.embed_size, &device)
                .unsqueeze::<3>()
                .expand([batch, seq_len, self.embed_size]),
        };

        Ok(content + position)
    }

    fn check_ids(&self, ids: &Tensor<B, 2, Int>) -> ModelResult<()> {
        let [batch, seq_len] = ids.dims();
        if batch == 0 || seq_len == 0 {
            return Err(ModelError::EmptyInput { batch, seq_len });
        }
        if seq_len > self.max_seq_length {
            return Err(ModelError::SequenceTooLong { len: seq_len, max: self.max_seq_length });
        }

        let (min, max) = int_range(ids);
        if min < 0 {
            return Err(ModelError::TokenOutOfRange { id: min, vocab_size: self.vocab_size });
        }
        if max >= self.vocab_size as i64 {
            return Err(ModelError::TokenOutOfRange { id: max, vocab_size: self.vocab_size });
        }
        Ok(())
    }
}

/// Fixed `[seq_len, embed_size]` sine/cosine table.
/// Odd embedding sizes end on a sine column.
pub fn sinusoidal_encoding<B: Backend>(
    seq_len:    usize,
    embed_size: usize,
    device:     &B::Device,
) -> Tensor<B, 2> {
    let mut table = Vec::with_capacity(seq_len * embed_size);
    for pos in 0..seq_len {
        for i in 0..embed_size {
            let pair = (i / 2 * 2) as f32;
            let angle = pos as f32 / 10_000f32.powf(pair / embed_size as f32);
            table.push(if i % 2 == 0 { angle.sin() } else { angle.cos() });
        }
    }

    Tensor::from_data(
        TensorData::new(table, [seq_len, embed_size]).convert::<B::FloatElem>(),
        device,
    )
}
