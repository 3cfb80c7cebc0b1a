// ============================================================
// Layer 5 — Encoder-Decoder Transformer
// ============================================================
// Wires every other ml/ component into the full model:
//
//   source ids ─► PositionalEmbedding ─► Dropout ─► EncoderBlock × N ─┐
//                                                                      │ memory (read-only,
//                                                                      │ shared by every
//                                                                      ▼ decoder block)
//   target ids ─► PositionalEmbedding ─► Dropout ─► DecoderBlock × N ─► Linear ─► softmax
//
// Output: [batch, target_len, target_vocab_size], one probability
// distribution over the target vocabulary per target position.
//
// The forward pass is split into encode() and decode() so the
// inferencer can run the encoder once and the decoder many times.
//
// Input checks happen here, at the model boundary, before any
// computation: batch sizes, mask shapes, sequence lengths and
// token ranges. Nothing is truncated or wrapped.
//
// Reference: Vaswani et al. (2017) Attention Is All You Need
//            Burn Book §3 (Building Blocks)

use std::collections::HashMap;

use burn::{
    module::Ignored,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::config::TransformerConfig;
use crate::ml::context::ForwardContext;
use crate::ml::decoder::{DecoderBlock, DecoderBlockConfig, DecoderMasks};
use crate::ml::embedding::{PositionalEmbedding, PositionalEmbeddingConfig};
use crate::ml::encoder::{EncoderBlock, EncoderBlockConfig};
use crate::ml::inferencer::GreedyDecoderConfig;
use crate::ml::mask::check_padding_mask;

/// Which key of a `Seq2SeqInput` holds which side of the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

// ─── Forward input ────────────────────────────────────────────────────────────
/// Token tensors keyed by language identifier, plus optional
/// padding masks (1 = token, 0 = pad).
#[derive(Debug, Clone)]
pub struct Seq2SeqInput<B: Backend> {
    pub tokens:               HashMap<String, Tensor<B, 2, Int>>,
    pub encoder_padding_mask: Option<Tensor<B, 2, Int>>,
    pub decoder_padding_mask: Option<Tensor<B, 2, Int>>,
}

impl<B: Backend> Seq2SeqInput<B> {
    pub fn new() -> Self {
        Self {
            tokens:               HashMap::new(),
            encoder_padding_mask: None,
            decoder_padding_mask: None,
        }
    }

    pub fn with_tokens(mut self, language: impl Into<String>, ids: Tensor<B, 2, Int>) -> Self {
        self.tokens.insert(language.into(), ids);
        self
    }

    pub fn with_encoder_padding_mask(mut self, mask: Tensor<B, 2, Int>) -> Self {
        self.encoder_padding_mask = Some(mask);
        self
    }

    pub fn with_decoder_padding_mask(mut self, mask: Tensor<B, 2, Int>) -> Self {
        self.decoder_padding_mask = Some(mask);
        self
    }

    fn get(&self, language: &str) -> ModelResult<Tensor<B, 2, Int>> {
        self.tokens
            .get(language)
            .cloned()
            .ok_or_else(|| ModelError::MissingLanguage(language.to_string()))
    }
}

impl<B: Backend> Default for Seq2SeqInput<B> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Model ────────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    pub source_embedding: PositionalEmbedding<B>,
    pub target_embedding: PositionalEmbedding<B>,
    pub source_dropout:   Dropout,
    pub target_dropout:   Dropout,
    pub encoder_layers:   Vec<EncoderBlock<B>>,
    pub decoder_layers:   Vec<DecoderBlock<B>>,
    pub final_linear:     Linear<B>,
    pub languages:        Ignored<LanguagePair>,
}

impl<B: Backend> Transformer<B> {
    /// Build from an already validated config.
    pub(crate) fn build(cfg: &TransformerConfig, device: &B::Device) -> ModelResult<Self> {
        let embedding = |vocab_size: usize| -> PositionalEmbedding<B> {
            PositionalEmbeddingConfig::new(vocab_size, cfg.max_seq_length, cfg.embed_size)
                .with_kind(cfg.positional_encoding.clone())
                .init(device)
        };
        let encoder_cfg = EncoderBlockConfig::new(cfg.embed_size, cfg.num_heads, cfg.ff_expansion)
            .with_dropout(cfg.dropout)
            .with_layer_norm_epsilon(cfg.layer_norm_epsilon);
        let decoder_cfg = DecoderBlockConfig::new(cfg.embed_size, cfg.num_heads, cfg.ff_expansion)
            .with_dropout(cfg.dropout)
            .with_layer_norm_epsilon(cfg.layer_norm_epsilon);

        let encoder_layers = (0..cfg.num_layers)
            .map(|_| encoder_cfg.init(device))
            .collect::<ModelResult<Vec<_>>>()?;
        let decoder_layers = (0..cfg.num_layers)
            .map(|_| decoder_cfg.init(device))
            .collect::<ModelResult<Vec<_>>>()?;

        let model = Transformer {
            source_embedding: embedding(cfg.source_vocab_size),
            target_embedding: embedding(cfg.target_vocab_size),
            source_dropout:   DropoutConfig::new(cfg.dropout).init(),
            target_dropout:   DropoutConfig::new(cfg.dropout).init(),
            encoder_layers,
            decoder_layers,
            final_linear:     LinearConfig::new(cfg.embed_size, cfg.target_vocab_size).init(device),
            languages:        Ignored(LanguagePair {
                source: cfg.source_language.clone(),
                target: cfg.target_language.clone(),
            }),
        };

        tracing::info!(
            "Transformer ready: {} layers, embed_size={}, heads={}, params={}",
            cfg.num_layers, cfg.embed_size, cfg.num_heads, model.num_params(),
        );
        Ok(model)
    }

    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    pub fn num_layers(&self) -> usize {
        self.encoder_layers.len()
    }

    pub fn max_seq_length(&self) -> usize {
        self.target_embedding.max_seq_length
    }

    pub fn target_vocab_size(&self) -> usize {
        self.target_embedding.vocab_size
    }

    /// Full pass: [batch, target_len, target_vocab_size] probabilities.
    pub fn forward(
        &self,
        source_ids:           Tensor<B, 2, Int>,
        target_ids:           Tensor<B, 2, Int>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
        decoder_padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:                  &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let logits = self.forward_logits(
            source_ids, target_ids, encoder_padding_mask, decoder_padding_mask, ctx,
        )?;
        Ok(activation::softmax(logits, 2))
    }

    /// Same as `forward` with tensors looked up by language identifier.
    pub fn forward_input(
        &self,
        input: &Seq2SeqInput<B>,
        ctx:   &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let languages  = self.languages();
        let source_ids = input.get(&languages.source)?;
        let target_ids = input.get(&languages.target)?;
        self.forward(
            source_ids,
            target_ids,
            input.encoder_padding_mask.clone(),
            input.decoder_padding_mask.clone(),
            ctx,
        )
    }

    /// Full pass stopping before the softmax.
    pub fn forward_logits(
        &self,
        source_ids:           Tensor<B, 2, Int>,
        target_ids:           Tensor<B, 2, Int>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
        decoder_padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:                  &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let [source_batch, _] = source_ids.dims();
        let [target_batch, _] = target_ids.dims();
        if source_batch != target_batch {
            return Err(ModelError::BatchSizeMismatch {
                what:     "target token ids",
                expected: source_batch,
                actual:   target_batch,
            });
        }

        // encode() has checked the encoder mask against the memory it returns
        let memory = self.encode(source_ids, encoder_padding_mask.clone(), ctx)?;
        if let Some(mask) = &decoder_padding_mask {
            check_padding_mask("decoder padding mask", mask, target_ids.dims())?;
        }
        let masks  = DecoderMasks::new(decoder_padding_mask, encoder_padding_mask);
        let hidden = self.decode_checked(target_ids, &memory, masks, ctx)?;
        Ok(self.project(hidden))
    }

    /// Run the encoder stack: [batch, source_len] → [batch, source_len, embed].
    pub fn encode(
        &self,
        source_ids:           Tensor<B, 2, Int>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:                  &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        if let Some(mask) = &encoder_padding_mask {
            check_padding_mask("encoder padding mask", mask, source_ids.dims())?;
        }

        let embedded = self.source_embedding.forward(source_ids)?;
        let mut x = ctx.dropout(&self.source_dropout, embedded);
        for layer in &self.encoder_layers {
            x = layer.forward_checked(x, encoder_padding_mask.clone(), ctx);
        }

        tracing::debug!("encoded source: {:?}", x.dims());
        Ok(x)
    }

    /// Run the decoder stack against a finished encoder output.
    /// Returns hidden states [batch, target_len, embed].
    pub fn decode(
        &self,
        target_ids:           Tensor<B, 2, Int>,
        memory:               &Tensor<B, 3>,
        decoder_padding_mask: Option<Tensor<B, 2, Int>>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
        ctx:                  &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let [batch, target_len] = target_ids.dims();
        let [mem_batch, mem_len, mem_features] = memory.dims();
        let embed_size = self.target_embedding.embed_size;

        if mem_features != embed_size {
            return Err(ModelError::FeatureSizeMismatch {
                what:     "encoder output",
                expected: embed_size,
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

        let masks = DecoderMasks::new(decoder_padding_mask, encoder_padding_mask);
        masks.check([batch, target_len], [batch, mem_len])?;
        self.decode_checked(target_ids, memory, masks, ctx)
    }

    /// `decode` for a memory and masks that are already known to fit.
    /// Token ids are still checked by the target embedding.
    pub(crate) fn decode_checked(
        &self,
        target_ids: Tensor<B, 2, Int>,
        memory:     &Tensor<B, 3>,
        masks:      DecoderMasks<B>,
        ctx:        &ForwardContext,
    ) -> ModelResult<Tensor<B, 3>> {
        let embedded = self.target_embedding.forward(target_ids)?;
        let mut x = ctx.dropout(&self.target_dropout, embedded);
        for layer in &self.decoder_layers {
            x = layer.forward_checked(x, memory, masks.clone(), ctx);
        }

        tracing::debug!("decoded target: {:?}", x.dims());
        Ok(x)
    }

    /// Decoder hidden states → vocabulary logits.
    pub fn project(&self, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        self.final_linear.forward(hidden)
    }

    /// See `GreedyDecoder::decode`.
    pub fn greedy_decode(
        &self,
        source_ids:           Tensor<B, 2, Int>,
        encoder_padding_mask: Option<Tensor<B, 2, Int>>,
        bos_id:               u32,
        eos_id:               u32,
        max_len:              usize,
    ) -> ModelResult<Vec<Vec<u32>>> {
        GreedyDecoderConfig::new(max_len)
            .with_bos_id(bos_id)
            .with_eos_id(eos_id)
            .init()
            .decode(self, source_ids, encoder_padding_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::config::PositionalEncodingKind;
    use crate::ml::test_utils::{assert_close, device, floats, ids, small_config, TestBackend};

    fn model() -> Transformer<TestBackend> {
        small_config().init(&device()).unwrap()
    }

    fn assert_distributions(probs: &[f32], vocab: usize) {
        for row in probs.chunks(vocab) {
            assert!(row.iter().all(|p| *p >= 0.0));
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row sums to {sum}");
        }
    }

    #[test]
    fn test_reference_scenario_shape_and_distribution() {
        let model = model();
        let out = model
            .forward(
                ids(&[[1, 2, 3, 4], [5, 6, 7, 8]]),
                ids(&[[9, 10, 11, 12], [13, 14, 15, 16]]),
                None,
                None,
                &ForwardContext::inference(),
            )
            .unwrap();

        assert_eq!(out.dims(), [2, 4, 50]);
        assert_distributions(&floats(out), 50);
    }

    #[test]
    fn test_source_and_target_lengths_may_differ() {
        let out = model()
            .forward(
                ids(&[[1, 2, 3, 4, 5, 6]]),
                ids(&[[7, 8]]),
                Some(ids(&[[1, 1, 1, 1, 0, 0]])),
                None,
                &ForwardContext::inference(),
            )
            .unwrap();
        assert_eq!(out.dims(), [1, 2, 50]);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let model = model();
        let run = || {
            floats(
                model
                    .forward(
                        ids(&[[1, 2, 3]]),
                        ids(&[[4, 5, 6]]),
                        None,
                        None,
                        &ForwardContext::inference(),
                    )
                    .unwrap(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_training_mode_still_yields_distributions() {
        let model = model();
        let out = model
            .forward(
                ids(&[[1, 2, 3]]),
                ids(&[[4, 5, 6]]),
                None,
                None,
                &ForwardContext::training(),
            )
            .unwrap();
        assert_distributions(&floats(out), 50);
    }

    #[test]
    fn test_future_target_token_does_not_change_earlier_positions() {
        let model  = model();
        let ctx    = ForwardContext::inference();
        let source = ids(&[[1, 2, 3, 4]]);

        let a = model.forward(source.clone(), ids(&[[5, 6, 7, 8]]), None, None, &ctx).unwrap();
        let b = model.forward(source, ids(&[[5, 6, 7, 42]]), None, None, &ctx).unwrap();

        let (a, b) = (floats(a), floats(b));
        // positions 0..3 identical, position 3 changes
        assert_close(&a[..3 * 50], &b[..3 * 50], 1e-6);
        assert!(a[3 * 50..].iter().zip(&b[3 * 50..]).any(|(x, y)| (x - y).abs() > 1e-7));
    }

    #[test]
    fn test_padded_source_content_is_invisible() {
        let model  = model();
        let ctx    = ForwardContext::inference();
        let mask   = ids(&[[1, 1, 0, 0], [1, 1, 1, 1]]);
        let target = ids(&[[3, 4, 5], [6, 7, 8]]);

        let a = model
            .forward(ids(&[[1, 2, 0, 0], [5, 6, 7, 8]]), target.clone(), Some(mask.clone()), None, &ctx)
            .unwrap();
        let b = model
            .forward(ids(&[[1, 2, 33, 44], [5, 6, 7, 8]]), target, Some(mask), None, &ctx)
            .unwrap();
        assert_close(&floats(a), &floats(b), 1e-5);
    }

    #[test]
    fn test_encoder_output_ignores_padded_content() {
        let model = model();
        let ctx   = ForwardContext::inference();
        let mask  = ids(&[[1, 1, 0, 0]]);

        let a = model.encode(ids(&[[1, 2, 0, 0]]), Some(mask.clone()), &ctx).unwrap();
        let b = model.encode(ids(&[[1, 2, 17, 49]]), Some(mask), &ctx).unwrap();
        assert_close(
            &floats(a.slice([0..1, 0..2, 0..8])),
            &floats(b.slice([0..1, 0..2, 0..8])),
            1e-5,
        );
    }

    #[test]
    fn test_decoder_padding_leaves_leading_positions_unchanged() {
        let model  = model();
        let ctx    = ForwardContext::inference();
        let source = ids(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
        let target = ids(&[[9, 10, 0, 0], [13, 14, 15, 16]]);

        let unmasked = floats(model.forward(source.clone(), target.clone(), None, None, &ctx).unwrap());
        let masked = floats(
            model
                .forward(source, target, None, Some(ids(&[[1, 1, 0, 0], [1, 1, 1, 1]])), &ctx)
                .unwrap(),
        );

        // sequence 0, positions 0 and 1
        assert_close(&unmasked[..2 * 50], &masked[..2 * 50], 1e-6);
        // sequence 1 carries no padding at all
        assert_close(&unmasked[4 * 50..], &masked[4 * 50..], 1e-6);
    }

    #[test]
    fn test_single_token_sequences() {
        let out = model()
            .forward(ids(&[[7]]), ids(&[[1]]), Some(ids(&[[1]])), Some(ids(&[[1]])), &ForwardContext::inference())
            .unwrap();
        assert_eq!(out.dims(), [1, 1, 50]);
        assert_distributions(&floats(out), 50);
    }

    fn deep_model(kind: PositionalEncodingKind) -> Transformer<TestBackend> {
        let mut cfg = small_config().with_positional_encoding(kind);
        cfg.num_layers = 3;
        cfg.init(&device()).unwrap()
    }

    #[test]
    fn test_deep_stack_shapes_and_distributions() {
        for kind in [PositionalEncodingKind::Learned, PositionalEncodingKind::Sinusoidal] {
            let model = deep_model(kind);
            assert_eq!(model.num_layers(), 3);
            assert_eq!(model.decoder_layers.len(), 3);

            let ctx = ForwardContext::inference();
            let memory = model.encode(ids(&[[1, 2, 3, 4, 5]]), None, &ctx).unwrap();
            assert_eq!(memory.dims(), [1, 5, 8]);

            let out = model
                .forward(
                    ids(&[[1, 2, 3, 4, 5], [6, 7, 8, 9, 0]]),
                    ids(&[[11, 12, 13], [14, 15, 16]]),
                    Some(ids(&[[1, 1, 1, 1, 1], [1, 1, 1, 1, 0]])),
                    None,
                    &ctx,
                )
                .unwrap();
            assert_eq!(out.dims(), [2, 3, 50]);
            assert_distributions(&floats(out), 50);
        }
    }

    #[test]
    fn test_every_decoder_block_reads_the_final_encoder_output() {
        let model  = deep_model(PositionalEncodingKind::Learned);
        let ctx    = ForwardContext::inference();
        let source = ids(&[[1, 2, 3, 4]]);
        let target = ids(&[[5, 6, 7]]);

        // Run the stack by hand, one memory shared by all three blocks
        let memory = model.encode(source.clone(), None, &ctx).unwrap();
        let mut x = model.target_embedding.forward(target.clone()).unwrap();
        for layer in &model.decoder_layers {
            x = layer.forward(x, &memory, DecoderMasks::none(), &ctx).unwrap();
        }
        let expected = activation::softmax(model.project(x), 2);

        let actual = model.forward(source, target, None, None, &ctx).unwrap();
        assert_close(&floats(actual), &floats(expected), 1e-6);
    }

    #[test]
    fn test_deep_stack_stays_causal() {
        let model  = deep_model(PositionalEncodingKind::Learned);
        let ctx    = ForwardContext::inference();
        let source = ids(&[[1, 2, 3, 4]]);

        let a = model.forward(source.clone(), ids(&[[5, 6, 7, 8]]), None, None, &ctx).unwrap();
        let b = model.forward(source, ids(&[[5, 6, 7, 42]]), None, None, &ctx).unwrap();

        let (a, b) = (floats(a), floats(b));
        assert_close(&a[..3 * 50], &b[..3 * 50], 1e-6);
        assert!(a[3 * 50..].iter().zip(&b[3 * 50..]).any(|(x, y)| (x - y).abs() > 1e-7));
    }

    #[test]
    fn test_empty_batch_with_mask_is_an_error() {
        let empty = || Tensor::<TestBackend, 2, Int>::zeros([0, 3], &device());
        let err = model()
            .forward(empty(), empty(), Some(empty()), None, &ForwardContext::inference())
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyInput { batch: 0, seq_len: 3 });
    }

    #[test]
    fn test_empty_target_with_mask_is_an_error() {
        let model = model();
        let ctx   = ForwardContext::inference();
        let empty = || Tensor::<TestBackend, 2, Int>::zeros([1, 0], &device());

        let err = model
            .forward(ids(&[[1, 2, 3]]), empty(), None, Some(empty()), &ctx)
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyInput { batch: 1, seq_len: 0 });

        let memory = model.encode(ids(&[[1, 2, 3]]), None, &ctx).unwrap();
        let err = model.decode(empty(), &memory, Some(empty()), None, &ctx).unwrap_err();
        assert_eq!(err, ModelError::EmptyInput { batch: 1, seq_len: 0 });
    }

    #[test]
    fn test_decode_rejects_memory_from_another_batch() {
        let model  = model();
        let ctx    = ForwardContext::inference();
        let memory = model.encode(ids(&[[1, 2, 3]]), None, &ctx).unwrap();
        let err = model
            .decode(ids(&[[4, 5], [6, 7]]), &memory, None, None, &ctx)
            .unwrap_err();
        assert_eq!(err, ModelError::BatchSizeMismatch {
            what:     "encoder output",
            expected: 2,
            actual:   1,
        });
    }

    #[test]
    fn test_decode_rejects_encoder_mask_not_matching_memory() {
        let model  = model();
        let ctx    = ForwardContext::inference();
        let memory = model.encode(ids(&[[1, 2, 3]]), None, &ctx).unwrap();
        let err = model
            .decode(ids(&[[4, 5]]), &memory, None, Some(ids(&[[1, 1]])), &ctx)
            .unwrap_err();
        assert!(matches!(err, ModelError::MaskShapeMismatch { what: "encoder padding mask", .. }));
    }

    #[test]
    fn test_greedy_decode_starts_with_bos() {
        let rows = model().greedy_decode(ids(&[[4, 5, 6]]), None, 1, 2, 4).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], 1);
        assert!(rows[0].len() <= 4);
    }

    #[test]
    fn test_forward_input_selects_by_language() {
        let model = model();
        let input = Seq2SeqInput::new()
            .with_tokens("en", ids(&[[1, 2, 3]]))
            .with_tokens("is", ids(&[[4, 5]]))
            .with_encoder_padding_mask(ids(&[[1, 1, 1]]));
        let out = model.forward_input(&input, &ForwardContext::inference()).unwrap();
        assert_eq!(out.dims(), [1, 2, 50]);
    }

    #[test]
    fn test_forward_input_reports_missing_language() {
        let input = Seq2SeqInput::new().with_tokens("en", ids(&[[1, 2, 3]]));
        let err = model().forward_input(&input, &ForwardContext::inference()).unwrap_err();
        assert_eq!(err, ModelError::MissingLanguage("is".to_string()));
    }

    #[test]
    fn test_rejects_overlong_sequences() {
        let model = model();
        let ctx   = ForwardContext::inference();
        let err = model.forward(ids(&[[1; 11]]), ids(&[[1]]), None, None, &ctx).unwrap_err();
        assert_eq!(err, ModelError::SequenceTooLong { len: 11, max: 10 });

        let err = model.forward(ids(&[[1]]), ids(&[[1; 12]]), None, None, &ctx).unwrap_err();
        assert_eq!(err, ModelError::SequenceTooLong { len: 12, max: 10 });
    }

    #[test]
    fn test_rejects_out_of_vocabulary_ids() {
        let err = model()
            .forward(ids(&[[1, 2]]), ids(&[[3, 50]]), None, None, &ForwardContext::inference())
            .unwrap_err();
        assert_eq!(err, ModelError::TokenOutOfRange { id: 50, vocab_size: 50 });
    }

    #[test]
    fn test_rejects_batch_mismatch() {
        let err = model()
            .forward(ids(&[[1, 2], [3, 4]]), ids(&[[5, 6]]), None, None, &ForwardContext::inference())
            .unwrap_err();
        assert_eq!(err, ModelError::BatchSizeMismatch {
            what:     "target token ids",
            expected: 2,
            actual:   1,
        });
    }

    #[test]
    fn test_rejects_mask_not_matching_tokens() {
        let model = model();
        let ctx   = ForwardContext::inference();

        let err = model
            .forward(ids(&[[1, 2, 3]]), ids(&[[4, 5]]), Some(ids(&[[1, 1]])), None, &ctx)
            .unwrap_err();
        assert!(matches!(err, ModelError::MaskShapeMismatch { what: "encoder padding mask", .. }));

        let err = model
            .forward(ids(&[[1, 2, 3]]), ids(&[[4, 5]]), None, Some(ids(&[[1, 1, 1]])), &ctx)
            .unwrap_err();
        assert!(matches!(err, ModelError::MaskShapeMismatch { what: "decoder padding mask", .. }));
    }
}
