// ============================================================
// Layer 5 — Attention Masks
// ============================================================
// All masks here use the convention callers use:
//   1 = this (query, key) pair may attend
//   0 = it may not
//
// Two kinds exist:
//
//   Padding mask [batch, seq]        — 0 marks pad positions.
//                                       Broadcast over every query
//                                       so pads never act as keys.
//
//   Causal mask  [batch, seq, seq]   — lower triangular:
//                                       (i, j) = 1  ⟺  j <= i
//
//       seq = 4        j →
//                    1 0 0 0
//               i    1 1 0 0
//               ↓    1 1 1 0
//                    1 1 1 1
//
// The decoder's self-attention mask is the elementwise minimum
// of the two. Since both are 0/1 tensors, the minimum is their
// product.
//
// Burn's attention takes the opposite convention (true = masked),
// so the conversion helpers at the bottom flip the polarity
// right before the mask is handed over.
//
// Reference: Vaswani et al. (2017) §3.2.3

use burn::{prelude::*, tensor::TensorData};

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::convert::int_range;

/// Lower-triangular `[batch, seq_len, seq_len]` mask.
/// Rebuilt on every call; sequence length varies between batches.
pub fn causal_mask<B: Backend>(
    batch:   usize,
    seq_len: usize,
    device:  &B::Device,
) -> Tensor<B, 3, Int> {
    let data: Vec<i64> = (0..seq_len)
        .flat_map(|i| (0..seq_len).map(move |j| i64::from(j <= i)))
        .collect();

    Tensor::<B, 2, Int>::from_data(
        TensorData::new(data, [seq_len, seq_len]).convert::<B::IntElem>(),
        device,
    )
    .unsqueeze::<3>()
    .expand([batch, seq_len, seq_len])
}

/// `[batch, key_len]` → `[batch, query_len, key_len]`
pub fn broadcast_padding_mask<B: Backend>(
    mask:      Tensor<B, 2, Int>,
    query_len: usize,
) -> Tensor<B, 3, Int> {
    let [batch, key_len] = mask.dims();
    mask.reshape([batch, 1, key_len])
        .expand([batch, query_len, key_len])
}

/// Elementwise minimum of two 0/1 masks.
pub fn combine_masks<B: Backend>(
    a: Tensor<B, 3, Int>,
    b: Tensor<B, 3, Int>,
) -> Tensor<B, 3, Int> {
    a.mul(b)
}

/// Self-attention mask for a decoder input of `[batch, seq_len]`.
/// Falls back to the causal mask alone when no padding is given.
pub fn decoder_self_attention_mask<B: Backend>(
    padding_mask: Option<Tensor<B, 2, Int>>,
    batch:        usize,
    seq_len:      usize,
    device:       &B::Device,
) -> Tensor<B, 3, Int> {
    let causal = causal_mask::<B>(batch, seq_len, device);
    match padding_mask {
        Some(padding) => combine_masks(causal, broadcast_padding_mask(padding, seq_len)),
        None          => causal,
    }
}

/// Reject a padding mask that does not belong to a `[batch, seq]`
/// token tensor, or that holds anything but 0 and 1.
/// An empty token tensor is reported as `EmptyInput`.
pub fn check_padding_mask<B: Backend>(
    what:     &'static str,
    mask:     &Tensor<B, 2, Int>,
    expected: [usize; 2],
) -> ModelResult<()> {
    let actual = mask.dims();
    if actual != expected {
        return Err(ModelError::MaskShapeMismatch { what, expected, actual });
    }
    let [batch, seq_len] = expected;
    if batch == 0 || seq_len == 0 {
        return Err(ModelError::EmptyInput { batch, seq_len });
    }
    let (min, max) = int_range(mask);
    if min < 0 || max > 1 {
        return Err(ModelError::InvalidMaskValue { what, min, max });
    }
    Ok(())
}

// ─── Burn conversions ─────────────────────────────────────────────────────────
// Burn's MhaInput expects `true` where attention is forbidden.

pub(crate) fn to_attention_mask<B: Backend>(allowed: Tensor<B, 3, Int>) -> Tensor<B, 3, Bool> {
    allowed.equal_elem(0)
}

pub(crate) fn to_key_padding_mask<B: Backend>(allowed: Tensor<B, 2, Int>) -> Tensor<B, 2, Bool> {
    allowed.equal_elem(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::test_utils::{device, ids, ints, TestBackend};

    #[test]
    fn test_causal_mask_is_lower_triangular() {
        let mask = causal_mask::<TestBackend>(1, 3, &device());
        assert_eq!(mask.dims(), [1, 3, 3]);
        assert_eq!(ints(mask), vec![
            1, 0, 0,
            1, 1, 0,
            1, 1, 1,
        ]);
    }

    #[test]
    fn test_causal_mask_single_position() {
        let mask = causal_mask::<TestBackend>(2, 1, &device());
        assert_eq!(mask.dims(), [2, 1, 1]);
        assert_eq!(ints(mask), vec![1, 1]);
    }

    #[test]
    fn test_causal_mask_is_repeated_per_batch_item() {
        let mask = ints(causal_mask::<TestBackend>(3, 2, &device()));
        assert_eq!(mask, vec![1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn test_padding_broadcasts_over_queries() {
        let padding = ids(&[[1, 1, 0]]);
        let mask = broadcast_padding_mask(padding, 2);
        assert_eq!(mask.dims(), [1, 2, 3]);
        assert_eq!(ints(mask), vec![1, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_decoder_mask_is_minimum_of_causal_and_padding() {
        let padding = ids(&[[1, 1, 0], [1, 1, 1]]);
        let mask = decoder_self_attention_mask(Some(padding), 2, 3, &device());
        assert_eq!(ints(mask), vec![
            // sequence 0: last key is padding
            1, 0, 0,
            1, 1, 0,
            1, 1, 0,
            // sequence 1: causal only
            1, 0, 0,
            1, 1, 0,
            1, 1, 1,
        ]);
    }

    #[test]
    fn test_decoder_mask_without_padding_is_causal() {
        let mask = decoder_self_attention_mask::<TestBackend>(None, 1, 2, &device());
        assert_eq!(ints(mask), vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_check_rejects_wrong_shape() {
        let mask = ids(&[[1, 1, 0]]);
        let err = check_padding_mask("encoder padding mask", &mask, [2, 3]).unwrap_err();
        assert_eq!(err, ModelError::MaskShapeMismatch {
            what:     "encoder padding mask",
            expected: [2, 3],
            actual:   [1, 3],
        });
    }

    #[test]
    fn test_check_rejects_non_binary_values() {
        let mask = ids(&[[1, 2, 0]]);
        let err = check_padding_mask("decoder padding mask", &mask, [1, 3]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidMaskValue { max: 2, .. }));
    }

    #[test]
    fn test_check_reports_empty_mask_without_reducing_it() {
        let mask = Tensor::<TestBackend, 2, Int>::zeros([0, 3], &device());
        let err = check_padding_mask("encoder padding mask", &mask, [0, 3]).unwrap_err();
        assert_eq!(err, ModelError::EmptyInput { batch: 0, seq_len: 3 });

        let mask = Tensor::<TestBackend, 2, Int>::zeros([2, 0], &device());
        let err = check_padding_mask("decoder padding mask", &mask, [2, 0]).unwrap_err();
        assert_eq!(err, ModelError::EmptyInput { batch: 2, seq_len: 0 });
    }

    #[test]
    fn test_burn_polarity_is_flipped() {
        let allowed = causal_mask::<TestBackend>(1, 2, &device());
        let forbidden = to_attention_mask(allowed).int();
        assert_eq!(ints(forbidden), vec![0, 1, 0, 0]);
    }
}
