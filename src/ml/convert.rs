// ============================================================
// Layer 5 — Host ↔ Tensor Conversions
// ============================================================
// Small helpers for the places where values cross between plain
// Rust vectors and backend tensors.
//
// Every conversion goes through TensorData::convert so it works
// whatever element types the backend picked (NdArray uses i64
// ints, GPU backends usually i32).

use burn::{prelude::*, tensor::TensorData};

use crate::domain::error::{ModelError, ModelResult};

/// Smallest and largest value of an integer tensor.
pub fn int_range<B: Backend, const D: usize>(tensor: &Tensor<B, D, Int>) -> (i64, i64) {
    let min = tensor.clone().min().into_scalar().elem::<i64>();
    let max = tensor.clone().max().into_scalar().elem::<i64>();
    (min, max)
}

/// Build a `[rows, len]` id tensor. All rows must share one length.
pub fn token_tensor<B: Backend>(rows: &[Vec<u32>], device: &B::Device) -> Tensor<B, 2, Int> {
    let len = rows.first().map_or(0, Vec::len);
    let flat: Vec<i64> = rows
        .iter()
        .flat_map(|row| row.iter().map(|&id| i64::from(id)))
        .collect();

    Tensor::from_data(
        TensorData::new(flat, [rows.len(), len]).convert::<B::IntElem>(),
        device,
    )
}

/// Copy an integer tensor back to the host in row-major order.
pub fn read_ints<B: Backend, const D: usize>(tensor: Tensor<B, D, Int>) -> ModelResult<Vec<i64>> {
    tensor
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| ModelError::TensorData(format!("{e:?}")))
}
