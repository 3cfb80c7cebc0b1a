// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Bridges plain tokenised pairs and the tensors the model takes:
//
//   Vec<TranslationPair>   (ids from an external tokenizer)
//       │
//       ▼
//   Seq2SeqBatcher         → pads, builds masks, keys by language
//       │
//       ▼
//   Seq2SeqInput           → Transformer::forward_input
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Implements Burn's Batcher trait for translation pairs
pub mod batcher;
