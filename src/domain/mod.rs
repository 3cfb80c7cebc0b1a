// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the problem, with no Burn
// types in them:
//
//   - what one example looks like (a tokenised sentence pair)
//   - every way the model can refuse its input
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and enums
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

// Failure taxonomy shared by config, model and batcher
pub mod error;

// A tokenised source/target sentence pair
pub mod translation_pair;
