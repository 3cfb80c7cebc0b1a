// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and all their flags:
//
//   init-config  — write a reference TransformerConfig as JSON
//   inspect      — build a model from a config and describe it
//   translate    — greedy-decode a source id sequence
//
// clap's derive macros generate --help text, error messages
// for missing args, and string → number conversion.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a reference model config to a JSON file
    InitConfig(InitConfigArgs),

    /// Build a model from a config and print its shape and size
    Inspect(InspectArgs),

    /// Greedy-decode one source sequence with a freshly initialised model
    Translate(TranslateArgs),
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(long, default_value = "transformer.json")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Config file written by `init-config`; the reference config if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Source token ids, separated by spaces or commas (e.g. "5 17 42")
    #[arg(long)]
    pub source: String,

    /// Config file written by `init-config`; the reference config if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Id every output starts with
    #[arg(long, default_value_t = 1)]
    pub bos: u32,

    /// Id that ends an output
    #[arg(long, default_value_t = 2)]
    pub eos: u32,

    /// Longest output including bos (capped at the model's max_seq_length)
    #[arg(long, default_value_t = 32)]
    pub max_len: usize,
}

impl TranslateArgs {
    /// "5 17,42" → [5, 17, 42]
    pub fn source_ids(&self) -> anyhow::Result<Vec<u32>> {
        self.source
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|e| anyhow::anyhow!("invalid token id '{part}': {e}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(source: &str) -> TranslateArgs {
        TranslateArgs {
            source:  source.to_string(),
            config:  None,
            seed:    0,
            bos:     1,
            eos:     2,
            max_len: 8,
        }
    }

    #[test]
    fn test_source_ids_accepts_spaces_and_commas() {
        assert_eq!(args("5 17,42 ,  3").source_ids().unwrap(), vec![5, 17, 42, 3]);
    }

    #[test]
    fn test_source_ids_rejects_non_numbers() {
        assert!(args("5 cat").source_ids().is_err());
        assert!(args("-1").source_ids().is_err());
    }
}
