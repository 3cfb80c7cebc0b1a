// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// Every command only routes: configs and models come from the
// library crate, this layer formats what they return.
//
// There is no training here; `translate` runs on freshly
// initialised weights and exists to exercise the full
// encode → greedy decode path end to end.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::path::Path;

use anyhow::{Context, Result};
use burn::prelude::*;
use clap::Parser;
use commands::{Commands, InitConfigArgs, InspectArgs, TranslateArgs};

use seq2seq_transformer::ml::{
    config::TransformerConfig,
    convert::token_tensor,
    inferencer::GreedyDecoderConfig,
    model::Transformer,
};

type CliBackend = burn::backend::NdArray;

#[derive(Parser, Debug)]
#[command(
    name = "seq2seq",
    version = "0.1.0",
    about = "Build and inspect an encoder-decoder Transformer, and greedy-decode with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::InitConfig(args) => run_init_config(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::Translate(args)  => run_translate(args),
        }
    }
}

/// Two layers, E=64, 4 heads, 4× feed-forward, 1000-token vocabularies.
fn reference_config() -> TransformerConfig {
    TransformerConfig::new(2, 64, 4, 4, 1000, 1000, 64, "en".into(), "is".into())
}

fn load_config(path: Option<&Path>) -> Result<TransformerConfig> {
    let cfg = match path {
        Some(path) => TransformerConfig::load(path)
            .map_err(|e| anyhow::anyhow!("{e:?}"))
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => reference_config(),
    };
    Ok(cfg)
}

fn build_model(cfg: &TransformerConfig) -> Result<Transformer<CliBackend>> {
    let device = Default::default();
    cfg.init::<CliBackend>(&device).map_err(|e| {
        let what = if e.is_config_error() { "invalid model config" } else { "building model" };
        anyhow::Error::new(e).context(what)
    })
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    reference_config()
        .save(&args.out)
        .with_context(|| format!("writing config to {}", args.out.display()))?;
    println!("Config written to {}", args.out.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let cfg   = load_config(args.config.as_deref())?;
    let model = build_model(&cfg)?;

    println!("{cfg}");
    println!("encoder layers : {}", model.encoder_layers.len());
    println!("decoder layers : {}", model.decoder_layers.len());
    println!("languages      : {} -> {}", model.languages().source, model.languages().target);
    println!("positional     : {:?}", model.source_embedding.kind());
    println!("parameters     : {}", model.num_params());
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<()> {
    let cfg    = load_config(args.config.as_deref())?;
    let source = args.source_ids()?;
    if source.is_empty() {
        anyhow::bail!("--source must contain at least one token id");
    }

    CliBackend::seed(args.seed);
    let model  = build_model(&cfg)?;
    let device = Default::default();

    tracing::info!("Translating {} source tokens (seed={})", source.len(), args.seed);

    let decoder = GreedyDecoderConfig::new(args.max_len)
        .with_bos_id(args.bos)
        .with_eos_id(args.eos)
        .init();
    let source_ids = token_tensor::<CliBackend>(&[source], &device);
    let rows = decoder.decode(&model, source_ids, None).context("greedy decoding")?;

    for row in rows {
        let ids: Vec<String> = row.iter().map(u32::to_string).collect();
        println!("{}", ids.join(" "));
    }
    Ok(())
}
