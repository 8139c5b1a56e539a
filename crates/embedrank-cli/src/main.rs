//! EmbedRank: keyphrase extraction from POS-tagged text.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use embedrank_core::EmbedRankConfig;
use embedrank_rank::KeyphraseExtractor;
use embedrank_text::PreTaggedText;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod args;
mod output;

use args::Cli;

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    let mut config = EmbedRankConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    // Reject bad overrides before a model is loaded
    config.extraction.validate()?;

    let embedder = embedrank_infer::create_embedder(&config.embedding)?;
    let extractor = KeyphraseExtractor::new(embedder, Arc::new(PreTaggedText), config.extraction)?;

    let input = read_input(&cli)?;

    if cli.lines {
        let documents: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
        info!("Extracting from {} documents", documents.len());
        let results = extractor.extract_batch(&documents);
        let failed = results.iter().filter(|r| r.is_err()).count();

        if cli.json {
            let entries: Vec<_> = results
                .iter()
                .enumerate()
                .map(|(i, r)| output::batch_entry(i, r))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for (i, result) in results.iter().enumerate() {
                println!("# document {}", i);
                if let Ok(keyphrases) = result {
                    print!("{}", output::render_text(keyphrases));
                }
            }
        }

        for (i, result) in results.iter().enumerate() {
            if let Err(e) = result {
                error!("document {}: {}", i, e);
            }
        }
        if failed > 0 {
            anyhow::bail!("{} of {} documents failed", failed, documents.len());
        }
        return Ok(());
    }

    let keyphrases = extractor.extract(input.trim())?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&keyphrases)?);
    } else {
        print!("{}", output::render_text(&keyphrases));
    }
    Ok(())
}
