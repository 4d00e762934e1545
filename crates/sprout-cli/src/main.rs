use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::Value;
use sprout_assets::{AssetStore, DirAssetStore};
use sprout_compiler::compile_document;
use sprout_core::CompileOptions;
use tracing_subscriber::EnvFilter;

mod output;
mod source;

use output::write_files;
use source::LocalSource;

#[derive(Parser, Debug)]
#[command(name = "sprout", version, about = "Compile design documents into React components")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile every `#`-named component of a saved document.
    Compile(CompileArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Saved file response (JSON).
    #[arg(long)]
    document: PathBuf,

    /// Directory holding exported vectors, masks and `fills/`.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory; overrides the options file.
    #[arg(long, env = "SPROUT_OUT_DIR")]
    out: Option<PathBuf>,

    /// Option preset.
    #[arg(long, env = "SPROUT_PRESET", default_value = "default")]
    preset: String,

    /// Options file (JSON, camelCase keys) layered over the preset.
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
    }
}

/// Preset, then the options file, then flags.
fn load_options(args: &CompileArgs) -> anyhow::Result<CompileOptions> {
    let mut options = CompileOptions::from_preset(&args.preset)?;
    if let Some(path) = &args.options {
        let body = std::fs::read(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        let overlay: Value = serde_json::from_slice(&body)
            .with_context(|| format!("parse options '{}'", path.display()))?;
        let mut merged = serde_json::to_value(&options)?;
        merge(&mut merged, overlay);
        options = serde_json::from_value(merged)
            .with_context(|| format!("invalid options in '{}'", path.display()))?;
    }
    if let Some(out) = &args.out {
        options.out_dir = out.clone();
    }
    options.validate()?;
    Ok(options)
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let options = load_options(&args)?;
    let source = LocalSource::open(&args.document, args.assets.clone())
        .with_context(|| format!("open document '{}'", args.document.display()))?;

    let output = futures::executor::block_on(compile_document(&source, &options))?;

    let report = write_files(&output.files)?;
    let assets = DirAssetStore::new(&options.image_dir)
        .persist_all(&output.assets)
        .with_context(|| format!("write assets to '{}'", options.image_dir.display()))?;

    tracing::info!(
        components = output.components.len(),
        written = report.written,
        kept = report.kept,
        assets,
        "done"
    );
    Ok(())
}
