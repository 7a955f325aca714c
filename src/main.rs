use anyhow::Context;
use clap::{ArgGroup, Parser};
use huff_compress::{CodecConfig, Compressor};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "huff")]
#[command(about = "Huffman compression over UTF-8 characters")]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// File to compress, written to <FILE>.bin
    #[arg(short, long, value_name = "FILE")]
    compress: Option<PathBuf>,

    /// File to decompress, written to <stem>-decompressed<ext>
    #[arg(short, long, value_name = "FILE")]
    decompress: Option<PathBuf>,

    /// Write to this path instead of the derived name
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CodecConfig::from_json_file(path)?,
        None => CodecConfig::default(),
    };
    let compressor = Compressor::new(config);

    if let Some(input) = cli.compress {
        let output = cli
            .output
            .unwrap_or_else(|| compressor.compressed_path(&input));
        let stats = compressor
            .encode_to(&input, &output)
            .with_context(|| format!("compressing {}", input.display()))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else if let Some(saving) = stats.space_saving() {
            println!("Compression rate: {:.2}%", saving);
        }
    } else if let Some(input) = cli.decompress {
        let output = cli
            .output
            .unwrap_or_else(|| compressor.decompressed_path(&input));
        let stats = compressor
            .decode_to(&input, &output)
            .with_context(|| format!("decompressing {}", input.display()))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
