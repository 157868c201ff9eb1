use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uos::{
    assembler, convert, frame, DecodeOutcome, Decoder, MultipartCollector, NetworkRegistry,
    ParsedPayload,
};

#[derive(Parser)]
#[command(name = "uos", version, about = "Air-gapped signer QR payload tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode scanned frames into a signing request
    Decode {
        /// Raw scans as hex digits; frames of one payload may come in any order
        #[arg(required = true)]
        scans: Vec<String>,
        /// JSON table of genesis hash to address prefix
        #[arg(long, env = "UOS_NETWORKS")]
        networks: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Encode a payload into scans the way the device does
    Encode {
        /// Payload bytes as hex, starting with the payload type byte
        payload: String,
        #[arg(long, default_value_t = 1)]
        frames: u16,
        #[arg(long)]
        padded_len: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Decode {
            scans,
            networks,
            json,
        } => cmd_decode(&scans, networks.as_deref(), json).await,
        Commands::Encode {
            payload,
            frames,
            padded_len,
        } => cmd_encode(&payload, frames, padded_len),
    }
}

async fn cmd_decode(scans: &[String], networks_path: Option<&Path>, json: bool) -> Result<()> {
    let networks = match networks_path {
        Some(path) => NetworkRegistry::from_json_file(path)
            .with_context(|| format!("failed to load networks from {}", path.display()))?,
        None => NetworkRegistry::with_defaults(),
    };
    let decoder = Decoder::new(networks);
    tracing::debug!(networks = decoder.networks().len(), "network table loaded");

    let mut collector = MultipartCollector::new();
    for (index, scan) in scans.iter().enumerate() {
        let outcome = decoder
            .decode_scan(scan.trim(), false)
            .await
            .with_context(|| format!("failed to decode scan {index}"))?;
        match outcome {
            DecodeOutcome::Parsed(parsed) => print_parsed(&parsed, json)?,
            DecodeOutcome::Partial(partial) => {
                tracing::info!(
                    frame = partial.current_frame,
                    frame_count = partial.frame_count,
                    "collected frame"
                );
                if !collector.insert(partial)? {
                    tracing::warn!(scan = index, "duplicate frame skipped");
                }
            }
        }
    }

    if collector.expected_count().is_none() {
        return Ok(());
    }
    if !collector.is_complete() {
        bail!(
            "multipart payload incomplete, missing frames {:?}",
            collector.missing()
        );
    }
    let bytes = collector.reassemble()?;
    match decoder
        .decode_bytes(&bytes, true)
        .await
        .context("failed to decode reassembled payload")?
    {
        DecodeOutcome::Parsed(parsed) => print_parsed(&parsed, json),
        DecodeOutcome::Partial(_) => bail!("reassembled payload is still partial"),
    }
}

fn cmd_encode(payload_hex: &str, frames: u16, padded_len: Option<usize>) -> Result<()> {
    let payload = convert::decode_hex(payload_hex.trim()).context("payload is not hex")?;
    for bytes in assembler::split(&payload, frames)? {
        println!("{}", frame::encode(&bytes, padded_len)?);
    }
    Ok(())
}

fn print_parsed(parsed: &ParsedPayload, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(parsed)?);
        return Ok(());
    }
    let kind = match parsed {
        ParsedPayload::Ethereum(_) => "ethereum",
        ParsedPayload::Substrate(_) => "substrate",
    };
    println!("kind: {kind}");
    println!("action: {:?}", parsed.action());
    println!("account: {}", parsed.account());
    match parsed {
        ParsedPayload::Ethereum(request) => {
            println!("payload: {}", convert::hex_with_prefix(&request.payload));
        }
        ParsedPayload::Substrate(request) => {
            println!("crypto: {:?}", request.crypto_scheme);
            println!("genesis: {}", request.genesis_hash);
            println!("spec version: {}", request.spec_version);
            println!("hashed: {}", request.is_hash);
            println!("oversized: {}", request.oversized);
            println!("data: {}", request.data);
        }
    }
    Ok(())
}
