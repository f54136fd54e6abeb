//! NEXRAD Level 3 command line tool.
//!
//! - `header`: decode only the product header
//! - `decode`: decode a product and print a JSON summary
//! - `palette`: parse a color table and dump its lookup table
//! - `batch`: decode many products concurrently

mod batch;
mod config;
mod palette;
mod summary;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use level3_parser::{decode_header, DecoderOptions};
use renderer::{ColorTable, LookupTable};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use config::PaletteConfig;
use palette::{nominal_parameters, PaletteDump};
use summary::{HeaderSummary, LutSummary, ProductSummary};

#[derive(Parser, Debug)]
#[command(name = "level3-tool")]
#[command(about = "Decode NEXRAD Level 3 products and inspect color tables")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    json_logs: bool,

    /// Palette configuration mapping product codes to color tables
    #[arg(long, env = "PALETTE_CONFIG", default_value = "config/palettes.yaml")]
    palette_config: PathBuf,

    /// Compressed input buffer size in bytes
    #[arg(long, env = "INPUT_BUFFER_SIZE", default_value = "262144")]
    input_buffer_size: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode only the product header
    Header {
        file: PathBuf,
    },

    /// Decode a full product
    Decode {
        file: PathBuf,

        /// Color table to apply instead of the configured one
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Write colorized RGBA8 pixels (radial-major) to this file
        #[arg(long)]
        rgba_out: Option<PathBuf>,
    },

    /// Parse a color table and dump its lookup table
    Palette {
        file: PathBuf,

        /// Product code whose nominal decoding parameters drive the lookup table
        #[arg(long, default_value = "94", conflicts_with = "product_file")]
        product_code: i16,

        /// Take decoding parameters from this product's header instead
        #[arg(long)]
        product_file: Option<PathBuf>,
    },

    /// Decode many products concurrently, one JSON line per file
    Batch {
        files: Vec<PathBuf>,

        /// Maximum concurrent decodes
        #[arg(long, env = "MAX_CONCURRENT", default_value = "4")]
        max_concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    let options = DecoderOptions {
        input_buffer_size: args.input_buffer_size,
    };
    let palettes = PaletteConfig::load_optional(&args.palette_config)?;

    match &args.command {
        Command::Header { file } => {
            let mut reader = BufReader::new(open(file)?);
            let header = decode_header(&mut reader)
                .with_context(|| format!("Failed to decode header of {}", file.display()))?;
            print_json(&HeaderSummary::from_header(&header), args.pretty)?;
        }
        Command::Decode {
            file,
            palette,
            rgba_out,
        } => {
            let path = file.clone();
            let product =
                tokio::task::spawn_blocking(move || batch::decode_file(&path, options)).await??;

            let mut summary = ProductSummary::from_product(&product);
            let color_table = match palette {
                Some(path) => Some((path.display().to_string(), load_color_table(path)?)),
                None => palettes.color_table_for(product.product_code())?,
            };

            if let (Some((name, table)), Some(params)) =
                (color_table, product.decoding_parameters())
            {
                let lut = LookupTable::build(&table, params);
                if let Some(out) = rgba_out {
                    let pixels = lut.colorize(&product);
                    std::fs::write(out, &pixels)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    info!(path = %out.display(), bytes = pixels.len(), "Wrote RGBA pixels");
                }
                summary = summary.with_lut(LutSummary::new(name, &lut, &product));
            } else if rgba_out.is_some() {
                bail!("No color table or decoding parameters available to colorize this product");
            }

            print_json(&summary, args.pretty)?;
        }
        Command::Palette {
            file,
            product_code,
            product_file,
        } => {
            let table = load_color_table(file)?;
            let params = match product_file {
                Some(path) => {
                    let mut reader = BufReader::new(open(path)?);
                    let header = decode_header(&mut reader)
                        .with_context(|| format!("Failed to decode header of {}", path.display()))?;
                    header.decoding_parameters.with_context(|| {
                        format!("Product {} has no decoding parameters", header.product_code)
                    })?
                }
                None => nominal_parameters(*product_code).with_context(|| {
                    format!("No nominal decoding parameters for product {}", product_code)
                })?,
            };
            print_json(&PaletteDump::new(table, params), args.pretty)?;
        }
        Command::Batch {
            files,
            max_concurrent,
        } => {
            let results = batch::decode_files(files.clone(), *max_concurrent, options).await;
            let mut failed = 0;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();

            for result in results {
                let line = match result.product {
                    Ok(product) => serde_json::json!({
                        "path": result.path,
                        "summary": ProductSummary::from_product(&product),
                    }),
                    Err(e) => {
                        failed += 1;
                        serde_json::json!({
                            "path": result.path,
                            "error": format!("{:#}", e),
                        })
                    }
                };
                writeln!(out, "{}", line)?;
            }

            if failed > 0 {
                bail!("{} of {} products failed to decode", failed, files.len());
            }
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn load_color_table(path: &Path) -> Result<ColorTable> {
    let table = ColorTable::from_file(path)
        .with_context(|| format!("Failed to parse color table {}", path.display()))?;
    debug!(path = %path.display(), steps = table.color_steps.len(), "Loaded color table");
    Ok(table)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
