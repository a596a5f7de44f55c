//! Command-line front end over the `tilefloat` codec, FMA, and GRS core.

use std::io::BufRead;

use clap::{Parser, Subcommand};

use tilefloat::codec::{decode as codec_decode, round as codec_round};
use tilefloat::fma::fma;
use tilefloat::format::Format;
use tilefloat::grs;
use tilefloat::tile::{Block, Tile};

#[derive(Parser, Debug)]
#[command(name = "tilefloat", author, version, about = "Micro-float FMA tile reference model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw hex bit pattern to its real value.
    Decode {
        /// fp16, e5m2, or e4m3.
        format: FormatArg,
        /// Hex bit pattern, e.g. 0x3c00.
        bits: String,
    },
    /// Round a real value to the nearest representable code and print its hex pattern.
    Encode {
        format: FormatArg,
        /// The value to round, e.g. 1.5 or inf or nan.
        value: String,
    },
    /// FMA(A, B, C) -> FP16 (or, with --half, E5M2).
    Fma {
        a_format: FormatArg,
        a_bits: String,
        b_format: FormatArg,
        b_bits: String,
        /// FP16 hex bit pattern for C; omit to treat C as +0.
        #[arg(long)]
        c_bits: Option<String>,
        #[arg(long)]
        half: bool,
    },
    /// BF16 x BF16 -> FP32 multiply through the GRS core.
    GrsMultiply { a_bits: String, b_bits: String },
    /// FP32 + FP32 -> FP32 add through the GRS core.
    GrsAdd { a_bits: String, b_bits: String },
    /// Steps a freshly-reset tile through a sequence of blocks read from
    /// stdin, one block per line (`col row col_ctrl row_ctrl`, each hex),
    /// printing each emitted output block in the same format.
    TileRun,
}

#[derive(Clone, Copy, Debug)]
enum FormatArg {
    Fp16,
    E5M2,
    E4M3,
}

impl std::str::FromStr for FormatArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fp16" => Ok(FormatArg::Fp16),
            "e5m2" => Ok(FormatArg::E5M2),
            "e4m3" => Ok(FormatArg::E4M3),
            other => Err(format!("unknown format {other:?} (expected fp16, e5m2, or e4m3)")),
        }
    }
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fp16 => Format::Fp16,
            FormatArg::E5M2 => Format::E5M2,
            FormatArg::E4M3 => Format::E4M3,
        }
    }
}

fn parse_hex_bits(s: &str) -> u64 {
    let s = s.trim().strip_prefix("0x").unwrap_or(s.trim());
    u64::from_str_radix(s, 16).unwrap_or_else(|e| {
        eprintln!("invalid hex bit pattern {s:?}: {e}");
        std::process::exit(1);
    })
}

fn parse_value(s: &str) -> f64 {
    match s.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" => f64::INFINITY,
        "-inf" | "-infinity" => f64::NEG_INFINITY,
        "nan" => f64::NAN,
        other => other.parse().unwrap_or_else(|e| {
            eprintln!("invalid numeric value {other:?}: {e}");
            std::process::exit(1);
        }),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Decode { format, bits } => {
            let format: Format = format.into();
            let value = codec_decode::decode(format, parse_hex_bits(&bits) as u32);
            println!("{value}");
        }
        Commands::Encode { format, value } => {
            let format: Format = format.into();
            let bits = codec_round::encode(format, parse_value(&value));
            println!("{:#x}", bits);
        }
        Commands::Fma { a_format, a_bits, b_format, b_bits, c_bits, half } => {
            let a_format: Format = a_format.into();
            let b_format: Format = b_format.into();
            let c = c_bits.map(|s| parse_hex_bits(&s) as u16);
            let result = fma(a_format, parse_hex_bits(&a_bits) as u32, b_format, parse_hex_bits(&b_bits) as u32, c, half);
            println!("{:#x}", result);
        }
        Commands::GrsMultiply { a_bits, b_bits } => {
            let result = grs::multiply_bf16(parse_hex_bits(&a_bits) as u16, parse_hex_bits(&b_bits) as u16);
            println!("{:#x}", result);
        }
        Commands::GrsAdd { a_bits, b_bits } => {
            let result = grs::add_fp32(parse_hex_bits(&a_bits) as u32, parse_hex_bits(&b_bits) as u32);
            println!("{:#x}", result);
        }
        Commands::TileRun => run_tile_from_stdin(),
    }
}

fn run_tile_from_stdin() {
    let mut tile = Tile::reset();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.expect("reading a line from stdin");
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let [col, row, col_ctrl, row_ctrl] = fields[..] else {
            eprintln!("expected 4 fields \"col row col_ctrl row_ctrl\", got {line:?}");
            std::process::exit(1);
        };
        let block_in = Block {
            col: parse_hex_bits(col) as u16,
            row: parse_hex_bits(row) as u16,
            col_ctrl: parse_hex_bits(col_ctrl) as u8,
            row_ctrl: parse_hex_bits(row_ctrl) as u8,
        };
        let block_out = tile.step(block_in);
        println!(
            "{:#06x} {:#06x} {:#03x} {:#03x}",
            block_out.col, block_out.row, block_out.col_ctrl, block_out.row_ctrl
        );
    }
}
