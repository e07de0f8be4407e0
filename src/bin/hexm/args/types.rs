use clap::{Parser, ValueEnum};

use hexm::ConfirmGranularity;

/// Merge Intel HEX files and raw binaries into a single firmware image.
///
/// Each FILE is `name.hex`, `name.bin` or `name.bin:<address>`, where the
/// address is decimal, `0x` hex or `0b` binary. The last FILE is the output;
/// for binary output its address is the one mapped to offset 0.
#[derive(Debug, Parser)]
#[command(name = "hexm", version, about, long_about)]
pub struct Args {
    /// Input files followed by the output file
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Ask once per incoming segment, or once per overlapped existing segment
    #[arg(long, value_enum, default_value_t = ConfirmPer::Segment)]
    pub confirm_per: ConfirmPer,

    /// Largest gap (MiB) binary output pads without asking
    #[arg(long, default_value_t = 128, value_name = "MIB")]
    pub max_padding_mib: u64,

    /// Data bytes per Intel HEX record
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u8).range(1..))]
    pub bytes_per_line: u8,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfirmPer {
    Segment,
    Overlap,
}

impl From<ConfirmPer> for ConfirmGranularity {
    fn from(value: ConfirmPer) -> Self {
        match value {
            ConfirmPer::Segment => ConfirmGranularity::PerSegment,
            ConfirmPer::Overlap => ConfirmGranularity::PerOverlap,
        }
    }
}
