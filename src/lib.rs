pub mod confirm;
pub mod directive;
pub mod engine;
pub mod error;
pub mod image;
pub mod io;
pub mod loader;
pub mod pipeline;
pub mod segment;
pub mod validate;

pub use confirm::{Always, Confirm, Prompt, Scripted};
pub use directive::{Directive, DirectiveError, FileFormat};
pub use engine::{ConfirmGranularity, Engine, EngineOptions, EngineState, MergeSummary};
pub use error::Error;
pub use image::MemoryImage;
pub use io::{
    BinaryWriteError, BinaryWriteOptions, DEFAULT_MAX_PADDING, IntelHexWriteOptions, ParseError,
    parse_binary, parse_intel_hex, write_binary, write_intel_hex,
};
pub use loader::load;
pub use pipeline::{MergeReport, merge_files};
pub use segment::{Segment, SegmentRef};
