mod binary;
mod error;
mod intel_hex;

pub use binary::{BinaryWriteOptions, DEFAULT_MAX_PADDING, parse_binary, write_binary};
pub use error::{BinaryWriteError, ParseError};
pub use intel_hex::{IntelHexWriteOptions, parse_intel_hex, write_intel_hex};
