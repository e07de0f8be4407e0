use tracing::debug;

use crate::directive::{Directive, FileFormat};
use crate::io::{parse_binary, parse_intel_hex};
use crate::{Error, MemoryImage};

/// Read the file named by `directive` into a fresh memory image.
///
/// No address-range policy is applied here; that belongs to the output stage.
pub fn load(directive: &Directive) -> Result<MemoryImage, Error> {
    let path = directive.path();
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;

    let decoded = match directive.format {
        FileFormat::IntelHex => parse_intel_hex(&content),
        FileFormat::Binary { base_address } => parse_binary(&content, base_address),
    };
    let image = decoded.map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "loaded {directive}: {} segment(s), {} bytes",
        image.len(),
        image.total_bytes()
    );
    Ok(image)
}
