use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("could not parse file type from {0}: expected a .hex or .bin extension")]
    UnknownExtension(String),

    #[error("could not parse file type from {0}: only .bin files take a load address")]
    AddressNotAllowed(String),

    #[error("could not parse file type from {path}: invalid address '{address}'")]
    InvalidAddress { path: String, address: String },

    #[error("could not parse file type from {0}: more than one ':'")]
    TooManySeparators(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    IntelHex,
    /// Raw image whose first byte sits at `base_address`.
    Binary { base_address: u32 },
}

/// A parsed `path[:address]` file argument.
///
/// Grammar: `<name>.hex`, `<name>.bin` or `<name>.bin:<address>`, where the
/// address is decimal, `0x`-prefixed hex or `0b`-prefixed binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub format: FileFormat,
    pub path: PathBuf,
}

impl Directive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_hex(&self) -> bool {
        matches!(self.format, FileFormat::IntelHex)
    }

    /// Load/output base address; always 0 for Intel HEX.
    pub fn base_address(&self) -> u32 {
        match self.format {
            FileFormat::IntelHex => 0,
            FileFormat::Binary { base_address } => base_address,
        }
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let file = parts.next().unwrap_or_default();
        let address = parts.next();
        if parts.next().is_some() {
            return Err(DirectiveError::TooManySeparators(s.to_string()));
        }

        let path = PathBuf::from(file);
        let extension = path.extension().and_then(|e| e.to_str());
        let format = match (extension, address) {
            (Some("hex"), None) => FileFormat::IntelHex,
            (Some("hex"), Some(_)) => return Err(DirectiveError::AddressNotAllowed(s.to_string())),
            (Some("bin"), None) => FileFormat::Binary { base_address: 0 },
            (Some("bin"), Some(address)) => FileFormat::Binary {
                base_address: parse_address(address).ok_or_else(|| {
                    DirectiveError::InvalidAddress {
                        path: s.to_string(),
                        address: address.to_string(),
                    }
                })?,
            },
            _ => return Err(DirectiveError::UnknownExtension(s.to_string())),
        };

        Ok(Self { format, path })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            FileFormat::IntelHex | FileFormat::Binary { base_address: 0 } => {
                write!(f, "{}", self.path.display())
            }
            FileFormat::Binary { base_address } => {
                write!(f, "{}:{base_address:#X}", self.path.display())
            }
        }
    }
}

/// Decimal, `0x` hex or `0b` binary; digits only, no sign or separators.
fn parse_address(s: &str) -> Option<u32> {
    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = s.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, s)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
