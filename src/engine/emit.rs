use std::fs::File;
use std::io::BufWriter;

use tracing::info;

use super::{Engine, EngineState};
use crate::directive::{Directive, FileFormat};
use crate::io::{
    BinaryWriteError, BinaryWriteOptions, IntelHexWriteOptions, write_binary, write_intel_hex,
};
use crate::{Confirm, Error};

impl<C: Confirm> Engine<C> {
    /// Serialize the accumulated image to `output`, creating or truncating the file.
    ///
    /// A failure part-way through a binary write leaves whatever was already
    /// flushed on disk.
    pub fn emit(mut self, output: &Directive) -> Result<(), Error> {
        if self.state == EngineState::Failed {
            return Err(Error::Aborted);
        }
        let path = output.path();
        info!(
            "Writing {} segment(s), {} bytes to {output}",
            self.image.len(),
            self.image.total_bytes()
        );

        match output.format {
            FileFormat::IntelHex => {
                let options = IntelHexWriteOptions {
                    bytes_per_line: self.options.bytes_per_line,
                };
                let encoded = write_intel_hex(&self.image, &options);
                std::fs::write(path, encoded).map_err(|e| Error::io(path, e))
            }
            FileFormat::Binary { base_address } => {
                let options = BinaryWriteOptions {
                    base_address,
                    max_padding: self.options.max_padding,
                };
                let file = File::create(path).map_err(|e| Error::io(path, e))?;
                let mut writer = BufWriter::new(file);
                match write_binary(&self.image, &options, &mut writer, &mut self.confirm) {
                    Ok(len) => {
                        info!("Wrote {len} bytes to {}", path.display());
                        Ok(())
                    }
                    Err(BinaryWriteError::Io(e)) => Err(Error::io(path, e)),
                    Err(e @ BinaryWriteError::PaddingDeclined { .. }) => {
                        Err(Error::Declined(e.to_string()))
                    }
                }
            }
        }
    }
}
