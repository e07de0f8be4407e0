//! Pre-flight checks run before any file is loaded: inputs must exist, and an
//! existing output is only replaced after confirmation.

use std::io::ErrorKind;
use std::path::Path;

use crate::{Confirm, Directive, Error};

/// Whether `path` exists. A missing file is `Ok(false)`; other stat failures are errors.
pub fn exists(path: &Path) -> Result<bool, Error> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

pub fn check_inputs(inputs: &[Directive]) -> Result<(), Error> {
    for input in inputs {
        if !exists(input.path())? {
            return Err(Error::NotFound {
                path: input.path().to_path_buf(),
            });
        }
    }
    Ok(())
}

pub fn check_output<C: Confirm + ?Sized>(output: &Directive, confirm: &mut C) -> Result<(), Error> {
    let path = output.path();
    if !exists(path)? {
        return Ok(());
    }
    let prompt = format!("Overwrite {}?", path.display());
    if confirm.confirm(&prompt).map_err(|e| Error::io(path, e))? {
        Ok(())
    } else {
        Err(Error::Declined(format!("not overwriting {}", path.display())))
    }
}
