use hexm::{Always, Confirm, Directive, EngineOptions, MergeReport, Prompt, validate};
use tracing::info;

use super::error::CliError;
use super::types::Args;

const MIB: u64 = 1024 * 1024;

impl Args {
    /// Split FILE arguments into inputs and the trailing output.
    pub fn split_files(&self) -> Result<(&[String], &String), CliError> {
        match self.files.split_last() {
            Some((output, inputs)) if !inputs.is_empty() => Ok((inputs, output)),
            _ => Err(CliError::Usage("not enough files specified".into())),
        }
    }

    fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            granularity: self.confirm_per.into(),
            max_padding: self.max_padding_mib.saturating_mul(MIB),
            bytes_per_line: self.bytes_per_line,
        }
    }

    pub fn execute(&self) -> Result<MergeReport, CliError> {
        let (inputs, output) = self.split_files()?;
        info!("Input files: {inputs:?}");
        info!("Output file: {output}");

        let inputs = inputs
            .iter()
            .map(|s| s.parse::<Directive>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(hexm::Error::from)?;
        let output: Directive = output.parse().map_err(hexm::Error::from)?;

        let mut confirm: Box<dyn Confirm> = if self.yes {
            Box::new(Always(true))
        } else {
            Box::new(Prompt::stdio())
        };

        validate::check_inputs(&inputs)?;
        validate::check_output(&output, confirm.as_mut())?;

        let report = hexm::merge_files(&inputs, &output, confirm.as_mut(), self.engine_options())?;
        info!("Wrote {} bytes of image data to {output}", report.output_bytes);
        if report.skipped() > 0 {
            info!("{} segment(s) were not merged", report.skipped());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("hexm").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_split_inputs_and_output() {
        let args = args(&["1.hex", "2.hex", "3.hex"]);
        let (inputs, output) = args.split_files().unwrap();
        assert_eq!(inputs, ["1.hex", "2.hex"]);
        assert_eq!(output, "3.hex");
    }

    #[test]
    fn test_split_needs_two_files() {
        for argv in [vec!["1.hex"], vec![]] {
            let err = args(&argv).split_files().unwrap_err();
            assert_eq!(err.to_string(), "not enough files specified");
        }
    }

    #[test]
    fn test_engine_options_from_flags() {
        let args = args(&["--confirm-per", "overlap", "--max-padding-mib", "2", "a.hex", "b.hex"]);
        let options = args.engine_options();
        assert_eq!(options.granularity, hexm::ConfirmGranularity::PerOverlap);
        assert_eq!(options.max_padding, 2 * MIB);
        assert_eq!(options.bytes_per_line, 32);
    }

    #[test]
    fn test_bad_directive_fails_before_io() {
        let err = args(&["-y", "in.elf", "out.bin"]).execute().unwrap_err();
        assert!(err.to_string().contains("in.elf"));
    }
}
