use tracing::info;

use crate::engine::{Engine, EngineOptions, MergeSummary};
use crate::{Confirm, Directive, Error, loader};

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub per_input: Vec<MergeSummary>,
    pub output_bytes: usize,
}

impl MergeReport {
    pub fn skipped(&self) -> usize {
        self.per_input.iter().map(|s| s.skipped).sum()
    }
}

/// Load every input in order, fold it into one image and write `output`.
///
/// Inputs are loaded lazily, one at a time, so a decode failure on a later
/// file happens after earlier prompts have been answered.
pub fn merge_files<C: Confirm>(
    inputs: &[Directive],
    output: &Directive,
    confirm: C,
    options: EngineOptions,
) -> Result<MergeReport, Error> {
    let mut engine = Engine::new(confirm, options);
    let mut report = MergeReport::default();

    for (index, input) in inputs.iter().enumerate() {
        info!("Loading file {} ({input})", index + 1);
        let image = loader::load(input)?;
        report.per_input.push(engine.merge(&image, input.path())?);
    }

    report.output_bytes = engine.image().total_bytes();
    engine.emit(output)?;
    Ok(report)
}
