use std::path::Path;

use tracing::{debug, info, warn};

use super::{ConfirmGranularity, Engine, EngineState};
use crate::{Confirm, Error, MemoryImage, SegmentRef};

/// What happened to one input image's segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub written: usize,
    pub skipped: usize,
    pub prompts: usize,
}

impl<C: Confirm> Engine<C> {
    /// Fold `image` into the accumulator, segment by segment.
    ///
    /// Segments that overlap nothing are written directly. Overlapping ones
    /// are written (last wins) only after confirmation, asked at the
    /// configured [`ConfirmGranularity`]. `source` names the file in prompts.
    pub fn merge(&mut self, image: &MemoryImage, source: &Path) -> Result<MergeSummary, Error> {
        if self.state == EngineState::Failed {
            return Err(Error::Aborted);
        }
        match self.merge_segments(image, source) {
            Ok(summary) => {
                self.state = match self.state {
                    EngineState::Accumulating { images } => EngineState::Accumulating {
                        images: images + 1,
                    },
                    _ => EngineState::Accumulating { images: 1 },
                };
                Ok(summary)
            }
            Err(e) => {
                self.state = EngineState::Failed;
                Err(e)
            }
        }
    }

    fn merge_segments(
        &mut self,
        image: &MemoryImage,
        source: &Path,
    ) -> Result<MergeSummary, Error> {
        let mut summary = MergeSummary::default();

        for (index, segment) in image.segments().enumerate() {
            info!(
                "Section {} @ 0x{:08X} ; len {}",
                index + 1,
                segment.start_address,
                segment.len()
            );

            let approved = if self.image.is_empty() {
                true
            } else {
                let overlapped: Vec<(u32, usize)> = self
                    .image
                    .overlapping(segment.start_address, segment.len())
                    .iter()
                    .map(|s| (s.start_address, s.len()))
                    .collect();
                self.approve(segment, &overlapped, source, &mut summary)?
            };

            if approved {
                self.image.write(segment.start_address, segment.data);
                summary.written += 1;
            } else {
                warn!(
                    "Did not merge the segment @ 0x{:08X} from {}",
                    segment.start_address,
                    source.display()
                );
                summary.skipped += 1;
            }
        }

        if let Some(entry) = image.start_address() {
            if let Some(previous) = self.image.start_address()
                && previous != entry
            {
                debug!(
                    "start address 0x{previous:08X} replaced by 0x{entry:08X} from {}",
                    source.display()
                );
            }
            self.image.set_start_address(Some(entry));
        }

        Ok(summary)
    }

    fn approve(
        &mut self,
        segment: SegmentRef<'_>,
        overlapped: &[(u32, usize)],
        source: &Path,
        summary: &mut MergeSummary,
    ) -> Result<bool, Error> {
        if overlapped.is_empty() {
            return Ok(true);
        }
        for &(start, len) in overlapped {
            debug!(
                "segment @ 0x{:08X} (len {}) overlaps stored segment @ 0x{start:08X} (len {len})",
                segment.start_address,
                segment.len()
            );
        }

        let prompt = format!(
            "Merging segment @ 0x{:08X} from file {} will overwrite existing data, continue?",
            segment.start_address,
            source.display()
        );
        let asks = match self.options.granularity {
            ConfirmGranularity::PerSegment => 1,
            ConfirmGranularity::PerOverlap => overlapped.len(),
        };

        let mut approved = false;
        for _ in 0..asks {
            summary.prompts += 1;
            if self
                .confirm
                .confirm(&prompt)
                .map_err(|e| Error::io("<stdin>", e))?
            {
                approved = true;
            }
        }
        Ok(approved)
    }
}
