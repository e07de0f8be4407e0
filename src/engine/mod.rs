//! Merge & emit engine.
//!
//! The engine owns the accumulated image for one run. Input images are folded
//! in one at a time with [`Engine::merge`]; [`Engine::emit`] consumes the
//! engine and serializes the result.
//!
//! ```text
//! Empty --merge--> Accumulating --merge--> Accumulating --emit--> done
//!   \________________ any error __________________/--> Failed
//! ```

mod emit;
mod merge;

use crate::io::DEFAULT_MAX_PADDING;
use crate::{Confirm, MemoryImage};

pub use merge::MergeSummary;

/// How often to ask when an incoming segment overlaps the accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmGranularity {
    /// One prompt per incoming segment, no matter how many stored segments it
    /// covers. Declining leaves the accumulator untouched by that segment.
    #[default]
    PerSegment,
    /// One prompt per overlapped stored segment. The segment is written once
    /// if any of those prompts is confirmed.
    PerOverlap,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub granularity: ConfirmGranularity,
    /// Padding (bytes) above which binary output asks before writing.
    pub max_padding: u64,
    /// Intel HEX data bytes per record.
    pub bytes_per_line: u8,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            granularity: ConfirmGranularity::default(),
            max_padding: DEFAULT_MAX_PADDING,
            bytes_per_line: 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Empty,
    Accumulating { images: usize },
    Failed,
}

pub struct Engine<C> {
    image: MemoryImage,
    state: EngineState,
    options: EngineOptions,
    confirm: C,
}

impl<C: Confirm> Engine<C> {
    pub fn new(confirm: C, options: EngineOptions) -> Self {
        Self {
            image: MemoryImage::new(),
            state: EngineState::Empty,
            options,
            confirm,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The accumulated image so far.
    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    pub fn into_image(self) -> MemoryImage {
        self.image
    }

    pub fn confirm_mut(&mut self) -> &mut C {
        &mut self.confirm
    }
}
