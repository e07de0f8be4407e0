use std::io::{Seek, SeekFrom, Write};

use tracing::{info, warn};

use super::{BinaryWriteError, ParseError};
use crate::{Confirm, MemoryImage};

/// Largest gap the binary writer will pad without asking first (128 MiB).
pub const DEFAULT_MAX_PADDING: u64 = 128 * 1024 * 1024;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct BinaryWriteOptions {
    /// Address that maps to offset 0 of the output.
    pub base_address: u32,
    /// Padding (in bytes) beyond which a confirmation is requested.
    pub max_padding: u64,
}

impl Default for BinaryWriteOptions {
    fn default() -> Self {
        Self {
            base_address: 0,
            max_padding: DEFAULT_MAX_PADDING,
        }
    }
}

/// Place a raw binary blob as a single segment at `base_address`.
pub fn parse_binary(data: &[u8], base_address: u32) -> Result<MemoryImage, ParseError> {
    if base_address as u64 + data.len() as u64 > 1 << 32 {
        return Err(ParseError::AddressOverflow(format!(
            "{:#X} + {} exceeds u32",
            base_address,
            data.len()
        )));
    }
    let mut image = MemoryImage::new();
    image.write(base_address, data);
    Ok(image)
}

/// Write the image as a flat binary, rebased so `options.base_address` lands at offset 0.
///
/// Bytes below the base address are dropped. Gaps are left to the writer's
/// seek-past-end behaviour, which zero-fills for files and in-memory cursors.
/// A gap larger than `options.max_padding` is only written after `confirm`
/// approves it; a refusal stops the write with segments already flushed left as-is.
///
/// Returns the length of the written output.
pub fn write_binary<W, C>(
    image: &MemoryImage,
    options: &BinaryWriteOptions,
    writer: &mut W,
    confirm: &mut C,
) -> Result<u64, BinaryWriteError>
where
    W: Write + Seek,
    C: Confirm + ?Sized,
{
    let base = options.base_address as u64;
    let mut written: u64 = 0;

    for (index, segment) in image.segments().enumerate() {
        let start = segment.start_address as u64;
        if segment.end() <= base {
            warn!(
                "section {} @ {:#010X} lies below output base {:#010X}, skipped",
                index + 1,
                segment.start_address,
                base
            );
            continue;
        }
        let skip = base.saturating_sub(start) as usize;
        if skip > 0 {
            warn!(
                "section {} @ {:#010X}: dropping {skip} bytes below output base {:#010X}",
                index + 1,
                segment.start_address,
                base
            );
        }
        let data = &segment.data[skip..];
        let offset = start.saturating_sub(base);

        let padding = offset.saturating_sub(written);
        if padding > options.max_padding {
            let padding_mib = padding / MIB;
            let prompt = format!(
                "Writing section @ {:#010X} requires padding the output by {padding_mib} MB, continue?",
                segment.start_address
            );
            if !confirm.confirm(&prompt)? {
                return Err(BinaryWriteError::PaddingDeclined {
                    address: segment.start_address,
                    padding_mib,
                });
            }
        }

        info!(
            "Writing {} bytes @ {offset:08X} for section {}",
            data.len(),
            index + 1
        );
        writer.seek(SeekFrom::Start(offset))?;
        writer.write_all(data)?;
        written = written.max(offset + data.len() as u64);
    }

    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{Scripted, Segment};

    fn render(image: &MemoryImage, base_address: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        let options = BinaryWriteOptions {
            base_address,
            ..Default::default()
        };
        write_binary(image, &options, &mut out, &mut Scripted::new([])).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_parse_binary_base_address() {
        let data = vec![0xAA, 0xBB, 0xCC];
        let image = parse_binary(&data, 0x1000).unwrap();
        assert_eq!(image.to_segments(), vec![Segment::new(0x1000, data)]);
    }

    #[test]
    fn test_parse_binary_overflow() {
        assert!(parse_binary(&[0xAA, 0xBB], u32::MAX).is_err());
        assert!(parse_binary(&[0xAA], u32::MAX).is_ok());
    }

    #[test]
    fn test_parse_binary_empty() {
        assert!(parse_binary(&[], 0x1000).unwrap().is_empty());
    }

    #[test]
    fn test_base_at_lowest_segment_has_no_padding() {
        let image = MemoryImage::with_segments(vec![Segment::new(0x1000, vec![1, 2, 3])]);
        assert_eq!(render(&image, 0x1000), vec![1, 2, 3]);
    }

    #[test]
    fn test_base_below_lowest_segment_pads_with_zero() {
        let image = MemoryImage::with_segments(vec![Segment::new(0x1004, vec![1, 2])]);
        assert_eq!(render(&image, 0x1000), vec![0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_gaps_between_segments_are_zero() {
        let image = MemoryImage::with_segments(vec![
            Segment::new(0x10, vec![0xAA]),
            Segment::new(0x13, vec![0xBB]),
        ]);
        assert_eq!(render(&image, 0x10), vec![0xAA, 0, 0, 0xBB]);
    }

    #[test]
    fn test_base_inside_segment_truncates_leading_bytes() {
        let image = MemoryImage::with_segments(vec![
            Segment::new(0x0FFE, vec![1, 2, 3, 4]),
            Segment::new(0x1008, vec![9]),
        ]);
        let out = render(&image, 0x1000);
        assert_eq!(&out[..2], &[3, 4]);
        assert_eq!(out.len(), 9);
        assert_eq!(out[8], 9);
    }

    #[test]
    fn test_segment_wholly_below_base_is_dropped() {
        let image = MemoryImage::with_segments(vec![
            Segment::new(0x0100, vec![1, 2, 3, 4]),
            Segment::new(0x1000, vec![5]),
        ]);
        assert_eq!(render(&image, 0x1000), vec![5]);
    }

    #[test]
    fn test_large_padding_declined_aborts() {
        let image = MemoryImage::with_segments(vec![
            Segment::new(0, vec![1]),
            Segment::new(0x100, vec![2]),
        ]);
        let options = BinaryWriteOptions {
            base_address: 0,
            max_padding: 0x10,
        };
        let mut confirm = Scripted::new([false]);
        let mut out = Cursor::new(Vec::new());
        let result = write_binary(&image, &options, &mut out, &mut confirm);
        assert!(matches!(
            result,
            Err(BinaryWriteError::PaddingDeclined { address: 0x100, .. })
        ));
        assert_eq!(confirm.prompts().len(), 1);
        // first segment already flushed
        assert_eq!(out.into_inner(), vec![1]);
    }

    #[test]
    fn test_large_padding_confirmed_writes() {
        let image = MemoryImage::with_segments(vec![Segment::new(0x40, vec![7])]);
        let options = BinaryWriteOptions {
            base_address: 0,
            max_padding: 0x10,
        };
        let mut confirm = Scripted::new([true]);
        let mut out = Cursor::new(Vec::new());
        let len = write_binary(&image, &options, &mut out, &mut confirm).unwrap();
        assert_eq!(len, 0x41);
        assert_eq!(confirm.prompts().len(), 1);
        assert!(confirm.prompts()[0].contains("0 MB"));
    }

    #[test]
    fn test_padding_within_threshold_is_silent() {
        let image = MemoryImage::with_segments(vec![Segment::new(0x10, vec![7])]);
        let options = BinaryWriteOptions {
            base_address: 0,
            max_padding: 0x10,
        };
        let mut confirm = Scripted::new([]);
        let mut out = Cursor::new(Vec::new());
        write_binary(&image, &options, &mut out, &mut confirm).unwrap();
        assert!(confirm.prompts().is_empty());
    }
}
