use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::segment::{ADDRESS_SPACE_END, Segment, SegmentRef, ranges_overlap};

/// A sparse 32-bit address space.
///
/// Stored segments are always disjoint and never touch: every write replaces
/// the bytes it covers ("last wins") and coalesces with neighbours it overlaps
/// or abuts. Segments are keyed by start address, so overlap queries are an
/// ordered-map range lookup rather than a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    segments: BTreeMap<u32, Vec<u8>>,
    start_address: Option<u32>,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an image by writing each segment in order. Later segments win on overlap.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        let mut image = Self::new();
        for segment in segments {
            image.write(segment.start_address, &segment.data);
        }
        image
    }

    /// Segments in ascending address order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentRef<'_>> + '_ {
        self.segments.iter().map(|(&start_address, data)| SegmentRef {
            start_address,
            data,
        })
    }

    pub fn to_segments(&self) -> Vec<Segment> {
        self.segments().map(|s| s.to_segment()).collect()
    }

    /// Number of stored (coalesced) segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn min_address(&self) -> Option<u32> {
        self.segments.keys().next().copied()
    }

    /// Inclusive address of the last stored byte.
    pub fn max_address(&self) -> Option<u32> {
        self.segments
            .iter()
            .next_back()
            .map(|(&start, data)| (start as u64 + data.len() as u64 - 1) as u32)
    }

    pub fn total_bytes(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    /// Execution start address from an Intel HEX start record, if any.
    pub fn start_address(&self) -> Option<u32> {
        self.start_address
    }

    pub fn set_start_address(&mut self, address: Option<u32>) {
        self.start_address = address;
    }

    pub fn read_byte(&self, addr: u32) -> Option<u8> {
        let (&start, data) = self.segments.range(..=addr).next_back()?;
        data.get((addr - start) as usize).copied()
    }

    /// Stored segments intersecting `[address, address + len)`, in address order.
    pub fn overlapping(&self, address: u32, len: usize) -> Vec<SegmentRef<'_>> {
        let start = address as u64;
        let end = (start + len as u64).min(ADDRESS_SPACE_END);
        if start >= end {
            return Vec::new();
        }

        let mut found = Vec::new();
        if let Some((&k, data)) = self.segments.range(..address).next_back()
            && ranges_overlap(k as u64, k as u64 + data.len() as u64, start, end)
        {
            found.push(SegmentRef {
                start_address: k,
                data,
            });
        }
        found.extend(
            self.segments
                .range(address..)
                .take_while(|&(&k, _)| (k as u64) < end)
                .map(|(&start_address, data)| SegmentRef {
                    start_address,
                    data,
                }),
        );
        found
    }

    /// Store `data` at `address`, replacing whatever occupied that range.
    /// Bytes that would fall past the top of the 32-bit address space are dropped.
    pub fn write(&mut self, address: u32, data: &[u8]) {
        let start = address as u64;
        let room = (ADDRESS_SPACE_END - start) as usize;
        let data = &data[..data.len().min(room)];
        if data.is_empty() {
            return;
        }
        let end = start + data.len() as u64;

        // Segment at or before `address` that overlaps or touches the new range.
        let anchor = self
            .segments
            .range(..=address)
            .next_back()
            .filter(|&(&k, v)| k as u64 + v.len() as u64 >= start)
            .map(|(&k, _)| k);

        // Segments starting inside the new range, or exactly at its end.
        let followers: Vec<u32> = self
            .segments
            .range((Excluded(address), Unbounded))
            .take_while(|&(&k, _)| (k as u64) <= end)
            .map(|(&k, _)| k)
            .collect();

        let mut tail = Vec::new();
        for k in followers {
            if let Some(existing) = self.segments.remove(&k) {
                let existing_end = k as u64 + existing.len() as u64;
                if existing_end > end {
                    tail = existing[(end - k as u64) as usize..].to_vec();
                }
            }
        }

        match anchor.and_then(|k| self.segments.get_mut(&k).map(|v| (k, v))) {
            Some((k, existing)) => {
                let cut = (start - k as u64) as usize;
                if k as u64 + existing.len() as u64 > end {
                    existing[cut..cut + data.len()].copy_from_slice(data);
                } else {
                    existing.truncate(cut);
                    existing.extend_from_slice(data);
                    existing.extend_from_slice(&tail);
                }
            }
            None => {
                let mut bytes = Vec::with_capacity(data.len() + tail.len());
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(&tail);
                self.segments.insert(address, bytes);
            }
        }
    }
}
