/// One past the last addressable byte of the 32-bit address space.
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start_address: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(start_address: u32, data: Vec<u8>) -> Self {
        debug_assert!(
            (data.len() as u64) <= ADDRESS_SPACE_END,
            "segment data exceeds the 32-bit address space"
        );
        Self {
            start_address,
            data,
        }
    }

    pub fn as_view(&self) -> SegmentRef<'_> {
        SegmentRef {
            start_address: self.start_address,
            data: &self.data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Exclusive end address, widened so a segment touching the top of memory fits.
    pub fn end(&self) -> u64 {
        self.as_view().end()
    }

    pub fn overlaps(&self, other: &Segment) -> bool {
        self.as_view().overlaps(&other.as_view())
    }
}

/// Borrowed view of a segment stored inside a [`MemoryImage`](crate::MemoryImage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRef<'a> {
    pub start_address: u32,
    pub data: &'a [u8],
}

impl SegmentRef<'_> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn end(&self) -> u64 {
        self.start_address as u64 + self.data.len() as u64
    }

    /// Half-open intersection test. Segments that merely abut do not overlap.
    pub fn overlaps(&self, other: &SegmentRef<'_>) -> bool {
        ranges_overlap(
            self.start_address as u64,
            self.end(),
            other.start_address as u64,
            other.end(),
        )
    }

    pub fn to_segment(&self) -> Segment {
        Segment::new(self.start_address, self.data.to_vec())
    }
}

/// `[a_start, a_end)` and `[b_start, b_end)` share at least one byte.
pub(crate) fn ranges_overlap(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> bool {
    a_start < a_end && b_start < b_end && a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_is_exclusive() {
        let seg = Segment::new(0x1000, vec![0; 0x10]);
        assert_eq!(seg.end(), 0x1010);
    }

    #[test]
    fn test_end_at_top_of_memory() {
        let seg = Segment::new(u32::MAX, vec![0xAA]);
        assert_eq!(seg.end(), ADDRESS_SPACE_END);
    }

    #[test]
    fn test_overlap_partial() {
        let a = Segment::new(0x1000, vec![0; 0x100]);
        let b = Segment::new(0x10F0, vec![0; 0x100]);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_overlap_contained() {
        let outer = Segment::new(0x1000, vec![0; 0x100]);
        let inner = Segment::new(0x1010, vec![0; 4]);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_adjacent_does_not_overlap() {
        let a = Segment::new(0x1000, vec![0; 0x100]);
        let b = Segment::new(0x1100, vec![0; 0x100]);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_same_start_overlaps() {
        let a = Segment::new(0x1000, vec![0; 1]);
        let b = Segment::new(0x1000, vec![0; 1]);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_empty_never_overlaps() {
        let a = Segment::new(0x1000, vec![]);
        let b = Segment::new(0x0F00, vec![0; 0x200]);
        assert!(!a.overlaps(&b));
    }
}
