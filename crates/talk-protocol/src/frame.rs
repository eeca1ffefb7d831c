//! Bounded audio frame buffers
//!
//! A frame buffer is a fixed-capacity payload region plus the length of the
//! payload currently valid in it. Copies into a buffer are bounded by both
//! the source's valid length and the destination's capacity, so an uplink
//! write can never exceed the frame the link handed out.

/// A bounded audio payload buffer
///
/// Acquired from the link, filled or read, and released back exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "frame buffers must be released back to the link"]
pub struct FrameBuffer {
    data: Vec<u8>,
    valid: usize,
}

impl FrameBuffer {
    /// Create an empty buffer with the given payload capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            valid: 0,
        }
    }

    /// Create a buffer holding a copy of `payload`, bounded by `capacity`
    pub fn from_payload(capacity: usize, payload: &[u8]) -> Self {
        let mut buf = Self::with_capacity(capacity);
        buf.fill_from(payload);
        buf
    }

    /// Payload capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Length of the currently valid payload
    pub fn valid_len(&self) -> usize {
        self.valid
    }

    /// Whether the buffer holds no valid payload
    pub fn is_empty(&self) -> bool {
        self.valid == 0
    }

    /// The currently valid payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.valid]
    }

    /// Copy `src` into the buffer, bounded by capacity
    ///
    /// Copies `min(src.len(), capacity)` bytes, records that as the new
    /// valid length and returns it.
    pub fn fill_from(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.data.len());
        self.data[..n].copy_from_slice(&src[..n]);
        self.valid = n;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_buffer_is_empty() {
        let buf = FrameBuffer::with_capacity(160);
        assert_eq!(buf.capacity(), 160);
        assert_eq!(buf.valid_len(), 0);
        assert!(buf.is_empty());
        assert!(buf.payload().is_empty());
    }

    #[test]
    fn fill_records_valid_len() {
        let mut buf = FrameBuffer::with_capacity(320);
        let copied = buf.fill_from(&[0x5A; 160]);
        assert_eq!(copied, 160);
        assert_eq!(buf.valid_len(), 160);
        assert_eq!(buf.payload(), &[0x5A; 160][..]);
    }

    #[test]
    fn fill_is_bounded_by_capacity() {
        let mut buf = FrameBuffer::with_capacity(160);
        let copied = buf.fill_from(&[0xA5; 320]);
        assert_eq!(copied, 160);
        assert_eq!(buf.valid_len(), 160);
    }

    #[test]
    fn refill_replaces_previous_payload() {
        let mut buf = FrameBuffer::with_capacity(8);
        buf.fill_from(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.fill_from(&[9, 9]);
        assert_eq!(buf.payload(), &[9, 9]);
    }

    #[test]
    fn from_payload_truncates() {
        let buf = FrameBuffer::from_payload(4, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.payload(), &[1, 2, 3, 4]);
    }

    proptest! {
        #[test]
        fn copy_bound_holds(
            cap in 0usize..512,
            src in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let mut buf = FrameBuffer::with_capacity(cap);
            let copied = buf.fill_from(&src);
            prop_assert_eq!(copied, src.len().min(cap));
            prop_assert!(buf.valid_len() <= buf.capacity());
            prop_assert_eq!(buf.payload(), &src[..copied]);
        }
    }
}
