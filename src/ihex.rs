use crate::types;

/// The End of File record never changes, so it is kept as a literal.
pub const EOF_RECORD: &str = ":00000001FF";

/// A single Intel Hex record.
///
/// Data records borrow their payload, so records can be built straight from
/// a read buffer without copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IHex<'a> {
    Data { offset: u16, bytes: &'a [u8] },
    EndOfFile,
    ExtendedSegmentAddress(u16),
    /// Emitted ahead of the data as `:020000040000FA`.
    StartAddress,
}

impl<'a> IHex<'a> {
    pub fn record_type(&self) -> u8 {
        match self {
            Self::Data { .. } => types::DATA,
            Self::EndOfFile => types::END_OF_FILE,
            Self::ExtendedSegmentAddress(_) => types::EXTENDED_SEGMENT_ADDRESS,
            Self::StartAddress => types::START_ADDRESS,
        }
    }

    pub fn offset(&self) -> u16 {
        match self {
            Self::Data { offset, .. } => *offset,
            _ => 0,
        }
    }

    /// Number of payload bytes, as written in the byte count field.
    pub fn byte_count(&self) -> usize {
        match self {
            Self::Data { bytes, .. } => bytes.len(),
            Self::EndOfFile => 0,
            Self::ExtendedSegmentAddress(_) | Self::StartAddress => 2,
        }
    }

    /// Length of the serialized line, excluding any line ending.
    pub fn encoded_len(&self) -> usize {
        1 + 2 * (1 + 2 + 1 + self.byte_count() + 1)
    }
}
