use core::fmt;

use crate::checksum::checksum;
use crate::error::SerializeError;
use crate::IHex;

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// Longest possible line: 255 data bytes plus five header and checksum
/// bytes, hex encoded, behind the colon.
pub const MAX_RECORD_LENGTH: usize = 1 + 2 * (0xFF + 5);

impl<'a> IHex<'a> {
    /// Writes the record as an uppercase line into `buffer` and returns how
    /// many bytes were used.
    pub fn serialize<T>(&self, buffer: &mut T) -> Result<usize, SerializeError>
    where
        T: AsMut<[u8]>,
    {
        let record_type = self.record_type();

        match self {
            Self::Data { offset, bytes } => format(record_type, *offset, bytes, buffer),
            Self::EndOfFile => format(record_type, 0, &[], buffer),
            Self::ExtendedSegmentAddress(segment) => {
                format(record_type, 0, &segment.to_be_bytes(), buffer)
            }
            Self::StartAddress => format(record_type, 0, &[0x00, 0x00], buffer),
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a> IHex<'a> {
    /// Serializes into a freshly allocated line.
    pub fn to_vec(&self) -> Result<Vec<u8>, SerializeError> {
        let mut line = vec![0; self.encoded_len()];
        self.serialize(&mut line)?;

        Ok(line)
    }
}

fn format<T>(record_type: u8, offset: u16, data: &[u8], buffer: &mut T) -> Result<usize, SerializeError>
where
    T: AsMut<[u8]>,
{
    if data.len() > 0xFF {
        return Err(SerializeError::DataTooLong(data.len()));
    }

    let buffer = buffer.as_mut();
    let data_length = 1 + 2 + 1 + data.len() + 1;

    let buffer_length = 2 * data_length + 1;
    let too_small = SerializeError::BufferTooSmall {
        needed: buffer_length,
        available: buffer.len(),
    };
    if buffer.len() < buffer_length {
        return Err(too_small);
    }

    let mut bytes = [0; 0xFF + 5];
    bytes[0] = data.len() as u8;
    bytes[1..3].copy_from_slice(&offset.to_be_bytes());
    bytes[3] = record_type;
    bytes[4..data_length - 1].copy_from_slice(data);
    bytes[data_length - 1] = checksum(&bytes[..data_length - 1]);

    buffer[0] = b':';

    let digits = &mut buffer[1..buffer_length];
    if hex::encode_to_slice(&bytes[..data_length], digits).is_err() {
        return Err(too_small);
    }
    digits.make_ascii_uppercase();

    Ok(buffer_length)
}

impl<'a> fmt::Display for IHex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0; MAX_RECORD_LENGTH];
        let length = self.serialize(&mut buffer).map_err(|_| fmt::Error)?;

        // Only ASCII hex digits and the colon are ever written.
        let line = core::str::from_utf8(&buffer[..length]).map_err(|_| fmt::Error)?;
        f.write_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EOF_RECORD;

    #[test]
    fn serialize_data() {
        let record = IHex::Data {
            offset: 0x0010,
            bytes: &[
                0x61, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x20, 0x67, 0x61, 0x70,
            ],
        };

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":0B0010006164647265737320676170A7");
    }

    #[test]
    fn serialize_full_chunk() {
        let record = IHex::Data {
            offset: 0x0000,
            bytes: &[0xAA; 32],
        };

        let mut buffer = [0; MAX_RECORD_LENGTH];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..9], b":20000000");
        assert_eq!(&buffer[9..length - 2], &[b'A'; 64][..]);
        assert_eq!(&buffer[length - 2..length], b"A0");
    }

    #[test]
    fn serialize_eof() {
        let record = IHex::EndOfFile;

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], EOF_RECORD.as_bytes());
    }

    #[test]
    fn serialize_extended_segment_address() {
        let record = IHex::ExtendedSegmentAddress(0x12FE);

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":0200000212FEEC");
    }

    #[test]
    fn serialize_start_address() {
        let record = IHex::StartAddress;

        let mut buffer = [0; 0x200];
        let length = record.serialize(&mut buffer).unwrap();

        assert_eq!(&buffer[..length], b":020000040000FA");
    }

    #[test]
    fn largest_record_fits() {
        let record = IHex::Data {
            offset: 0xFFFF,
            bytes: &[0xFF; 0xFF],
        };

        let mut buffer = [0; MAX_RECORD_LENGTH];
        assert_eq!(record.serialize(&mut buffer), Ok(MAX_RECORD_LENGTH));
        assert_eq!(&buffer[..9], b":FFFFFF00");
    }

    #[test]
    fn buffer_too_small() {
        let mut buffer = [0; 10];

        assert_eq!(
            IHex::StartAddress.serialize(&mut buffer),
            Err(SerializeError::BufferTooSmall {
                needed: 15,
                available: 10
            })
        );
    }

    #[test]
    fn data_too_long() {
        let record = IHex::Data {
            offset: 0,
            bytes: &[0; 0x100],
        };

        let mut buffer = [0; 0x400];
        assert_eq!(
            record.serialize(&mut buffer),
            Err(SerializeError::DataTooLong(0x100))
        );
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn to_vec() {
        let record = IHex::Data {
            offset: 0x0030,
            bytes: &[0x02, 0x33, 0x7A],
        };

        assert_eq!(record.to_vec().unwrap(), b":0300300002337A1E".to_vec());
    }

    #[test]
    #[cfg(feature = "std")]
    fn display() {
        assert_eq!(IHex::ExtendedSegmentAddress(1).to_string(), ":020000020001FB");
        assert_eq!(IHex::EndOfFile.to_string(), EOF_RECORD);
    }
}
