/// Two's complement of the byte sum, so that the record bytes plus the
/// checksum add up to zero modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes
        .iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(u16::from(byte)));

    (!sum).wrapping_add(1) as u8
}

/// Checks a full record, checksum byte included.
pub fn verify(record: &[u8]) -> bool {
    record.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte)) == 0
}
