//! Compact-u16 length prefix: 7 bits per byte, high bit set on all but the last.

use crate::TransactionError;

/// Append `len` to `buf` in compact-u16 form.
pub fn encode_len(buf: &mut Vec<u8>, len: usize) -> Result<(), TransactionError> {
    if len > u16::MAX as usize {
        return Err(TransactionError::LengthOverflow(len));
    }
    let mut rem = len;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        buf.push(byte);
    }
}
