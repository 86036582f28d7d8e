use crate::{MaintError, Result};

/// Character fields the editor knows how to patch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CharField {
    Experience,
}

/// Locates one unsigned little-endian value inside the opaque user record.
#[derive(Copy, Clone, Debug)]
pub struct FieldDescriptor {
    pub field: CharField,
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

// Known offsets inside the 1.11p MMUD user record. Only experience is wired
// up today; the currency words are reserved until someone needs them:
//   runic low byte @ 0x5FF, platinum @ 0x603, gold @ 0x607,
//   silver @ 0x60B, copper farthings @ 0x60F (all 32-bit).
pub const CHAR_FIELDS: &[FieldDescriptor] = &[FieldDescriptor {
    field: CharField::Experience,
    name: "experience",
    offset: 0x46F,
    width: 4,
}];

impl CharField {
    pub fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            CharField::Experience => &CHAR_FIELDS[0],
        }
    }
}

/// Decodes the field as an unsigned little-endian integer.
pub fn get_field(blob: &[u8], desc: &FieldDescriptor) -> Result<u64> {
    let end = field_span(blob, desc)?;
    let mut value = 0u64;
    for (i, byte) in blob[desc.offset..end].iter().enumerate() {
        value |= u64::from(*byte) << (8 * i);
    }
    Ok(value)
}

/// Writes `value` into the field in place, least-significant byte first.
/// Every byte outside `[offset, offset + width)` is left untouched.
pub fn set_field(blob: &mut [u8], desc: &FieldDescriptor, value: u64) -> Result<()> {
    if desc.width < 8 && value >> (8 * desc.width) != 0 {
        return Err(MaintError::ValueOutOfBounds {
            field: desc.name,
            width: desc.width,
            value,
        });
    }
    let end = field_span(blob, desc)?;
    for (i, byte) in blob[desc.offset..end].iter_mut().enumerate() {
        *byte = (value >> (8 * i)) as u8;
    }
    Ok(())
}

fn field_span(blob: &[u8], desc: &FieldDescriptor) -> Result<usize> {
    match desc.offset.checked_add(desc.width) {
        Some(end) if end <= blob.len() => Ok(end),
        _ => Err(MaintError::OutOfRange {
            field: desc.name,
            offset: desc.offset,
            width: desc.width,
            len: blob.len(),
        }),
    }
}
