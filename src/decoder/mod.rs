pub mod instruction;

pub use instruction::{AddLiquidity, CreatePool, DecodedInstruction, InitializePool, RemoveLiquidity};

use rust_decimal::Decimal;

use crate::error::DecodeError;
use crate::protocols::{SchemaId, amm_v4};

/// Largest scale a [`Decimal`] can carry.
pub const MAX_DECIMALS: u8 = 28;

/// Width of a little-endian unsigned field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
    U64,
}

impl FieldWidth {
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: FieldWidth,
}

impl FieldSpec {
    pub const fn u8(name: &'static str) -> Self {
        Self {
            name,
            width: FieldWidth::U8,
        }
    }

    pub const fn u16(name: &'static str) -> Self {
        Self {
            name,
            width: FieldWidth::U16,
        }
    }

    pub const fn u32(name: &'static str) -> Self {
        Self {
            name,
            width: FieldWidth::U32,
        }
    }

    pub const fn u64(name: &'static str) -> Self {
        Self {
            name,
            width: FieldWidth::U64,
        }
    }
}

/// Fixed binary layout of one instruction variant: fields in declared order, no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSchema {
    pub id: SchemaId,
    /// Upstream instruction name, used in diagnostics.
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl InstructionSchema {
    pub const fn total_width(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].width.bytes();
            i += 1;
        }
        total
    }
}

/// Read cursor over a payload. Never reads past the end of the buffer.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    pub fn read(&mut self, field: &FieldSpec) -> Result<u64, DecodeError> {
        let needed = field.width.bytes();
        let truncated = DecodeError::Truncated {
            field: field.name,
            offset: self.offset,
            needed,
            remaining: self.remaining(),
        };
        let end = self.offset.checked_add(needed).ok_or(truncated.clone())?;
        let chunk = self.buf.get(self.offset..end).ok_or(truncated)?;
        let value = le_bytes_to_u128(chunk)?;
        self.offset = end;
        u64::try_from(value).map_err(|_| DecodeError::Overflow { width: needed })
    }
}

/// Decode `bytes` against `schema`. The buffer must be exactly `schema.total_width()` long.
pub fn decode(schema: &InstructionSchema, bytes: &[u8]) -> Result<DecodedInstruction, DecodeError> {
    let expected = schema.total_width();
    if bytes.len() > expected {
        return Err(DecodeError::LengthMismatch {
            schema: schema.name,
            expected,
            actual: bytes.len(),
        });
    }

    let mut cursor = ByteCursor::new(bytes);
    let mut values = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        values.push(cursor.read(field)?);
    }

    DecodedInstruction::from_fields(schema, &values)
}

/// Classify then decode. Unrecognised discriminants produce [`DecodedInstruction::Unknown`].
pub fn decode_instruction(bytes: &[u8]) -> Result<DecodedInstruction, DecodeError> {
    let Some(&discriminant) = bytes.first() else {
        return Err(DecodeError::Truncated {
            field: "discriminant",
            offset: 0,
            needed: 1,
            remaining: 0,
        });
    };
    match amm_v4::classify(bytes) {
        Some(id) => decode(amm_v4::schema_for(id), bytes),
        None => Ok(DecodedInstruction::Unknown { discriminant }),
    }
}

/// Exact little-endian to integer conversion.
///
/// Inputs wider than 16 bytes are accepted only when the extra high bytes are zero.
pub fn le_bytes_to_u128(bytes: &[u8]) -> Result<u128, DecodeError> {
    let (low, high) = bytes.split_at(bytes.len().min(16));
    if high.iter().any(|b| *b != 0) {
        return Err(DecodeError::Overflow { width: bytes.len() });
    }
    let mut buf = [0_u8; 16];
    buf[..low.len()].copy_from_slice(low);
    Ok(u128::from_le_bytes(buf))
}

/// Scale a raw base-unit amount (lamports, token atoms) into whole units, exactly.
///
/// Fails with `Overflow` when `raw` needs more than 96 bits or `decimals`
/// exceeds [`MAX_DECIMALS`].
pub fn to_decimal_units(raw: u128, decimals: u8) -> Result<Decimal, DecodeError> {
    let overflow = DecodeError::Overflow { width: 16 };
    if decimals > MAX_DECIMALS {
        return Err(overflow);
    }
    let mantissa = i128::try_from(raw).map_err(|_| overflow.clone())?;
    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals)).map_err(|_| overflow)
}
