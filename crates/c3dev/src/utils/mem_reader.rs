//! Bounds-checked little-endian field reading over in-memory buffers.

use std::borrow::Cow;

use bytes::Buf;

pub(crate) trait FromFixedBytes: Sized {
    const SIZE: usize;
    fn parse<B: Buf>(bytes: B) -> Self;
}

macro_rules! impl_fixed_bytes_for_num {
    ($($num:ty),*) => {
        $(
            impl FromFixedBytes for $num {
                const SIZE: usize = std::mem::size_of::<$num>();

                fn parse<B: Buf>(mut bytes: B) -> Self {
                    let mut byte_array = [0u8; <Self as FromFixedBytes>::SIZE];
                    bytes.copy_to_slice(&mut byte_array);
                    Self::from_le_bytes(byte_array)
                }
            }
        )*
    };
}

impl_fixed_bytes_for_num!(i16, i32, u16, u32);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Not enough data in {context} at offset {offset}. Needed {required}, but only {available} available."
    )]
    NotEnoughData {
        context: String,
        offset: usize,
        required: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A cursor over a byte slice. Every read checks the remaining length first,
/// so malformed input surfaces as an [`Error`] naming the structure being
/// parsed rather than as a panic.
#[derive(Debug, Clone)]
pub struct MemReader<'a> {
    context: Cow<'a, str>,
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemReader<'a> {
    pub fn new<C>(context: C, data: &'a [u8]) -> Self
    where
        C: Into<Cow<'a, str>>,
    {
        Self {
            context: context.into(),
            data,
            pos: 0,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next `len` bytes without copying and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::NotEnoughData {
                context: self.context.to_string(),
                offset: self.pos,
                required: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    fn read_value<T: FromFixedBytes>(&mut self) -> Result<T> {
        self.read_bytes(T::SIZE).map(T::parse)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_value()
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        self.read_value()
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_value()
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.read_value()
    }

    /// Reads an unsigned little-endian integer of `width` bytes (at most 8).
    pub fn read_uint_le(&mut self, width: usize) -> Result<u64> {
        assert!(width <= 8, "integer width {width} exceeds 8 bytes");
        let mut bytes = self.read_bytes(width)?;
        Ok(bytes.get_uint_le(width))
    }
}
