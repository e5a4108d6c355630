use std::borrow::Cow;

use crate::utils::mem_reader::{self, MemReader};

pub const HEADER_SIZE: usize = 38;
pub const NAME_SIZE: usize = 16;
pub const MAP_PLANE_COUNT: usize = 3;

/// The fixed trailer closing each map record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    plane_starts: [i32; MAP_PLANE_COUNT],
    plane_lengths: [u16; MAP_PLANE_COUNT],
    width: u16,
    height: u16,
    name: [u8; NAME_SIZE],
}

impl MapHeader {
    pub fn read_from(reader: &mut MemReader<'_>) -> mem_reader::Result<Self> {
        let mut plane_starts = [0; MAP_PLANE_COUNT];
        for start in &mut plane_starts {
            *start = reader.read_i32_le()?;
        }
        let mut plane_lengths = [0; MAP_PLANE_COUNT];
        for length in &mut plane_lengths {
            *length = reader.read_u16_le()?;
        }
        let width = reader.read_u16_le()?;
        let height = reader.read_u16_le()?;
        let name = reader.read_array::<NAME_SIZE>()?;
        Ok(Self {
            plane_starts,
            plane_lengths,
            width,
            height,
            name,
        })
    }

    #[must_use]
    pub fn plane_start(&self, plane: usize) -> Option<i32> {
        self.plane_starts.get(plane).copied()
    }

    #[must_use]
    pub fn plane_length(&self, plane: usize) -> Option<u16> {
        self.plane_lengths.get(plane).copied()
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The name up to its first NUL.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_SIZE);
        String::from_utf8_lossy(&self.name[..end])
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Size of one fully expanded plane.
    #[must_use]
    pub fn plane_byte_len(&self) -> usize {
        self.tile_count() * 2
    }
}
