use std::ops::Range;

use crate::utils::mem_reader::{self, MemReader};

/// How the entries of a directory file are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryFormat {
    entry_width: usize,
    entry_count: usize,
    sparse_marker: Option<u64>,
}

impl DirectoryFormat {
    /// `EGAHEAD`: 3-byte offsets, with `FF FF FF` marking unused chunks.
    pub const GRAPHICS: Self = Self::new(3, 479, Some(0x00FF_FFFF));

    /// `AUDIOHEAD`: 4-byte offsets, every entry present.
    pub const AUDIO: Self = Self::new(4, 92, None);

    #[must_use]
    pub const fn new(entry_width: usize, entry_count: usize, sparse_marker: Option<u64>) -> Self {
        assert!(entry_width > 0 && entry_width <= 8);
        Self {
            entry_width,
            entry_count,
            sparse_marker,
        }
    }

    #[must_use]
    pub fn with_entry_count(self, entry_count: usize) -> Self {
        Self {
            entry_count,
            ..self
        }
    }

    #[must_use]
    pub fn entry_width(&self) -> usize {
        self.entry_width
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Size in bytes of a directory file in this format.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.entry_width * self.entry_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOffset {
    Present(usize),
    Sparse,
}

impl ChunkOffset {
    #[must_use]
    pub fn offset(self) -> Option<usize> {
        match self {
            ChunkOffset::Present(offset) => Some(offset),
            ChunkOffset::Sparse => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory entry {index} has no present successor to bound it")]
    NoSuccessor { index: usize },
    #[error("Directory entry {index} is sparse")]
    Sparse { index: usize },
    #[error("Directory index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Read(#[from] mem_reader::Error),
    #[error("Directory offset {0:#x} does not fit in memory")]
    OffsetTooLarge(u64),
    #[error("Directory must have at least one entry")]
    Empty,
    #[error("Final directory entry must hold the data size, but it is sparse")]
    SparseTerminator,
    #[error("Directory entry {index} at offset {offset} precedes the previous offset {previous}")]
    Decreasing {
        index: usize,
        offset: usize,
        previous: usize,
    },
}

/// The table mapping chunk indices to byte ranges in a data blob.
///
/// The final entry is the size of the blob, so only indices below
/// `len() - 1` name chunks.
#[derive(Debug, Clone)]
pub struct ChunkDirectory {
    entries: Vec<ChunkOffset>,
}

impl ChunkDirectory {
    /// Parses a directory file. Bytes past the expected size are ignored.
    pub fn from_bytes(format: DirectoryFormat, data: &[u8]) -> Result<Self, DirectoryError> {
        let mut reader = MemReader::new("chunk directory", data);
        let mut entries = Vec::with_capacity(format.entry_count);
        for _ in 0..format.entry_count {
            let raw = reader.read_uint_le(format.entry_width)?;
            if format.sparse_marker == Some(raw) {
                entries.push(ChunkOffset::Sparse);
            } else {
                let offset =
                    usize::try_from(raw).map_err(|_| DirectoryError::OffsetTooLarge(raw))?;
                entries.push(ChunkOffset::Present(offset));
            }
        }
        Self::from_entries(entries)
    }

    /// Builds a directory from already-decoded entries, checking that the
    /// terminator is present and that present offsets never decrease.
    pub fn from_entries(entries: Vec<ChunkOffset>) -> Result<Self, DirectoryError> {
        match entries.last() {
            None => return Err(DirectoryError::Empty),
            Some(ChunkOffset::Sparse) => return Err(DirectoryError::SparseTerminator),
            Some(ChunkOffset::Present(_)) => {}
        }
        let mut previous = 0;
        for (index, entry) in entries.iter().enumerate() {
            if let ChunkOffset::Present(offset) = *entry {
                if offset < previous {
                    return Err(DirectoryError::Decreasing {
                        index,
                        offset,
                        previous,
                    });
                }
                previous = offset;
            }
        }
        Ok(Self { entries })
    }

    /// Number of entries, including the size terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots that can name a chunk.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.entries.len() - 1
    }

    #[must_use]
    pub fn entries(&self) -> &[ChunkOffset] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<ChunkOffset, DirectoryError> {
        self.entries
            .get(index)
            .copied()
            .ok_or(DirectoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// The start offset of entry `index`, or `None` if it is sparse or out of
    /// range.
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.entries.get(index).and_then(|entry| entry.offset())
    }

    /// The size of the data blob, as recorded in the final entry.
    #[must_use]
    pub fn total_size(&self) -> usize {
        match self.entries.last() {
            Some(ChunkOffset::Present(size)) => *size,
            _ => unreachable!("terminator is checked on construction"),
        }
    }

    /// Whether entry `index` holds an offset. Out-of-range indices are absent.
    #[must_use]
    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.entries.get(index), Some(ChunkOffset::Present(_)))
    }

    /// The half-open byte range of chunk `index`, ending at the next present
    /// entry.
    pub fn byte_range(&self, index: usize) -> Result<Range<usize>, DirectoryError> {
        let ChunkOffset::Present(start) = self.entry(index)? else {
            return Err(DirectoryError::Sparse { index });
        };
        let end = self.entries[index + 1..]
            .iter()
            .find_map(|entry| entry.offset())
            .ok_or(DirectoryError::NoSuccessor { index })?;
        Ok(start..end)
    }
}
