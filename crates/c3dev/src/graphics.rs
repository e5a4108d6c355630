//! Pictures stored in the graphics chunks.
//!
//! Chunk 0 is a table of picture dimensions. Row `i` of that table describes
//! the picture in chunk `i + 5`; the chunks in between hold fonts and other
//! non-picture data.

mod picture_table;
mod planar;

pub use self::picture_table::{Dimensions, PictureTable};
pub use self::planar::{PLANE_COUNT, Picture, PixelSource, Rgba};

use crate::assets::{AssetStore, ChunkError};

pub const PICTURE_TABLE_CHUNK: usize = 0;
pub const FIRST_PICTURE_CHUNK: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("Chunk {index} has no row in the picture table of {table_len} entries")]
    NoPictureEntry { index: usize, table_len: usize },
    #[error("Picture {index} has invalid dimensions {dimensions}")]
    InvalidDimensions {
        index: usize,
        dimensions: Dimensions,
    },
    #[error("The picture table chunk is absent")]
    MissingPictureTable,
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Picture lookup on top of a graphics [`AssetStore`].
#[derive(Debug)]
pub struct Graphics {
    store: AssetStore,
}

impl Graphics {
    #[must_use]
    pub fn new(store: AssetStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn picture_table(&self) -> Result<PictureTable, GraphicsError> {
        let chunk = self
            .store
            .chunk(PICTURE_TABLE_CHUNK)?
            .ok_or(GraphicsError::MissingPictureTable)?;
        Ok(PictureTable::from_bytes(&chunk))
    }

    /// The dimensions recorded for the picture in chunk `index`.
    pub fn dimensions(&self, index: usize) -> Result<Dimensions, GraphicsError> {
        let table = self.picture_table()?;
        index
            .checked_sub(FIRST_PICTURE_CHUNK)
            .and_then(|row| table.get(row))
            .ok_or(GraphicsError::NoPictureEntry {
                index,
                table_len: table.len(),
            })
    }

    /// The picture in chunk `index`, or `None` if that chunk is unused.
    pub fn picture(&self, index: usize) -> Result<Option<Picture>, GraphicsError> {
        let dimensions = self.dimensions(index)?;
        let (width, height) = dimensions
            .to_usize()
            .ok_or(GraphicsError::InvalidDimensions { index, dimensions })?;
        let Some(data) = self.store.chunk(index)? else {
            return Ok(None);
        };
        let picture = Picture::new(data, width, height);
        if !picture.has_all_planes() {
            log::warn!(
                "Picture {index} ({dimensions}) has {} bytes, short of {} planes",
                picture.data().len(),
                PLANE_COUNT
            );
        }
        Ok(Some(picture))
    }
}
