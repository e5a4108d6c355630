//! Chunked, Huffman-compressed asset containers.
//!
//! Graphics and audio are each stored as three files: a directory of chunk
//! offsets, a Huffman dictionary, and the data blob the offsets point into.

mod directory;
mod store;

pub use self::directory::{ChunkDirectory, ChunkOffset, DirectoryError, DirectoryFormat};
pub use self::store::{AssetStore, ChunkError, ChunkErrorKind, LENGTH_PREFIX_SIZE, LoadError};

/// The two asset families sharing the chunked container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetDomain {
    Graphics,
    Audio,
}

impl AssetDomain {
    #[must_use]
    pub fn directory_format(self) -> DirectoryFormat {
        match self {
            AssetDomain::Graphics => DirectoryFormat::GRAPHICS,
            AssetDomain::Audio => DirectoryFormat::AUDIO,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AssetDomain::Graphics => "graphics",
            AssetDomain::Audio => "audio",
        }
    }
}

impl std::fmt::Display for AssetDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
