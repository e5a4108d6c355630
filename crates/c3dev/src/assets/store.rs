use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    assets::directory::{ChunkDirectory, ChunkOffset, DirectoryError, DirectoryFormat},
    compression::{
        bits::BitOrder,
        huffman::{DictionaryError, HuffmanDictionary, HuffmanError},
    },
    config::AssetFiles,
    utils::mem_reader::MemReader,
};

/// Each chunk starts with its decompressed size as a little-endian `u32`.
pub const LENGTH_PREFIX_SIZE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid chunk directory: {0}")]
    Directory(#[from] DirectoryError),
    #[error("Invalid Huffman dictionary: {0}")]
    Dictionary(#[from] DictionaryError),
    #[error("Data blob has {actual} bytes, but the directory records {expected}")]
    DataTooShort { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkErrorKind {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("Chunk of {compressed} bytes is too short for its length prefix")]
    MissingLengthPrefix { compressed: usize },
    #[error("Failed to expand {compressed} bytes into {declared}: {source}")]
    Decode {
        declared: usize,
        compressed: usize,
        #[source]
        source: HuffmanError,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("Chunk {index}: {kind}")]
pub struct ChunkError {
    index: usize,
    kind: ChunkErrorKind,
}

impl ChunkError {
    fn new(index: usize, kind: impl Into<ChunkErrorKind>) -> Self {
        Self {
            index,
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn kind(&self) -> &ChunkErrorKind {
        &self.kind
    }
}

/// Random access to the decompressed chunks of one asset domain.
///
/// Chunks are expanded on first request and cached for the lifetime of the
/// store. The store may be shared between threads; if two threads race to
/// expand the same chunk, the first result stored wins and both callers see
/// it.
pub struct AssetStore {
    data: Bytes,
    directory: ChunkDirectory,
    dictionary: HuffmanDictionary,
    bit_order: BitOrder,
    cache: RwLock<HashMap<usize, Bytes>>,
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("data_len", &self.data.len())
            .field("chunk_count", &self.directory.chunk_count())
            .field("bit_order", &self.bit_order)
            .field("cached", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

impl AssetStore {
    /// Builds a store from the contents of its three files.
    ///
    /// Data past the size recorded in the directory is dropped.
    pub fn from_parts(
        format: DirectoryFormat,
        bit_order: BitOrder,
        data: impl Into<Bytes>,
        directory: &[u8],
        dictionary: &[u8],
    ) -> Result<Self, LoadError> {
        let directory = ChunkDirectory::from_bytes(format, directory)?;
        let dictionary = HuffmanDictionary::from_bytes(dictionary)?;
        let mut data = data.into();
        let expected = directory.total_size();
        if data.len() < expected {
            return Err(LoadError::DataTooShort {
                expected,
                actual: data.len(),
            });
        }
        if data.len() > expected {
            log::debug!(
                "Ignoring {} bytes past the recorded data size {expected}",
                data.len() - expected
            );
            data.truncate(expected);
        }
        log::info!(
            "Loaded asset store: {} chunk slots, {} present, {} data bytes",
            directory.chunk_count(),
            directory.entries()[..directory.chunk_count()]
                .iter()
                .filter(|entry| matches!(entry, ChunkOffset::Present(_)))
                .count(),
            data.len(),
        );
        Ok(Self {
            data,
            directory,
            dictionary,
            bit_order,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Reads the three files named by `files` and builds a store from them.
    pub fn open(
        format: DirectoryFormat,
        bit_order: BitOrder,
        files: &AssetFiles,
    ) -> Result<Self, LoadError> {
        let directory = read_file(&files.directory)?;
        let dictionary = read_file(&files.dictionary)?;
        let data = read_file(&files.data)?;
        Self::from_parts(format, bit_order, data, &directory, &dictionary)
    }

    #[must_use]
    pub fn directory(&self) -> &ChunkDirectory {
        &self.directory
    }

    #[must_use]
    pub fn dictionary(&self) -> &HuffmanDictionary {
        &self.dictionary
    }

    #[must_use]
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Indices of the chunk slots that hold data.
    pub fn present_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.directory.chunk_count()).filter(|&index| self.directory.is_present(index))
    }

    /// Number of chunks expanded so far.
    #[must_use]
    pub fn cached_chunk_count(&self) -> usize {
        self.cache.read().len()
    }

    /// The still-compressed bytes of chunk `index`, length prefix included.
    pub fn raw_chunk(&self, index: usize) -> Result<Option<Bytes>, ChunkError> {
        match self.directory.entry(index) {
            Err(err) => return Err(ChunkError::new(index, err)),
            Ok(ChunkOffset::Sparse) => return Ok(None),
            Ok(ChunkOffset::Present(_)) => {}
        }
        let range = self
            .directory
            .byte_range(index)
            .map_err(|err| ChunkError::new(index, err))?;
        Ok(Some(self.data.slice(range)))
    }

    /// The decompressed contents of chunk `index`, or `None` if the slot is
    /// unused.
    pub fn chunk(&self, index: usize) -> Result<Option<Bytes>, ChunkError> {
        if let Some(cached) = self.cache.read().get(&index) {
            return Ok(Some(cached.clone()));
        }
        let Some(raw) = self.raw_chunk(index)? else {
            return Ok(None);
        };

        let mut reader = MemReader::new("chunk length prefix", &raw);
        let declared = reader
            .read_u32_le()
            .map_err(|_| {
                ChunkError::new(
                    index,
                    ChunkErrorKind::MissingLengthPrefix {
                        compressed: raw.len(),
                    },
                )
            })
            .map(|len| usize::try_from(len).unwrap_or(usize::MAX))?;
        let payload = &raw[LENGTH_PREFIX_SIZE..];
        let expanded = self
            .dictionary
            .expand(payload, declared, self.bit_order)
            .map_err(|source| {
                ChunkError::new(
                    index,
                    ChunkErrorKind::Decode {
                        declared,
                        compressed: payload.len(),
                        source,
                    },
                )
            })?;
        log::debug!(
            "Expanded chunk {index}: {} -> {declared} bytes",
            payload.len()
        );

        let mut cache = self.cache.write();
        let stored = cache.entry(index).or_insert_with(|| Bytes::from(expanded));
        Ok(Some(stored.clone()))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
