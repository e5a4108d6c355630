//! The level map container.
//!
//! Records are separated by the literal `!ID!`. Each record ends with a
//! [`MapHeader`] giving the absolute file offsets of up to three planes. A
//! plane is a little-endian `u16` holding its Carmack-expanded size, then
//! Carmack data that expands to an RLEW stream, which in turn expands to
//! `width * height` words.

mod header;
mod plane;

use std::{
    fs, io,
    ops::Range,
    path::{Path, PathBuf},
};

use bytes::Bytes;

pub use self::header::{HEADER_SIZE, MAP_PLANE_COUNT, MapHeader, NAME_SIZE};
pub use self::plane::MapPlane;

use crate::{
    compression::{
        carmack::{CarmackError, carmack_expand_to_vec},
        rlew::{RlewError, rlew_expand_to_vec},
    },
    utils::mem_reader::{self, MemReader},
};

pub const MAP_DELIMITER: &[u8] = b"!ID!";

/// Plane holding walls and floors.
pub const LAYOUT_PLANE: usize = 0;
/// Plane holding monsters, items and player starts.
pub const ENTITY_PLANE: usize = 2;

/// Layout tiles above this value are not walls and are hidden by
/// [`Level::text_rows`].
const MAX_WALL_TILE: u8 = 0x20;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid map header: {0}")]
    Header(#[from] mem_reader::Error),
    #[error("Map {map} does not exist; the file holds {count} maps")]
    NoSuchMap { map: usize, count: usize },
    #[error("Plane {plane} does not exist; maps have {MAP_PLANE_COUNT} planes")]
    NoSuchPlane { plane: usize },
    #[error("Map {map} plane {plane} starts at negative offset {start}")]
    NegativeStart { map: usize, plane: usize, start: i32 },
    #[error("Map {map} plane {plane} spans {range:?}, past the end of the {file_len}-byte file")]
    PlaneOutOfRange {
        map: usize,
        plane: usize,
        range: Range<usize>,
        file_len: usize,
    },
    #[error("Map {map} plane {plane} is {width}x{height}, too large for a 16-bit RLEW length")]
    PlaneTooLarge {
        map: usize,
        plane: usize,
        width: u16,
        height: u16,
    },
    #[error("Map {map} plane {plane} is missing its Carmack length")]
    MissingCarmackLength { map: usize, plane: usize },
    #[error("Map {map} plane {plane}: {source}")]
    Carmack {
        map: usize,
        plane: usize,
        #[source]
        source: CarmackError,
    },
    #[error("Map {map} plane {plane}: {source}")]
    Rlew {
        map: usize,
        plane: usize,
        #[source]
        source: RlewError,
    },
    #[error("Map {map} plane {plane} tile {index} has non-zero high byte in {word:#06x}")]
    WideTile {
        map: usize,
        plane: usize,
        index: usize,
        word: u16,
    },
    #[error("Map {map} is {width}x{height}; exported maps must fit byte-sized dimensions")]
    TooLargeToExport { map: usize, width: u16, height: u16 },
}

/// A loaded map container with its headers parsed.
#[derive(Debug, Clone)]
pub struct MapFile {
    data: Bytes,
    headers: Vec<MapHeader>,
}

impl MapFile {
    /// Splits `data` into records and parses each header. The bytes after
    /// the last delimiter are not a record. Parsing stops at the first
    /// record too short to hold a header.
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self, MapError> {
        let data = data.into();
        let mut headers = Vec::new();
        for (map, record) in records(&data).into_iter().enumerate() {
            if record.len() < HEADER_SIZE {
                log::warn!(
                    "Map record {map} is {} bytes, too short for a header; ignoring the rest",
                    record.len()
                );
                break;
            }
            let header_bytes = &data[record.end - HEADER_SIZE..record.end];
            let mut reader = MemReader::new(format!("map {map} header"), header_bytes);
            headers.push(MapHeader::read_from(&mut reader)?);
        }
        log::info!("Loaded map file: {} maps", headers.len());
        Ok(Self { data, headers })
    }

    pub fn open(path: &Path) -> Result<Self, MapError> {
        let data = fs::read(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    #[must_use]
    pub fn headers(&self) -> &[MapHeader] {
        &self.headers
    }

    pub fn header(&self, map: usize) -> Result<&MapHeader, MapError> {
        self.headers.get(map).ok_or(MapError::NoSuchMap {
            map,
            count: self.headers.len(),
        })
    }

    /// The compressed bytes of a plane, Carmack length word included, or
    /// `None` if the plane is empty.
    pub fn raw_plane(&self, map: usize, plane: usize) -> Result<Option<Bytes>, MapError> {
        let header = self.header(map)?;
        let (Some(start), Some(length)) = (header.plane_start(plane), header.plane_length(plane))
        else {
            return Err(MapError::NoSuchPlane { plane });
        };
        if length == 0 {
            return Ok(None);
        }
        let start =
            usize::try_from(start).map_err(|_| MapError::NegativeStart { map, plane, start })?;
        let range = start..start + usize::from(length);
        if range.end > self.data.len() {
            return Err(MapError::PlaneOutOfRange {
                map,
                plane,
                range,
                file_len: self.data.len(),
            });
        }
        Ok(Some(self.data.slice(range)))
    }

    /// Expands one plane, or returns `None` if it is empty.
    pub fn plane(&self, map: usize, plane: usize) -> Result<Option<MapPlane>, MapError> {
        let Some(raw) = self.raw_plane(map, plane)? else {
            return Ok(None);
        };
        let header = self.header(map)?;
        let plane_len = checked_plane_len(header, map, plane)?;

        let mut reader = MemReader::new(format!("map {map} plane {plane}"), &raw);
        let carmack_len = reader
            .read_u16_le()
            .map_err(|_| MapError::MissingCarmackLength { map, plane })?;
        let rlew_data = carmack_expand_to_vec(&raw[2..], usize::from(carmack_len))
            .map_err(|source| MapError::Carmack { map, plane, source })?;
        let words = rlew_expand_to_vec(&rlew_data, plane_len)
            .map_err(|source| MapError::Rlew { map, plane, source })?;
        log::debug!(
            "Expanded map {map} plane {plane}: {} -> {carmack_len} -> {plane_len} bytes",
            raw.len()
        );
        Ok(Some(MapPlane::new(
            map,
            plane,
            usize::from(header.width()),
            usize::from(header.height()),
            words,
        )))
    }

    /// The layout and entity planes of one map as tile bytes. An empty
    /// plane reads as all zeros.
    pub fn level(&self, map: usize) -> Result<Level, MapError> {
        let header = self.header(map)?;
        let tiles = |plane| -> Result<Vec<u8>, MapError> {
            match self.plane(map, plane)? {
                Some(plane) => plane.tile_bytes(),
                None => Ok(vec![0; checked_plane_len(header, map, plane)? / 2]),
            }
        };
        Ok(Level {
            map,
            name: header.name().into_owned(),
            width: header.width(),
            height: header.height(),
            layout: tiles(LAYOUT_PLANE)?,
            entities: tiles(ENTITY_PLANE)?,
        })
    }
}

/// The expanded size of a plane, which RLEW caps at `u16::MAX` bytes.
fn checked_plane_len(header: &MapHeader, map: usize, plane: usize) -> Result<usize, MapError> {
    let plane_len = header.plane_byte_len();
    if plane_len > usize::from(u16::MAX) {
        return Err(MapError::PlaneTooLarge {
            map,
            plane,
            width: header.width(),
            height: header.height(),
        });
    }
    Ok(plane_len)
}

/// Byte ranges of the records in `data`, each ending just before a
/// delimiter.
fn records(data: &[u8]) -> Vec<Range<usize>> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos + MAP_DELIMITER.len() <= data.len() {
        if data[pos..].starts_with(MAP_DELIMITER) {
            records.push(start..pos);
            pos += MAP_DELIMITER.len();
            start = pos;
        } else {
            pos += 1;
        }
    }
    records
}

/// The tile bytes of a map's layout and entity planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    map: usize,
    name: String,
    width: u16,
    height: u16,
    layout: Vec<u8>,
    entities: Vec<u8>,
}

impl Level {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn layout(&self) -> &[u8] {
        &self.layout
    }

    #[must_use]
    pub fn entities(&self) -> &[u8] {
        &self.entities
    }

    /// Serializes the level as width and height bytes followed by the
    /// layout and entity tiles.
    pub fn to_c3dmap_bytes(&self) -> Result<Vec<u8>, MapError> {
        let too_large = || MapError::TooLargeToExport {
            map: self.map,
            width: self.width,
            height: self.height,
        };
        let width = u8::try_from(self.width).map_err(|_| too_large())?;
        let height = u8::try_from(self.height).map_err(|_| too_large())?;
        let mut out = Vec::with_capacity(2 + self.layout.len() + self.entities.len());
        out.extend([width, height]);
        out.extend_from_slice(&self.layout);
        out.extend_from_slice(&self.entities);
        Ok(out)
    }

    /// One line per row, two hex digits per cell. Walls are shown where
    /// present, otherwise the entity, otherwise blanks.
    #[must_use]
    pub fn text_rows(&self) -> Vec<String> {
        let width = usize::from(self.width);
        if width == 0 {
            return Vec::new();
        }
        self.layout
            .chunks(width)
            .zip(self.entities.chunks(width))
            .map(|(layout_row, entity_row)| {
                layout_row
                    .iter()
                    .zip(entity_row)
                    .map(|(&wall, &entity)| {
                        let cell = match wall {
                            0 => entity,
                            wall if wall > MAX_WALL_TILE => entity,
                            wall => wall,
                        };
                        if cell == 0 {
                            "  ".to_string()
                        } else {
                            format!("{cell:02X}")
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
