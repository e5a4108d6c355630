use crate::utils::mem_reader::MemReader;

/// Size of one picture-table row on disk.
pub const ROW_SIZE: usize = 4;

/// Picture dimensions in pixels. Widths are stored in units of eight pixels
/// and scaled on parse; both values may be negative in corrupt tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: i32,
    height: i32,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Both dimensions as sizes, or `None` if either is negative.
    #[must_use]
    pub fn to_usize(self) -> Option<(usize, usize)> {
        Some((
            usize::try_from(self.width).ok()?,
            usize::try_from(self.height).ok()?,
        ))
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureTable {
    rows: Vec<Dimensions>,
}

impl PictureTable {
    /// Parses `(width / 8, height)` pairs of little-endian `i16`. A trailing
    /// partial row is ignored.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut reader = MemReader::new("picture table", data);
        let mut rows = Vec::with_capacity(data.len() / ROW_SIZE);
        while reader.remaining() >= ROW_SIZE {
            let (Ok(width), Ok(height)) = (reader.read_i16_le(), reader.read_i16_le()) else {
                break;
            };
            rows.push(Dimensions::new(i32::from(width) * 8, i32::from(height)));
        }
        if !reader.is_empty() {
            log::warn!(
                "Ignoring {} trailing bytes in picture table",
                reader.remaining()
            );
        }
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<Dimensions> {
        self.rows.get(row).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Dimensions> + '_ {
        self.rows.iter().copied()
    }
}
