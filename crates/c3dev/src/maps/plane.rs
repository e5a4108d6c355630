use crate::maps::MapError;

/// One fully expanded map plane: a row-major grid of little-endian words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPlane {
    map: usize,
    plane: usize,
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl MapPlane {
    pub(super) fn new(map: usize, plane: usize, width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * 2);
        Self {
            map,
            plane,
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn words(&self) -> impl Iterator<Item = u16> + '_ {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }

    #[must_use]
    pub fn word_at(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pos = (y * self.width + x) * 2;
        Some(u16::from_le_bytes([self.data[pos], self.data[pos + 1]]))
    }

    /// The low byte of every word. Tiles in shipped maps never use the high
    /// byte, so a non-zero one is reported rather than dropped.
    pub fn tile_bytes(&self) -> Result<Vec<u8>, MapError> {
        self.words()
            .enumerate()
            .map(|(index, word)| {
                let [low, high] = word.to_le_bytes();
                if high == 0 {
                    Ok(low)
                } else {
                    Err(MapError::WideTile {
                        map: self.map,
                        plane: self.plane,
                        index,
                        word,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rlew::words_to_bytes;

    fn plane(words: &[u16], width: usize) -> MapPlane {
        MapPlane::new(0, 1, width, words.len() / width, words_to_bytes(words))
    }

    #[test]
    fn words_are_row_major() {
        let plane = plane(&[1, 2, 3, 4, 5, 6], 3);
        assert_eq!(plane.words().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(plane.word_at(0, 1), Some(4));
        assert_eq!(plane.word_at(2, 0), Some(3));
        assert_eq!(plane.word_at(3, 0), None);
        assert_eq!(plane.word_at(0, 2), None);
    }

    #[test]
    fn tile_bytes_keep_low_bytes() {
        let plane = plane(&[0x0001, 0x00FF, 0x0020], 3);
        assert_eq!(plane.tile_bytes().unwrap(), [0x01, 0xFF, 0x20]);
    }

    #[test]
    fn wide_tile_is_an_error() {
        let plane = plane(&[0x0001, 0x0102, 0x0003, 0x0004], 2);
        assert!(matches!(
            plane.tile_bytes(),
            Err(MapError::WideTile {
                map: 0,
                plane: 1,
                index: 1,
                word: 0x0102
            })
        ));
    }
}
