use bytes::Bytes;

pub const PLANE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const OPAQUE_BLACK: Rgba = Rgba::new(0, 0, 0, 0xFF);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Anything that can be sampled as a rectangle of RGBA pixels.
pub trait PixelSource {
    /// Width and height in pixels.
    fn bounds(&self) -> (usize, usize);

    /// The pixel at `(x, y)`. Coordinates outside [`bounds`] yield
    /// [`Rgba::TRANSPARENT`].
    ///
    /// [`bounds`]: PixelSource::bounds
    fn pixel_at(&self, x: usize, y: usize) -> Rgba;

    /// Renders every pixel in row-major order, four bytes each.
    fn to_rgba_bytes(&self) -> Vec<u8> {
        let (width, height) = self.bounds();
        let mut out = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                out.extend_from_slice(&self.pixel_at(x, y).to_array());
            }
        }
        out
    }
}

/// An EGA picture stored as four bit planes: blue, green, red, then
/// intensity. Each plane holds one bit per pixel, most significant bit
/// first.
#[derive(Debug, Clone)]
pub struct Picture {
    data: Bytes,
    width: usize,
    height: usize,
}

impl Picture {
    #[must_use]
    pub fn new(data: Bytes, width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Bytes per plane. A partial final byte still takes a whole byte.
    #[must_use]
    pub fn plane_size(&self) -> usize {
        self.width.saturating_mul(self.height).div_ceil(8)
    }

    /// Whether the data covers all four planes. Pictures missing a plane
    /// render as flat opaque black.
    #[must_use]
    pub fn has_all_planes(&self) -> bool {
        let plane_size = self.plane_size();
        plane_size > 0 && self.data.len() / plane_size >= PLANE_COUNT
    }

    fn plane_bit(&self, plane: usize, pos: usize) -> Option<bool> {
        let byte = *self.data.get(plane * self.plane_size() + pos / 8)?;
        Some((byte >> (7 - pos % 8)) & 1 != 0)
    }
}

impl PixelSource for Picture {
    fn bounds(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn pixel_at(&self, x: usize, y: usize) -> Rgba {
        if x >= self.width || y >= self.height {
            return Rgba::TRANSPARENT;
        }
        if !self.has_all_planes() {
            return Rgba::OPAQUE_BLACK;
        }
        let pos = y * self.width + x;
        let bits = [0, 1, 2, 3].map(|plane| self.plane_bit(plane, pos));
        let [Some(blue), Some(green), Some(red), Some(intense)] = bits else {
            return Rgba::OPAQUE_BLACK;
        };
        let channel = |bit| match (bit, intense) {
            (false, false) => 0x00,
            (false, true) => 0x55,
            (true, false) => 0xAA,
            (true, true) => 0xFF,
        };
        let (r, g, b) = (channel(red), channel(green), channel(blue));
        // Dark magenta is the transparency key.
        let a = if (r, g, b) == (0xAA, 0x00, 0xAA) {
            0x00
        } else {
            0xFF
        };
        Rgba::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;

    /// An 8x1 picture built from one byte per plane.
    fn strip(blue: u8, green: u8, red: u8, intensity: u8) -> Picture {
        Picture::new(Bytes::from(vec![blue, green, red, intensity]), 8, 1)
    }

    #[test]
    fn planes_combine_into_ega_colors() {
        let pic = strip(0b1000_0001, 0b0100_0001, 0b0010_0001, 0b0001_0001);
        assert_eq!(pic.pixel_at(0, 0), Rgba::new(0x00, 0x00, 0xAA, 0xFF));
        assert_eq!(pic.pixel_at(1, 0), Rgba::new(0x00, 0xAA, 0x00, 0xFF));
        assert_eq!(pic.pixel_at(2, 0), Rgba::new(0xAA, 0x00, 0x00, 0xFF));
        assert_eq!(pic.pixel_at(3, 0), Rgba::new(0x55, 0x55, 0x55, 0xFF));
        assert_eq!(pic.pixel_at(4, 0), Rgba::OPAQUE_BLACK);
        assert_eq!(pic.pixel_at(7, 0), Rgba::new(0xFF, 0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn dark_magenta_is_transparent() {
        let pic = strip(0b1000_0000, 0x00, 0b1000_0000, 0x00);
        assert_eq!(pic.pixel_at(0, 0), Rgba::new(0xAA, 0x00, 0xAA, 0x00));
        // Bright magenta keeps its alpha.
        let bright = strip(0b1000_0000, 0x00, 0b1000_0000, 0b1000_0000);
        assert_eq!(bright.pixel_at(0, 0), Rgba::new(0xFF, 0x55, 0xFF, 0xFF));
    }

    #[test]
    fn missing_planes_render_opaque_black() {
        let pic = Picture::new(Bytes::from_static(&[0xFF, 0xFF, 0xFF]), 8, 1);
        assert!(!pic.has_all_planes());
        assert_eq!(pic.pixel_at(0, 0), Rgba::OPAQUE_BLACK);
        assert_eq!(pic.pixel_at(7, 0), Rgba::OPAQUE_BLACK);
    }

    #[test]
    fn out_of_bounds_is_transparent() {
        let pic = strip(0xFF, 0xFF, 0xFF, 0xFF);
        assert_eq!(pic.pixel_at(8, 0), Rgba::TRANSPARENT);
        assert_eq!(pic.pixel_at(0, 1), Rgba::TRANSPARENT);
    }

    #[test]
    fn rows_index_by_width() {
        // 8x2: the second row starts at bit 8 of each plane.
        let data = datalit!(
            0x00, 0x80, // blue
            0x00, 0x00, // green
            0x00, 0x00, // red
            0x00, 0x00, // intensity
        )
        .to_vec();
        let pic = Picture::new(Bytes::from(data), 8, 2);
        assert_eq!(pic.plane_size(), 2);
        assert_eq!(pic.pixel_at(0, 0), Rgba::OPAQUE_BLACK);
        assert_eq!(pic.pixel_at(0, 1), Rgba::new(0x00, 0x00, 0xAA, 0xFF));
    }

    #[test]
    fn odd_sized_planes_round_up_to_whole_bytes() {
        // 4x3 is 12 pixels, so each plane takes two bytes.
        let truncated = Picture::new(Bytes::from(vec![0u8; 4]), 4, 3);
        assert_eq!(truncated.plane_size(), 2);
        assert!(!truncated.has_all_planes());
        assert_eq!(truncated.pixel_at(3, 2), Rgba::OPAQUE_BLACK);

        let data = datalit!(
            0x00, 0x10, // blue
            0x00, 0x00, // green
            0x00, 0x00, // red
            0x00, 0x00, // intensity
        )
        .to_vec();
        let pic = Picture::new(Bytes::from(data), 4, 3);
        assert!(pic.has_all_planes());
        assert_eq!(pic.pixel_at(3, 2), Rgba::new(0x00, 0x00, 0xAA, 0xFF));
        assert_eq!(pic.pixel_at(2, 2), Rgba::OPAQUE_BLACK);
        assert_eq!(pic.to_rgba_bytes().len(), 12 * 4);
    }

    #[test]
    fn rgba_bytes_are_row_major() {
        let pic = strip(0b1000_0000, 0, 0, 0);
        let bytes = pic.to_rgba_bytes();
        assert_eq!(bytes.len(), 8 * 4);
        assert_eq!(&bytes[..8], [0x00, 0x00, 0xAA, 0xFF, 0x00, 0x00, 0x00, 0xFF]);
    }
}
