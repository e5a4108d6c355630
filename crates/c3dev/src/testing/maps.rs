use crate::{
    compression::carmack::{FAR_POINTER, NEAR_POINTER},
    maps::{MAP_DELIMITER, NAME_SIZE},
    testing::rlew,
};

/// Wraps `src` as Carmack data without back references, escaping words
/// whose high byte collides with a pointer tag.
pub(crate) fn carmack_literals(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    for pair in src.chunks_exact(2) {
        let (low, high) = (pair[0], pair[1]);
        if high == NEAR_POINTER || high == FAR_POINTER {
            out.extend([0x00, high, low]);
        } else {
            out.extend([low, high]);
        }
    }
    out
}

/// A plane as stored in the map container: the Carmack-expanded length,
/// then Carmack data wrapping the RLEW stream.
pub(crate) fn plane_bytes(words: &[u16]) -> Vec<u8> {
    let rlew = rlew::compress(words);
    let mut out = u16::try_from(rlew.len()).unwrap().to_le_bytes().to_vec();
    out.extend(carmack_literals(&rlew));
    out
}

pub(crate) struct TestMap<'a> {
    pub(crate) name: &'a str,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) planes: [Option<Vec<u16>>; 3],
}

/// Lays out a container: a signature, then per map its plane data, its
/// header, and the delimiter.
pub(crate) fn map_file(maps: &[TestMap<'_>]) -> Vec<u8> {
    let mut out = b"TED5v1.0".to_vec();
    for map in maps {
        let mut starts = [0i32; 3];
        let mut lengths = [0u16; 3];
        for (plane, words) in map.planes.iter().enumerate() {
            if let Some(words) = words {
                let bytes = plane_bytes(words);
                starts[plane] = i32::try_from(out.len()).unwrap();
                lengths[plane] = u16::try_from(bytes.len()).unwrap();
                out.extend(bytes);
            }
        }
        out.extend(header_bytes(starts, lengths, map.width, map.height, map.name));
        out.extend_from_slice(MAP_DELIMITER);
    }
    out
}

pub(crate) fn header_bytes(
    starts: [i32; 3],
    lengths: [u16; 3],
    width: u16,
    height: u16,
    name: &str,
) -> Vec<u8> {
    let mut out = Vec::new();
    for start in starts {
        out.extend(start.to_le_bytes());
    }
    for length in lengths {
        out.extend(length.to_le_bytes());
    }
    out.extend(width.to_le_bytes());
    out.extend(height.to_le_bytes());
    let mut name_buf = [0u8; NAME_SIZE];
    name_buf[..name.len()].copy_from_slice(name.as_bytes());
    out.extend(name_buf);
    out
}
