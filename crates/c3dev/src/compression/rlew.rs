//! Run-length expansion over little-endian 16-bit words.
//!
//! The stream starts with the expanded size in bytes. After that, the tag
//! word [`RLEW_TAG`] introduces a `(count, value)` run; any other word is
//! copied through as-is.

/// The sentinel word marking a run.
pub const RLEW_TAG: u16 = 0xABCD;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RlewError {
    #[error("RLEW data is missing its length word")]
    MissingLength,
    #[error("Destination has length {expected} but compressed data declares {declared}")]
    DeclaredLengthMismatch { declared: usize, expected: usize },
    #[error("Run at word {word_index} is missing its count or value")]
    Truncated { word_index: usize },
    #[error("Run at word {word_index} writes past the destination length {expected}")]
    Overrun { word_index: usize, expected: usize },
    #[error("Destination has length {expected} but was filled to {produced}")]
    LengthMismatch { expected: usize, produced: usize },
}

/// Expands `src` into `dst`, which must be exactly the declared size.
///
/// A trailing odd byte in `src` cannot form a word and is ignored.
pub fn rlew_expand(src: &[u8], dst: &mut [u8]) -> Result<(), RlewError> {
    let mut words = src
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .enumerate();

    let (_, declared) = words.next().ok_or(RlewError::MissingLength)?;
    let declared = usize::from(declared);
    if declared != dst.len() {
        return Err(RlewError::DeclaredLengthMismatch {
            declared,
            expected: dst.len(),
        });
    }

    let mut writer = WordWriter { dst, pos: 0 };
    while let Some((word_index, word)) = words.next() {
        if word == RLEW_TAG {
            let (Some((_, count)), Some((_, value))) = (words.next(), words.next()) else {
                return Err(RlewError::Truncated { word_index });
            };
            for _ in 0..count {
                writer.put(word_index, value)?;
            }
        } else {
            writer.put(word_index, word)?;
        }
    }

    if writer.pos != writer.dst.len() {
        return Err(RlewError::LengthMismatch {
            expected: writer.dst.len(),
            produced: writer.pos,
        });
    }
    Ok(())
}

/// Allocates a destination of `expanded_len` bytes and expands into it.
pub fn rlew_expand_to_vec(src: &[u8], expanded_len: usize) -> Result<Vec<u8>, RlewError> {
    let mut dst = vec![0u8; expanded_len];
    rlew_expand(src, &mut dst)?;
    Ok(dst)
}

struct WordWriter<'a> {
    dst: &'a mut [u8],
    pos: usize,
}

impl WordWriter<'_> {
    fn put(&mut self, word_index: usize, word: u16) -> Result<(), RlewError> {
        let Some(slot) = self.dst.get_mut(self.pos..self.pos + 2) else {
            return Err(RlewError::Overrun {
                word_index,
                expected: self.dst.len(),
            });
        };
        slot.copy_from_slice(&word.to_le_bytes());
        self.pos += 2;
        Ok(())
    }
}
