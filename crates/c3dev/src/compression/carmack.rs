//! Carmack expansion of map planes.
//!
//! The source is a stream of `(low, high)` byte pairs. A pair whose high byte
//! is one of the two pointer tags is a back reference copying `low` words
//! from earlier output: a near pointer is followed by one byte holding the
//! distance back in words, a far pointer by a little-endian word holding the
//! absolute word offset. A pointer tag with a zero count is not a reference
//! at all; the tag byte was real plane data, and the following byte is the
//! low half of that literal word.

pub const NEAR_POINTER: u8 = 0xA7;
pub const FAR_POINTER: u8 = 0xA8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarmackError {
    #[error("Compressed data ends inside the code at source offset {offset}")]
    Truncated { offset: usize },
    #[error(
        "Back reference at source offset {offset} copies {count} bytes from output offset {from}, but only {available} bytes exist"
    )]
    InvalidReference {
        offset: usize,
        from: isize,
        count: usize,
        available: usize,
    },
    #[error("Code at source offset {offset} writes past the destination length {expected}")]
    Overrun { offset: usize, expected: usize },
    #[error("Destination has length {expected} but was filled to {produced}")]
    LengthMismatch { expected: usize, produced: usize },
}

/// Expands `src` into `dst`; the output must fill `dst` exactly.
///
/// Back references are copied word by word in order, so a reference that
/// overlaps the bytes being written repeats the words it has just produced.
pub fn carmack_expand(src: &[u8], dst: &mut [u8]) -> Result<(), CarmackError> {
    let mut si = 0;
    let mut di = 0;
    while si < src.len() {
        let code_offset = si;
        let byte_at = |index: usize| {
            src.get(index)
                .copied()
                .ok_or(CarmackError::Truncated {
                    offset: code_offset,
                })
        };
        let low = byte_at(si)?;
        let high = byte_at(si + 1)?;
        si += 2;

        if high != NEAR_POINTER && high != FAR_POINTER {
            write_word(dst, &mut di, [low, high], code_offset)?;
            continue;
        }

        if low == 0 {
            // The tag byte was plane data, not a pointer.
            let literal_low = byte_at(si)?;
            si += 1;
            write_word(dst, &mut di, [literal_low, high], code_offset)?;
            continue;
        }

        let count = usize::from(low) * 2;
        let from = if high == NEAR_POINTER {
            let distance = usize::from(byte_at(si)?) * 2;
            si += 1;
            di.checked_sub(distance)
                .ok_or(CarmackError::InvalidReference {
                    offset: code_offset,
                    from: isize::try_from(di).unwrap_or(isize::MAX)
                        - isize::try_from(distance).unwrap_or(isize::MAX),
                    count,
                    available: di,
                })?
        } else {
            let word_offset = u16::from_le_bytes([byte_at(si)?, byte_at(si + 1)?]);
            si += 2;
            usize::from(word_offset) * 2
        };

        if from >= di {
            return Err(CarmackError::InvalidReference {
                offset: code_offset,
                from: isize::try_from(from).unwrap_or(isize::MAX),
                count,
                available: di,
            });
        }
        if di + count > dst.len() {
            return Err(CarmackError::Overrun {
                offset: code_offset,
                expected: dst.len(),
            });
        }
        for i in 0..count {
            dst[di + i] = dst[from + i];
        }
        di += count;
    }

    if di != dst.len() {
        return Err(CarmackError::LengthMismatch {
            expected: dst.len(),
            produced: di,
        });
    }
    Ok(())
}

/// Allocates a destination of `expanded_len` bytes and expands into it.
pub fn carmack_expand_to_vec(src: &[u8], expanded_len: usize) -> Result<Vec<u8>, CarmackError> {
    let mut dst = vec![0u8; expanded_len];
    carmack_expand(src, &mut dst)?;
    Ok(dst)
}

fn write_word(
    dst: &mut [u8],
    di: &mut usize,
    word: [u8; 2],
    code_offset: usize,
) -> Result<(), CarmackError> {
    let expected = dst.len();
    let slot = dst
        .get_mut(*di..*di + 2)
        .ok_or(CarmackError::Overrun {
            offset: code_offset,
            expected,
        })?;
    slot.copy_from_slice(&word);
    *di += 2;
    Ok(())
}

#[cfg(test)]
mod tests {
    use datalit::datalit;

    use super::*;

    #[test]
    fn plain_words_are_copied() {
        let out = carmack_expand_to_vec(&[0x00, 0x41, 0x00, 0x42], 4).unwrap();
        assert_eq!(out, [0x41, 0x00, 0x42, 0x00]);
    }

    #[test]
    fn zero_count_near_tag_is_a_literal() {
        // (0x00, 0xA7) followed by 0x12 is the word 0xA712, not a copy.
        let src = datalit!(0x00, 0xA7, 0x12, 0x34, 0x56).to_vec();
        let out = carmack_expand_to_vec(&src, 4).unwrap();
        assert_eq!(out, [0x12, 0xA7, 0x34, 0x56]);
    }

    #[test]
    fn zero_count_far_tag_is_a_literal() {
        let src = datalit!(0x00, 0xA8, 0xFF).to_vec();
        let out = carmack_expand_to_vec(&src, 2).unwrap();
        assert_eq!(out, [0xFF, 0xA8]);
    }

    #[test]
    fn near_pointer_copies_from_recent_output() {
        let src = datalit!(
            0x01, 0x00, // word 0x0001
            0x02, 0x00, // word 0x0002
            0x02, 0xA7, 0x02, // copy 2 words from 2 words back
        )
        .to_vec();
        let out = carmack_expand_to_vec(&src, 8).unwrap();
        assert_eq!(out, [0x01, 0x00, 0x02, 0x00, 0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn overlapping_near_pointer_repeats_words() {
        let src = datalit!(
            0x07, 0x00, // word 0x0007
            0x03, 0xA7, 0x01, // copy 3 words from 1 word back
        )
        .to_vec();
        let out = carmack_expand_to_vec(&src, 8).unwrap();
        assert_eq!(out, [0x07, 0x00, 0x07, 0x00, 0x07, 0x00, 0x07, 0x00]);
    }

    #[test]
    fn far_pointer_copies_from_absolute_offset() {
        let src = datalit!(
            0x0A, 0x00, // word 0x000A
            0x0B, 0x00, // word 0x000B
            0x0C, 0x00, // word 0x000C
            0x02, 0xA8, 0x01, 0x00, // copy 2 words from word 1
        )
        .to_vec();
        let out = carmack_expand_to_vec(&src, 10).unwrap();
        assert_eq!(
            out,
            [0x0A, 0x00, 0x0B, 0x00, 0x0C, 0x00, 0x0B, 0x00, 0x0C, 0x00]
        );
    }

    #[test]
    fn short_output_is_an_error() {
        assert_eq!(
            carmack_expand_to_vec(&[0x00, 0x41], 4),
            Err(CarmackError::LengthMismatch {
                expected: 4,
                produced: 2
            })
        );
    }

    #[test]
    fn long_output_is_an_error() {
        assert_eq!(
            carmack_expand_to_vec(&[0x00, 0x41, 0x00, 0x42], 2),
            Err(CarmackError::Overrun {
                offset: 2,
                expected: 2
            })
        );
    }

    #[test]
    fn near_pointer_before_start_is_rejected() {
        let src = datalit!(0x00, 0x41, 0x01, 0xA7, 0x02).to_vec();
        assert!(matches!(
            carmack_expand_to_vec(&src, 4),
            Err(CarmackError::InvalidReference {
                offset: 2,
                from: -2,
                count: 2,
                available: 2,
            })
        ));
    }

    #[test]
    fn far_pointer_into_unwritten_output_is_rejected() {
        let src = datalit!(0x00, 0x41, 0x01, 0xA8, 0x01, 0x00).to_vec();
        assert!(matches!(
            carmack_expand_to_vec(&src, 4),
            Err(CarmackError::InvalidReference { offset: 2, .. })
        ));
    }

    #[test]
    fn dangling_tag_is_truncated() {
        assert_eq!(
            carmack_expand_to_vec(&[0x00, 0x41, 0x02, 0xA8, 0x00], 8),
            Err(CarmackError::Truncated { offset: 2 })
        );
        assert_eq!(
            carmack_expand_to_vec(&[0x00], 2),
            Err(CarmackError::Truncated { offset: 0 })
        );
    }
}
