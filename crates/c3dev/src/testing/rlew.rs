use crate::compression::rlew::RLEW_TAG;

const MIN_RUN: usize = 3;

pub(crate) fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

/// Compresses `words` the way a well-behaved encoder would: runs of three or
/// more become tagged runs, and a literal tag word is always wrapped in a
/// run so the decoder never sees it bare.
pub(crate) fn compress(words: &[u16]) -> Vec<u8> {
    let declared = u16::try_from(words.len() * 2).expect("plane too large for RLEW");
    let mut out = vec![declared];
    let mut rest = words;
    while let Some(&value) = rest.first() {
        let run_len = rest
            .iter()
            .take(usize::from(u16::MAX))
            .take_while(|&&word| word == value)
            .count();
        if run_len >= MIN_RUN || value == RLEW_TAG {
            let count = u16::try_from(run_len).expect("run length is capped");
            out.extend([RLEW_TAG, count, value]);
        } else {
            out.extend(std::iter::repeat_n(value, run_len));
        }
        rest = &rest[run_len..];
    }
    words_to_bytes(&out)
}
