/// The order in which bits are pulled out of each source byte.
///
/// Shipped Huffman payloads are read least-significant bit first. Each
/// asset domain uses one order for all of its chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BitOrder {
    #[default]
    LsbFirst,
    MsbFirst,
}

impl BitOrder {
    fn first_mask(self) -> u8 {
        match self {
            BitOrder::LsbFirst => 0x01,
            BitOrder::MsbFirst => 0x80,
        }
    }

    fn next_mask(self, mask: u8) -> u8 {
        match self {
            BitOrder::LsbFirst => mask << 1,
            BitOrder::MsbFirst => mask >> 1,
        }
    }
}

/// Reads single bits from a byte slice, loading the next byte only once the
/// current one is used up.
#[derive(Debug, Clone)]
pub struct BitStream<'a> {
    data: &'a [u8],
    next_byte: usize,
    curr_byte: u8,
    mask: u8,
    order: BitOrder,
}

impl<'a> BitStream<'a> {
    #[must_use]
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            data,
            next_byte: 0,
            curr_byte: 0,
            mask: 0,
            order,
        }
    }

    /// Returns the next bit, or `None` once every byte has been consumed.
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.mask == 0 {
            self.curr_byte = *self.data.get(self.next_byte)?;
            self.next_byte += 1;
            self.mask = self.order.first_mask();
        }
        let bit = self.curr_byte & self.mask != 0;
        self.mask = self.order.next_mask(self.mask);
        Some(bit)
    }

    /// The number of source bytes backing this stream.
    #[must_use]
    pub fn source_len(&self) -> usize {
        self.data.len()
    }

    /// The number of source bytes that have been at least partially read.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.next_byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_bits(data: &[u8], order: BitOrder) -> Vec<bool> {
        let mut stream = BitStream::new(data, order);
        std::iter::from_fn(|| stream.read_bit()).collect()
    }

    #[test]
    fn lsb_first_reads_low_bit_first() {
        let bits = collect_bits(&[0b0000_0110], BitOrder::LsbFirst);
        assert_eq!(
            bits,
            [false, true, true, false, false, false, false, false]
        );
    }

    #[test]
    fn msb_first_reads_high_bit_first() {
        let bits = collect_bits(&[0b1000_0001], BitOrder::MsbFirst);
        assert_eq!(bits, [true, false, false, false, false, false, false, true]);
    }

    #[test]
    fn exhaustion_is_distinct_from_a_zero_bit() {
        let mut stream = BitStream::new(&[0x00], BitOrder::LsbFirst);
        for _ in 0..8 {
            assert_eq!(stream.read_bit(), Some(false));
        }
        assert_eq!(stream.read_bit(), None);
        assert_eq!(stream.read_bit(), None);
        assert_eq!(stream.bytes_consumed(), 1);
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let mut stream = BitStream::new(&[], BitOrder::MsbFirst);
        assert_eq!(stream.read_bit(), None);
        assert_eq!(stream.source_len(), 0);
    }

    #[test]
    fn crosses_byte_boundaries() {
        let bits = collect_bits(&[0xFF, 0x01], BitOrder::LsbFirst);
        assert_eq!(bits.len(), 16);
        assert!(bits[..9].iter().all(|&b| b));
        assert!(bits[9..].iter().all(|&b| !b));
    }
}
