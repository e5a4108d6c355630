//! Fixture builders shared by the unit tests. The encoders here exist only
//! to produce inputs for the decoders.

pub(crate) mod assets;
pub(crate) mod huffman;
pub(crate) mod maps;
pub(crate) mod rlew;
