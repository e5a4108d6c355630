//! Decompressors for the three schemes used by the asset containers.
//!
//! Graphics and audio chunks are Huffman-coded against a per-file dictionary.
//! Map planes are Carmack-compressed on top of RLEW. None of these schemes
//! are written back out, so only the expanding direction exists here.

pub mod bits;
pub mod carmack;
pub mod huffman;
pub mod rlew;
