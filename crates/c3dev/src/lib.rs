//! Decoders for the asset containers of Catacomb 3-D era DOS games.
//!
//! The graphics and audio files share one layout: a directory of chunk
//! offsets, a 256-node Huffman dictionary, and a data blob of length-prefixed
//! Huffman payloads. Level maps live in a separate container whose planes are
//! Carmack- and then RLEW-compressed. This crate resolves and expands all of
//! them into plain byte buffers and pixel sources; presentation formats are
//! left to callers.

pub mod assets;
pub mod compression;
pub mod config;
pub mod graphics;
pub mod maps;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
