use crate::{
    assets::{AssetStore, DirectoryFormat},
    compression::bits::BitOrder,
    testing::huffman::{balanced_dictionary, dictionary_bytes, encode},
};

/// Builds a graphics-format store whose slot `i` holds `chunks[i]`, with
/// `None` marking an unused slot.
pub(crate) fn graphics_store(chunks: &[Option<&[u8]>]) -> AssetStore {
    let dict = balanced_dictionary();
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for chunk in chunks {
        match chunk {
            Some(contents) => {
                push_offset(&mut directory, data.len());
                let encoded = encode(&dict, contents, BitOrder::LsbFirst);
                let declared = u32::try_from(contents.len()).unwrap();
                data.extend_from_slice(&declared.to_le_bytes());
                data.extend_from_slice(&encoded.bytes);
            }
            None => directory.extend_from_slice(&[0xFF; 3]),
        }
    }
    push_offset(&mut directory, data.len());

    AssetStore::from_parts(
        DirectoryFormat::GRAPHICS.with_entry_count(chunks.len() + 1),
        BitOrder::LsbFirst,
        data,
        &directory,
        &dictionary_bytes(&dict),
    )
    .unwrap()
}

fn push_offset(directory: &mut Vec<u8>, offset: usize) {
    let offset = u32::try_from(offset).unwrap();
    directory.extend_from_slice(&offset.to_le_bytes()[..3]);
}
