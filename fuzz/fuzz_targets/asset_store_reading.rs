#![no_main]

use c3dev::{
    assets::{AssetDomain, DirectoryFormat},
    compression::huffman::DICTIONARY_SIZE,
    config::GameConfig,
};
use libfuzzer_sys::fuzz_target;

fn body(root_dir: &std::path::Path) -> anyhow::Result<()> {
    let store = GameConfig::default().open_store(root_dir, AssetDomain::Graphics)?;
    let present: Vec<usize> = store.present_indices().collect();
    for index in present {
        if let Ok(Some(chunk)) = store.chunk(index) {
            assert_eq!(store.chunk(index)?, Some(chunk));
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let header_len = DirectoryFormat::GRAPHICS.byte_len();
    if data.len() < header_len + DICTIONARY_SIZE {
        return;
    }
    let (header_data, rest) = data.split_at(header_len);
    let (dict_data, graph_data) = rest.split_at(DICTIONARY_SIZE);
    let tempdir = tempfile::tempdir().unwrap();

    std::fs::write(tempdir.path().join("EGAHEAD.C3D"), header_data).unwrap();
    std::fs::write(tempdir.path().join("EGADICT.C3D"), dict_data).unwrap();
    std::fs::write(tempdir.path().join("EGAGRAPH.C3D"), graph_data).unwrap();

    let _ = body(tempdir.path());
});
