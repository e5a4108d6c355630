#![no_main]

use c3dev::maps::{MAP_PLANE_COUNT, MapFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(maps) = MapFile::from_bytes(data.to_vec()) else {
        return;
    };
    for map in 0..maps.len() {
        for plane in 0..MAP_PLANE_COUNT {
            if let Ok(Some(plane)) = maps.plane(map, plane) {
                assert_eq!(plane.as_bytes().len(), plane.width() * plane.height() * 2);
                let _ = plane.tile_bytes();
            }
        }
        let _ = maps.level(map);
    }
});
