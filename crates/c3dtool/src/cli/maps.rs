use std::path::PathBuf;

use anyhow::Context as _;
use c3dev::{
    maps::{MAP_PLANE_COUNT, MapFile},
    utils::debug::hex_dump_to,
};
use clap::{Parser, Subcommand};
use itertools::Itertools as _;

use crate::cli::{BatchReport, GameArgs, write_output};

/// Lists the maps with their sizes and compressed plane lengths.
#[derive(Parser)]
struct ListMaps {}

impl ListMaps {
    fn run(&self, maps: &MapFile) -> anyhow::Result<()> {
        for (index, header) in maps.headers().iter().enumerate() {
            let lengths = (0..MAP_PLANE_COUNT)
                .filter_map(|plane| header.plane_length(plane))
                .join("/");
            println!(
                "{index:>3}  {:<16}  {:>3}x{:<3}  planes {lengths}",
                header.name(),
                header.width(),
                header.height()
            );
        }
        Ok(())
    }
}

/// Expands one plane and dumps its words.
#[derive(Parser)]
struct DumpPlane {
    /// The map index.
    #[clap(index = 1)]
    map: usize,
    /// The plane index (0 = layout, 1 = unused, 2 = entities).
    #[clap(index = 2)]
    plane: usize,
    /// Write the expanded plane to this file instead of dumping it.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}

impl DumpPlane {
    fn run(&self, maps: &MapFile) -> anyhow::Result<()> {
        let plane = maps
            .plane(self.map, self.plane)?
            .with_context(|| format!("Map {} plane {} is empty", self.map, self.plane))?;
        match &self.output {
            Some(path) => write_output(path, plane.as_bytes())?,
            None => hex_dump_to(std::io::stdout().lock(), plane.as_bytes(), 0)?,
        }
        Ok(())
    }
}

/// Prints a map as a grid of wall and entity tiles.
#[derive(Parser)]
struct ShowMap {
    /// The map index.
    #[clap(index = 1)]
    map: usize,
}

impl ShowMap {
    fn run(&self, maps: &MapFile) -> anyhow::Result<()> {
        let level = maps.level(self.map)?;
        println!("{} ({}x{})", level.name(), level.width(), level.height());
        for row in level.text_rows() {
            println!("{row}");
        }
        Ok(())
    }
}

/// Exports every map as a `.c3dmap` file of layout and entity tiles.
#[derive(Parser)]
struct ExportMaps {
    /// Directory to write the map files into.
    #[clap(short = 'o', long)]
    output_dir: PathBuf,
}

impl ExportMaps {
    fn run(&self, maps: &MapFile) -> anyhow::Result<()> {
        let mut report = BatchReport::default();
        for index in 0..maps.len() {
            let exported = maps
                .level(index)
                .and_then(|level| Ok((level.to_c3dmap_bytes()?, level)));
            match exported {
                Ok((bytes, level)) => {
                    let file_name = format!("{index}_{}.c3dmap", level.name().replace(' ', "_"));
                    write_output(&self.output_dir.join(file_name), &bytes)?;
                    report.written();
                }
                Err(err) => report.failed(&format!("Map {index}"), &err),
            }
        }
        report.finish("maps")
    }
}

#[derive(Subcommand)]
enum MapsCommand {
    #[clap(name = "list", visible_alias = "ls")]
    List(ListMaps),
    #[clap(name = "plane")]
    Plane(DumpPlane),
    #[clap(name = "show")]
    Show(ShowMap),
    #[clap(name = "export")]
    Export(ExportMaps),
}

#[derive(Parser)]
pub(crate) struct Maps {
    #[clap(subcommand)]
    command: MapsCommand,
}

impl Maps {
    pub(crate) fn run(&self, game: &GameArgs) -> anyhow::Result<()> {
        let maps = game.open_maps()?;
        match &self.command {
            MapsCommand::List(list) => list.run(&maps),
            MapsCommand::Plane(plane) => plane.run(&maps),
            MapsCommand::Show(show) => show.run(&maps),
            MapsCommand::Export(export) => export.run(&maps),
        }
    }
}
