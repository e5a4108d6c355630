use std::path::PathBuf;

use c3dev::graphics::{FIRST_PICTURE_CHUNK, Graphics, PixelSource as _};
use clap::{Parser, Subcommand};

use crate::cli::{BatchReport, GameArgs, write_output};

/// Prints the picture table.
#[derive(Parser)]
struct PictureTable {}

impl PictureTable {
    fn run(&self, graphics: &Graphics) -> anyhow::Result<()> {
        for (row, dimensions) in graphics.picture_table()?.iter().enumerate() {
            println!("{:>5}  {dimensions}", row + FIRST_PICTURE_CHUNK);
        }
        Ok(())
    }
}

/// Shows the dimensions and plane data of one picture.
#[derive(Parser)]
struct PictureInfo {
    /// The chunk index of the picture.
    #[clap(index = 1)]
    index: usize,
}

impl PictureInfo {
    fn run(&self, graphics: &Graphics) -> anyhow::Result<()> {
        let dimensions = graphics.dimensions(self.index)?;
        println!("Picture {}: {dimensions}", self.index);
        match graphics.picture(self.index)? {
            Some(picture) => {
                println!(
                    "  {} bytes, {} per plane, all planes present: {}",
                    picture.data().len(),
                    picture.plane_size(),
                    picture.has_all_planes()
                );
            }
            None => println!("  chunk is unused"),
        }
        Ok(())
    }
}

/// Exports a range of pictures as raw RGBA files named `<index>.rgba`.
#[derive(Parser)]
struct ExportPictures {
    /// First chunk index to export.
    #[clap(index = 1)]
    start: usize,
    /// Index one past the last chunk to export.
    #[clap(index = 2)]
    end: usize,
    /// Directory to write the images into.
    #[clap(short = 'o', long)]
    output_dir: PathBuf,
}

impl ExportPictures {
    fn run(&self, graphics: &Graphics) -> anyhow::Result<()> {
        let mut report = BatchReport::default();
        for index in self.start..self.end {
            match graphics.picture(index) {
                Ok(Some(picture)) => {
                    let (width, height) = picture.bounds();
                    log::info!("Picture {index}: {width}x{height}");
                    let path = self.output_dir.join(format!("{index}.rgba"));
                    write_output(&path, &picture.to_rgba_bytes())?;
                    report.written();
                }
                Ok(None) => {
                    log::debug!("Picture {index} is unused");
                    report.skipped();
                }
                Err(err) => report.failed(&format!("Picture {index}"), &err),
            }
        }
        report.finish("pictures")
    }
}

#[derive(Subcommand)]
enum PicturesCommand {
    #[clap(name = "table")]
    Table(PictureTable),
    #[clap(name = "info")]
    Info(PictureInfo),
    #[clap(name = "export")]
    Export(ExportPictures),
}

#[derive(Parser)]
pub(crate) struct Pictures {
    #[clap(subcommand)]
    command: PicturesCommand,
}

impl Pictures {
    pub(crate) fn run(&self, game: &GameArgs) -> anyhow::Result<()> {
        let graphics = game.open_graphics()?;
        match &self.command {
            PicturesCommand::Table(table) => table.run(&graphics),
            PicturesCommand::Info(info) => info.run(&graphics),
            PicturesCommand::Export(export) => export.run(&graphics),
        }
    }
}
