use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use c3dev::{
    assets::{AssetDomain, AssetStore, ChunkOffset},
    utils::debug::hex_dump_to,
};
use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::{BatchReport, GameArgs, write_output};

#[derive(Clone, Copy, ValueEnum)]
enum Domain {
    Graphics,
    Audio,
}

impl From<Domain> for AssetDomain {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Graphics => AssetDomain::Graphics,
            Domain::Audio => AssetDomain::Audio,
        }
    }
}

/// Lists every chunk slot with its offset and compressed size.
#[derive(Parser)]
struct ListChunks {
    /// Only show slots that hold data.
    #[clap(long)]
    present_only: bool,
}

impl ListChunks {
    fn run(&self, store: &AssetStore) -> anyhow::Result<()> {
        let directory = store.directory();
        let mut out = std::io::stdout().lock();
        writeln!(out, "{:>5}  {:>8}  {:>8}", "index", "offset", "size")?;
        for index in 0..directory.chunk_count() {
            match directory.entry(index)? {
                ChunkOffset::Present(offset) => {
                    let size = directory
                        .byte_range(index)
                        .map_or_else(|_| "?".to_string(), |range| range.len().to_string());
                    writeln!(out, "{index:>5}  {offset:>8x}  {size:>8}")?;
                }
                ChunkOffset::Sparse if !self.present_only => {
                    writeln!(out, "{index:>5}  {:>8}  {:>8}", "-", "-")?;
                }
                ChunkOffset::Sparse => {}
            }
        }
        Ok(())
    }
}

/// Decodes one chunk and prints a hex dump of it.
#[derive(Parser)]
struct DumpChunk {
    /// The chunk index.
    #[clap(index = 1)]
    index: usize,
    /// Write the decoded bytes to this file instead of dumping them.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
    /// Dump the compressed bytes, length prefix included.
    #[clap(long)]
    raw: bool,
}

impl DumpChunk {
    fn run(&self, store: &AssetStore) -> anyhow::Result<()> {
        let data = if self.raw {
            store.raw_chunk(self.index)?
        } else {
            store.chunk(self.index)?
        };
        let data = data.with_context(|| format!("Chunk {} is unused", self.index))?;
        match &self.output {
            Some(path) => write_output(path, &data)?,
            None => hex_dump_to(std::io::stdout().lock(), &data, 0)?,
        }
        Ok(())
    }
}

/// Decodes a range of chunks into `<index>.bin` files.
#[derive(Parser)]
struct ExtractChunks {
    /// First chunk index to extract.
    #[clap(index = 1)]
    start: usize,
    /// Index one past the last chunk to extract.
    #[clap(index = 2)]
    end: usize,
    /// Directory to write the chunk files into.
    #[clap(short = 'o', long)]
    output_dir: PathBuf,
}

impl ExtractChunks {
    fn run(&self, store: &AssetStore) -> anyhow::Result<()> {
        let mut report = BatchReport::default();
        for index in self.start..self.end {
            match store.chunk(index) {
                Ok(Some(data)) => {
                    write_output(&self.output_dir.join(format!("{index}.bin")), &data)?;
                    report.written();
                }
                Ok(None) => {
                    log::debug!("Chunk {index} is unused");
                    report.skipped();
                }
                Err(err) => report.failed(&format!("Chunk {index}"), &err),
            }
        }
        report.finish("chunks")
    }
}

#[derive(Subcommand)]
enum ChunksCommand {
    #[clap(name = "list", visible_alias = "ls")]
    List(ListChunks),
    #[clap(name = "dump")]
    Dump(DumpChunk),
    #[clap(name = "extract")]
    Extract(ExtractChunks),
}

#[derive(Parser)]
pub(crate) struct Chunks {
    /// Which set of asset files to read.
    #[clap(index = 1, value_enum)]
    domain: Domain,
    #[clap(subcommand)]
    command: ChunksCommand,
}

impl Chunks {
    pub(crate) fn run(&self, game: &GameArgs) -> anyhow::Result<()> {
        let store = game.open_store(self.domain.into())?;
        match &self.command {
            ChunksCommand::List(list) => list.run(&store),
            ChunksCommand::Dump(dump) => dump.run(&store),
            ChunksCommand::Extract(extract) => extract.run(&store),
        }
    }
}
