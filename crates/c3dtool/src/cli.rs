mod chunks;
mod maps;
mod pictures;

use std::path::PathBuf;

use anyhow::Context as _;
use c3dev::{
    assets::{AssetDomain, AssetStore},
    config::GameConfig,
    graphics::Graphics,
    maps::MapFile,
};
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(version, about = "Inspect and extract Catacomb 3-D asset files")]
pub(crate) struct Cli {
    #[clap(flatten)]
    game: GameArgs,
    /// Log more detail to stderr. Repeat for more.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Cmd,
}

impl Cli {
    pub(crate) fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub(crate) fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Cmd::Chunks(chunks) => chunks.run(&self.game)?,
            Cmd::Pictures(pictures) => pictures.run(&self.game)?,
            Cmd::Maps(maps) => maps.run(&self.game)?,
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Commands for working with raw graphics and audio chunks.
    #[clap(name = "chunks")]
    Chunks(chunks::Chunks),

    /// Commands for working with pictures in the graphics chunks.
    #[clap(name = "pictures", visible_alias = "pics")]
    Pictures(pictures::Pictures),

    /// Commands for working with level maps.
    #[clap(name = "maps")]
    Maps(maps::Maps),
}

/// Where the game files live and how they are named.
#[derive(Args)]
pub(crate) struct GameArgs {
    /// Path to the game's root directory.
    #[clap(long, global = true, default_value = ".")]
    root: PathBuf,
    /// TOML file overriding file names and bit order.
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

impl GameArgs {
    fn config(&self) -> anyhow::Result<GameConfig> {
        match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Loading config {}", path.display())),
            None => Ok(GameConfig::default()),
        }
    }

    pub(crate) fn open_store(&self, domain: AssetDomain) -> anyhow::Result<AssetStore> {
        self.config()?
            .open_store(&self.root, domain)
            .with_context(|| format!("Opening {domain} files in {}", self.root.display()))
    }

    pub(crate) fn open_graphics(&self) -> anyhow::Result<Graphics> {
        Ok(Graphics::new(self.open_store(AssetDomain::Graphics)?))
    }

    pub(crate) fn open_maps(&self) -> anyhow::Result<MapFile> {
        let path = self.root.join(self.config()?.maps());
        MapFile::open(&path).with_context(|| format!("Opening map file {}", path.display()))
    }
}

/// Writes to `path`, creating its parent directory if needed.
pub(crate) fn write_output(path: &std::path::Path, contents: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Creating directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Writing {}", path.display()))
}

/// Totals for a command that keeps going past individual failures.
#[derive(Default)]
pub(crate) struct BatchReport {
    written: usize,
    skipped: usize,
    failed: usize,
}

impl BatchReport {
    pub(crate) fn written(&mut self) {
        self.written += 1;
    }

    pub(crate) fn skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn failed(&mut self, what: &str, err: &dyn std::fmt::Display) {
        log::warn!("{what}: {err}");
        self.failed += 1;
    }

    pub(crate) fn finish(self, noun: &str) -> anyhow::Result<()> {
        eprintln!(
            "Wrote {} {noun}, skipped {} unused, {} failed",
            self.written, self.skipped, self.failed
        );
        if self.failed > 0 {
            anyhow::bail!("{} {noun} failed to decode", self.failed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "c3dtool", "maps", "list", "--root", "/games/c3d", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        assert_eq!(cli.game.root, PathBuf::from("/games/c3d"));
        assert!(cli.game.config.is_none());
    }

    #[test]
    fn batch_report_fails_on_any_error() {
        let mut report = BatchReport::default();
        report.written();
        report.skipped();
        assert!(report.finish("chunks").is_ok());

        let mut report = BatchReport::default();
        report.written();
        report.failed("chunk 3", &"bad data");
        assert!(report.finish("chunks").is_err());
    }

    #[test]
    fn write_output_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.bin");
        write_output(&path, b"data").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"data");
    }
}
