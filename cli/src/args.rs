use anyhow::{Context, Result};
use clap::Parser;
use sapper_core::{CellCount, Coord, Difficulty, GameConfig, MinePlacement, SizePreset};
use std::{fs, path::Path, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// TOML file with the base game settings, flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board size preset: small, medium or large
    #[arg(long)]
    pub size: Option<SizePreset>,

    /// Mine density preset: easy, medium or hard
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    #[arg(long)]
    pub rows: Option<Coord>,

    #[arg(long)]
    pub cols: Option<Coord>,

    /// Fraction of cells holding a mine, between 0 and 1
    #[arg(long)]
    pub density: Option<f64>,

    /// Exact number of mines, instead of a density
    #[arg(short, long)]
    pub mines: Option<CellCount>,

    /// Seconds allowed after the first move
    #[arg(short, long)]
    pub budget: Option<u32>,

    /// Mine placement: exact or redraw
    #[arg(long)]
    pub placement: Option<MinePlacement>,

    /// Show where the mines are from the start
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GameConfig::default(),
        };

        if let Some(size) = self.size {
            (config.rows, config.cols) = size.dimensions();
        }
        if let Some(difficulty) = self.difficulty {
            config.density = difficulty.density();
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(density) = self.density {
            config.density = density;
        }
        if self.mines.is_some() {
            config.mines = self.mines;
        }
        if self.budget.is_some() {
            config.time_budget = self.budget;
        }
        if let Some(placement) = self.placement {
            config.placement = placement;
        }

        config.validate().context("invalid game settings")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("could not parse {}", path.display()))
}
