//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{AssetSource, BuiltinSource, DirSource};

pub const DEFAULT_LOG_FILE: &str = "junk_food_attack.log";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "junk_food_attack")]
#[command(about = "Dodge and destroy waves of descending junk food")]
pub struct Config {
    /// Directory with burger.png, fries.png, ... (built-in art when omitted)
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Seed for wave layout and enemy fire
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log destination (defaults to junk_food_attack.log in the temp dir)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn asset_source(&self) -> Box<dyn AssetSource> {
        match &self.assets {
            Some(dir) => Box::new(DirSource::new(dir.clone())),
            None => Box::new(BuiltinSource),
        }
    }
}
