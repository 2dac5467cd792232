use std::path::PathBuf;

use fretboard_core::storage::FileStorage;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const APP_DIR: &str = "fretboard-trainer";

/// Settings resolved once from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Config {
    pub fn resolve(data_dir: Option<PathBuf>, seed: Option<u64>) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            seed,
        }
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    pub fn rng(&self) -> Pcg32 {
        match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}
