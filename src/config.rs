//! City source registry and runtime configuration.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Cities shipped with the original data set and their file names.
pub const BUILTIN_CITIES: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default directive for the stderr log layer. Kept at `warn` so span-close
/// lines stay out of the interactive prompts; `RUST_LOG` adds to it.
pub const STDERR_LOG_DIRECTIVE: &str = "warn";

/// Default directive for the JSON log file layer.
pub const FILE_LOG_DIRECTIVE: &str = "debug";

/// Maps city identifiers to CSV trip sources.
///
/// Can be loaded from a JSON object on disk:
/// ```json
/// {
///   "chicago": "data/chicago.csv",
///   "washington": "/srv/bikeshare/washington.csv"
/// }
/// ```
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    entries: BTreeMap<String, PathBuf>,
}

impl CityRegistry {
    /// The three built-in cities, resolved against `data_dir`.
    pub fn builtin(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let entries = BUILTIN_CITIES
            .iter()
            .map(|(city, file)| (city.to_string(), data_dir.join(file)))
            .collect();
        Self { entries }
    }

    /// Loads the city map from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read city map {}", path.display()))?;
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&content)
            .with_context(|| format!("invalid city map {}", path.display()))?;

        let data_dir = data_dir.as_ref();
        let entries = raw
            .into_iter()
            .map(|(city, file)| (normalize(&city), data_dir.join(file)))
            .collect();
        Ok(Self { entries })
    }

    /// Returns the source path for `city`, matched case-insensitively.
    pub fn resolve(&self, city: &str) -> Option<&Path> {
        self.entries.get(&normalize(city)).map(PathBuf::as_path)
    }

    /// Iterates over city identifiers in sorted order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Settings resolved from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cities_file: Option<PathBuf>,
    pub page_size: NonZeroUsize,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            color: true,
        }
    }
}

impl Config {
    /// Fills unset values from `BIKESHARE_DATA_DIR`, `BIKESHARE_CITIES` and
    /// `BIKESHARE_PAGE_SIZE`.
    pub fn from_env(
        data_dir: Option<PathBuf>,
        cities_file: Option<PathBuf>,
        page_size: Option<NonZeroUsize>,
    ) -> Result<Self> {
        let data_dir = data_dir
            .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let cities_file =
            cities_file.or_else(|| std::env::var_os("BIKESHARE_CITIES").map(PathBuf::from));

        let page_size = match page_size {
            Some(n) => n,
            None => match std::env::var("BIKESHARE_PAGE_SIZE") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("BIKESHARE_PAGE_SIZE must be a positive integer, got '{raw}'"))?,
                Err(_) => DEFAULT_PAGE_SIZE,
            },
        };

        Ok(Self {
            data_dir,
            cities_file,
            page_size,
            color: true,
        })
    }

    pub fn registry(&self) -> Result<CityRegistry> {
        match &self.cities_file {
            Some(path) => CityRegistry::load(path, &self.data_dir),
            None => Ok(CityRegistry::builtin(&self.data_dir)),
        }
    }
}
