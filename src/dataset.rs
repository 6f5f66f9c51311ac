//! Trip records and the CSV loader.
//!
//! A [`TripDataset`] is an immutable, ordered list of [`TripRecord`]s in
//! source-file order. Filtering produces a new dataset, it never edits one.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use tracing::{debug, info};

use crate::calendar;
use crate::config::CityRegistry;
use crate::error::LoadError;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Largest fractional duration that still converts to whole seconds exactly.
const MAX_FRACTIONAL_DURATION: f64 = 9_007_199_254_740_992.0;

/// One logged bicycle trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub id: u64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_seconds: u64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month_name: &'static str,
    weekday_name: &'static str,
}

impl TripRecord {
    /// Builds a record, deriving its month and weekday names from `start_time`.
    pub fn new(
        id: u64,
        start_time: NaiveDateTime,
        duration_seconds: u64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        TripRecord {
            id,
            start_time,
            end_time: None,
            duration_seconds,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month_name: calendar::month_name(&start_time),
            weekday_name: calendar::weekday_name(&start_time),
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_demographics(mut self, gender: Option<&str>, birth_year: Option<i32>) -> Self {
        self.gender = gender.map(str::to_string);
        self.birth_year = birth_year;
        self
    }

    pub fn month_name(&self) -> &'static str {
        self.month_name
    }

    pub fn weekday_name(&self) -> &'static str {
        self.weekday_name
    }

    /// Trip key used for the most-common-trip statistic.
    pub fn trip_key(&self) -> String {
        format!("{} / {}", self.start_station, self.end_station)
    }
}

/// Which optional rider columns a source carries. Shared by every record
/// of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Demographics {
    pub gender: bool,
    pub birth_year: bool,
}

impl Demographics {
    pub const NONE: Demographics = Demographics {
        gender: false,
        birth_year: false,
    };

    pub const FULL: Demographics = Demographics {
        gender: true,
        birth_year: true,
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDataset {
    records: Vec<TripRecord>,
    demographics: Demographics,
}

impl TripDataset {
    /// Builds a dataset from records already in memory. Optional fields of
    /// columns the schema does not carry are cleared.
    pub fn from_records(mut records: Vec<TripRecord>, demographics: Demographics) -> Self {
        for r in &mut records {
            if !demographics.gender {
                r.gender = None;
            }
            if !demographics.birth_year {
                r.birth_year = None;
            }
        }
        TripDataset {
            records,
            demographics,
        }
    }

    /// Resolves `city` through the registry and loads its CSV source.
    #[tracing::instrument(skip(registry))]
    pub fn load(registry: &CityRegistry, city: &str) -> Result<Self, LoadError> {
        let path = registry
            .resolve(city)
            .ok_or_else(|| LoadError::UnknownSource(city.to_string()))?;

        debug!(path = %path.display(), "Opening trip source");
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let dataset = Self::read_csv(file, &path.display().to_string())?;
        info!(
            records = dataset.len(),
            gender = dataset.demographics.gender,
            birth_year = dataset.demographics.birth_year,
            "Trip data loaded"
        );
        Ok(dataset)
    }

    /// Parses CSV trip data. Any malformed row fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::read_csv(reader, "<input>")
    }

    /// `source` names the input in I/O errors.
    fn read_csv<R: Read>(reader: R, source: &str) -> Result<Self, LoadError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers().map_err(|e| csv_error(e, source))?.clone();

        let demographics = Demographics {
            gender: headers.iter().any(|h| h == "Gender"),
            birth_year: headers.iter().any(|h| h == "Birth Year"),
        };

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut raw = csv::StringRecord::new();

        while rdr.read_record(&mut raw).map_err(|e| csv_error(e, source))? {
            let line = raw.position().map(|p| p.line()).unwrap_or_default();
            let row: RawTripRow = raw
                .deserialize(Some(&headers))
                .map_err(|e| LoadError::schema(line, e.to_string()))?;
            let record = row.into_record(line, demographics)?;

            if !seen.insert(record.id) {
                return Err(LoadError::schema(
                    line,
                    format!("duplicate trip id {}", record.id),
                ));
            }
            records.push(record);
        }

        Ok(TripDataset {
            records,
            demographics,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    pub fn demographics(&self) -> Demographics {
        self.demographics
    }
}

impl<'a> IntoIterator for &'a TripDataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A row as it appears in the source CSV.
#[derive(Debug, Deserialize)]
struct RawTripRow {
    #[serde(rename = "", alias = "ID", alias = "Unnamed: 0")]
    id: u64,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTripRow {
    fn into_record(self, line: u64, demographics: Demographics) -> Result<TripRecord, LoadError> {
        let start_time = parse_timestamp(&self.start_time)
            .ok_or_else(|| LoadError::schema(line, format!("invalid Start Time '{}'", self.start_time)))?;

        let end_time = match non_blank(self.end_time) {
            Some(raw) => Some(
                parse_timestamp(&raw)
                    .ok_or_else(|| LoadError::schema(line, format!("invalid End Time '{raw}'")))?,
            ),
            None => None,
        };

        let duration_seconds = parse_duration(&self.trip_duration).ok_or_else(|| {
            LoadError::schema(line, format!("invalid Trip Duration '{}'", self.trip_duration))
        })?;

        let start_station = self.start_station.trim();
        let end_station = self.end_station.trim();
        if start_station.is_empty() || end_station.is_empty() {
            return Err(LoadError::schema(line, "empty station name"));
        }

        let birth_year = match self.birth_year {
            Some(y) if demographics.birth_year => {
                if !y.is_finite() || y.fract() != 0.0 {
                    return Err(LoadError::schema(line, format!("invalid Birth Year {y}")));
                }
                Some(y as i32)
            }
            _ => None,
        };

        let mut record = TripRecord::new(
            self.id,
            start_time,
            duration_seconds,
            start_station,
            end_station,
        );
        record.end_time = end_time;
        record.user_type = non_blank(self.user_type);
        record.gender = non_blank(self.gender).filter(|_| demographics.gender);
        record.birth_year = birth_year;
        Ok(record)
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Whole seconds are taken as written. Fractional values are rounded, and
/// only accepted while they fit a `u64` without losing precision.
fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(seconds);
    }
    let seconds = raw.parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let rounded = seconds.round();
    (rounded <= MAX_FRACTIONAL_DURATION).then_some(rounded as u64)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn csv_error(err: csv::Error, path: &str) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or_default();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_string(),
            source,
        },
        kind => LoadError::schema(line, format!("{kind:?}")),
    }
}
