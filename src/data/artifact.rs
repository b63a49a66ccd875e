use std::path::{Path, PathBuf};

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use walkdir::WalkDir;

/// Days searched back from today before giving up on a fresh artifact.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 10;

static ISO_DATE: OnceLock<Regex> = OnceLock::new();

// ---------------------------------------------------------------------------
// Injected collaborators: clock + artifact listing
// ---------------------------------------------------------------------------

/// Source of "today" for the lookup.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Lists candidate artifact files.
pub trait ArtifactSource {
    fn artifacts(&self) -> Vec<PathBuf>;
}

impl ArtifactSource for Vec<PathBuf> {
    fn artifacts(&self) -> Vec<PathBuf> {
        self.clone()
    }
}

/// Every file under `root` (recursively) with the given extension.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        DirectorySource {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Parquet artifacts under `root`.
    pub fn parquet(root: impl Into<PathBuf>) -> Self {
        Self::new(root, "parquet")
    }
}

impl ArtifactSource for DirectorySource {
    fn artifacts(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {e}", self.root.display());
                    continue;
                }
            };
            let matches = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
            if matches {
                found.push(entry.into_path());
            }
        }
        found
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Bounded search policy.
#[derive(Debug, Clone)]
pub struct LookupPolicy {
    /// Number of days tried, starting with today.
    pub max_lookback: u32,
    /// Artifact used when nothing recent exists.
    pub fallback: PathBuf,
}

impl LookupPolicy {
    pub fn new(fallback: impl Into<PathBuf>) -> Self {
        LookupPolicy {
            max_lookback: DEFAULT_LOOKBACK_DAYS,
            fallback: fallback.into(),
        }
    }
}

/// The artifact chosen for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub path: PathBuf,
    /// As-of date of the data in `path`.
    pub as_of: NaiveDate,
    /// `true` when the lookback found nothing and the fallback was used.
    pub stale: bool,
}

/// Find the newest artifact whose file name contains one of the last
/// `max_lookback` dates (today first).
///
/// Never fails: without a match the fallback is returned, dated by the date
/// embedded in its file name or, if it has none, by the day before the
/// oldest one searched.
pub fn find_latest_artifact(
    source: &dyn ArtifactSource,
    clock: &dyn Clock,
    policy: &LookupPolicy,
) -> ArtifactLocation {
    let files = source.artifacts();
    let today = clock.today();

    for back in 0..policy.max_lookback {
        let Some(date) = today.checked_sub_days(Days::new(back.into())) else {
            break;
        };
        let needle = date.format("%Y-%m-%d").to_string();
        let hit = files
            .iter()
            .filter(|p| file_name(p).contains(&needle))
            .max();
        if let Some(path) = hit {
            log::info!("Using artifact {} (as of {date})", path.display());
            return ArtifactLocation {
                path: path.clone(),
                as_of: date,
                stale: false,
            };
        }
    }

    let as_of = embedded_date(&policy.fallback).unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(policy.max_lookback.into()))
            .unwrap_or(today)
    });
    log::warn!(
        "No artifact in the last {} days; falling back to {} (as of {as_of})",
        policy.max_lookback,
        policy.fallback.display()
    );
    ArtifactLocation {
        path: policy.fallback.clone(),
        as_of,
        stale: true,
    }
}

/// Last `YYYY-MM-DD` date embedded in the file name of `path`.
pub fn embedded_date(path: &Path) -> Option<NaiveDate> {
    let re = ISO_DATE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date pattern"));
    let matches: Vec<&str> = re.find_iter(file_name(path)).map(|m| m.as_str()).collect();
    matches
        .into_iter()
        .rev()
        .find_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// File name written by the ingestion job, e.g.
/// `2020-2022-all-covid-data-through-2022-04-02.parquet`.
pub fn artifact_file_name(oldest_year: i32, newest_year: i32, through: NaiveDate) -> String {
    format!(
        "{oldest_year}-{newest_year}-all-covid-data-through-{}.parquet",
        through.format("%Y-%m-%d")
    )
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}
