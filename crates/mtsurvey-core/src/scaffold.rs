// crates/mtsurvey-core/src/scaffold.rs

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Environment variable selecting the recognized subdirectory set.
pub const LAYOUT_ENV: &str = "MTSURVEY_LAYOUT";

const CLASSIC_SUBDIRS: &[&str] = &[
    "config",
    "db",
    "dump",
    "edi",
    "filters",
    "jle",
    "jobs",
    "log",
    "meta",
    "processings",
    "shell",
    "stations",
    "tmp",
];

const EXTENDED_SUBDIRS: &[&str] = &[
    "config",
    "db",
    "dump",
    "edi",
    "filters",
    "jle",
    "jobs",
    "log",
    "processings",
    "shell",
    "tmp",
    "stations",
    "reports",
];

/// The two recognized survey folder sets. `Classic` keeps the `meta`
/// directory; `Extended` trades it for `reports`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurveyLayout {
    #[default]
    Classic,
    Extended,
}

impl SurveyLayout {
    pub fn subdirs(&self) -> &'static [&'static str] {
        match self {
            SurveyLayout::Classic => CLASSIC_SUBDIRS,
            SurveyLayout::Extended => EXTENDED_SUBDIRS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyLayout::Classic => "classic",
            SurveyLayout::Extended => "extended",
        }
    }

    /// Layout from `MTSURVEY_LAYOUT`, falling back to `Classic` when the
    /// variable is unset or unrecognized.
    pub fn from_env() -> Self {
        match std::env::var(LAYOUT_ENV) {
            Ok(raw) => SurveyLayout::try_from(raw.as_str()).unwrap_or_else(|err| {
                warn!("{err}, using {}", SurveyLayout::default());
                SurveyLayout::default()
            }),
            Err(_) => SurveyLayout::default(),
        }
    }
}

impl fmt::Display for SurveyLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SurveyLayout {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" | "a" => Ok(SurveyLayout::Classic),
            "extended" | "b" => Ok(SurveyLayout::Extended),
            other => Err(format!("unknown survey layout '{other}'")),
        }
    }
}

/// Per-directory outcomes of one scaffolding run.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl ScaffoldReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Creates the survey folder tree under `root`, creating `root` itself
/// first when missing. Idempotent: existing directories are left alone. A
/// subdirectory that cannot be created is reported and recorded, and its
/// siblings are still attempted; only a root that cannot be created (or is
/// a file) aborts the run.
pub fn create_survey_tree(root: &Path, layout: SurveyLayout) -> Result<ScaffoldReport> {
    if !root.is_dir() {
        fs::create_dir_all(root)?;
    }

    let mut report = ScaffoldReport::default();
    for name in layout.subdirs() {
        let dir = root.join(name);
        println!("creating {}", dir.display());
        if dir.is_dir() {
            report.existing.push(dir);
            continue;
        }
        match fs::create_dir(&dir) {
            Ok(()) => report.created.push(dir),
            Err(err) => {
                eprintln!("  -> WARNING: could not create {}: {}", dir.display(), err);
                warn!(dir = %dir.display(), error = %err, "subdirectory creation failed");
                report.failed.push((dir, err));
            }
        }
    }

    Ok(report)
}
