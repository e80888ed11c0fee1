use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::logging::LOG_FILE_PREFIX;

/// Read-only access to the daily rolling log files.
pub trait LogRepository: Send + Sync {
    /// Dates (`YYYY-MM-DD`) that have a log file, newest first.
    fn get_logs(&self) -> Result<Vec<String>>;

    /// Returns `None` when no file exists for `date`.
    fn get_log_lines(&self, date: &str, cursor: usize, limit: usize) -> Result<Option<LogPage>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    pub lines: Vec<String>,
    pub next_cursor: Option<usize>,
}

pub struct LogRepositoryImpl {
    dir: PathBuf,
}

impl LogRepositoryImpl {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{LOG_FILE_PREFIX}.{date}"))
    }
}

impl LogRepository for LogRepositoryImpl {
    fn get_logs(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{LOG_FILE_PREFIX}.");
        let mut dates: Vec<String> = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read log dir {}", self.dir.display()))?
            .flatten()
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .strip_prefix(&prefix)
                    .map(str::to_string)
            })
            .collect();

        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    fn get_log_lines(&self, date: &str, cursor: usize, limit: usize) -> Result<Option<LogPage>> {
        let path = self.file_for(date);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path).context("Failed to open log file")?;
        let mut lines = Vec::with_capacity(limit);
        let mut has_more = false;

        for line in BufReader::new(file).lines().skip(cursor) {
            let line = line?;
            if lines.len() == limit {
                has_more = true;
                break;
            }
            lines.push(line);
        }

        let next_cursor = has_more.then_some(cursor + lines.len());
        Ok(Some(LogPage { lines, next_cursor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_log(dir: &std::path::Path, date: &str, lines: usize) {
        let mut f = File::create(dir.join(format!("{LOG_FILE_PREFIX}.{date}"))).unwrap();
        for i in 0..lines {
            writeln!(f, "line {i}").unwrap();
        }
    }

    #[test]
    fn lists_dates_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        write_log(dir.path(), "2030-01-01", 1);
        write_log(dir.path(), "2030-01-03", 1);
        File::create(dir.path().join("unrelated.txt")).unwrap();

        let repo = LogRepositoryImpl::new(dir.path());
        assert_eq!(repo.get_logs().unwrap(), vec!["2030-01-03", "2030-01-01"]);
    }

    #[test]
    fn pages_through_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_log(dir.path(), "2030-01-01", 5);
        let repo = LogRepositoryImpl::new(dir.path());

        let first = repo.get_log_lines("2030-01-01", 0, 2).unwrap().unwrap();
        assert_eq!(first.lines, vec!["line 0", "line 1"]);
        assert_eq!(first.next_cursor, Some(2));

        let last = repo.get_log_lines("2030-01-01", 4, 2).unwrap().unwrap();
        assert_eq!(last.lines, vec!["line 4"]);
        assert_eq!(last.next_cursor, None);
    }

    #[test]
    fn missing_date_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LogRepositoryImpl::new(dir.path());
        assert!(repo.get_log_lines("2030-01-01", 0, 10).unwrap().is_none());
    }
}
