//! Defines the [`Sighting`] type and the logic for discovering sightings in
//! an image directory. A sighting is an image file whose name follows the
//! pattern `YYYY-MM-DD at HH.MM.SS in Location.ext`; every other file in the
//! directory is ignored.

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static FILE_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d{4}-\d{2}-\d{2}) at (\d{2}\.\d{2}\.\d{2}) in (.+)\.(jpe?g|png|webp|gif)$",
    )
    .expect("file name pattern is valid")
});

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H.%M.%S";

/// A single photo parsed from its file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sighting {
    /// The capture date.
    pub date: NaiveDate,

    /// The local capture time.
    pub time: NaiveTime,

    /// Free text naming where the photo was taken, trimmed of surrounding
    /// whitespace.
    pub location: String,

    /// The file name on disk, exactly as listed.
    pub file_name: String,
}

impl Sighting {
    /// Parses a [`Sighting`] from a file name. Returns [`None`] if the name
    /// doesn't follow the sighting pattern or if its date or time isn't a real
    /// calendar value.
    pub fn from_file_name(file_name: &str) -> Option<Sighting> {
        let captures = FILE_NAME_PATTERN.captures(file_name)?;
        let date = NaiveDate::parse_from_str(&captures[1], DATE_FORMAT).ok()?;
        let time = NaiveTime::parse_from_str(&captures[2], TIME_FORMAT).ok()?;
        Some(Sighting {
            date,
            time,
            location: captures[3].trim().to_owned(),
            file_name: file_name.to_owned(),
        })
    }

    /// Orders sightings newest first. Sightings captured in the same second
    /// fall back to their file names so that the order never depends on the
    /// directory listing.
    pub fn newest_first(a: &Sighting, b: &Sighting) -> Ordering {
        (b.date, b.time)
            .cmp(&(a.date, a.time))
            .then_with(|| a.file_name.cmp(&b.file_name))
    }
}

/// Sorts sightings newest first. See [`Sighting::newest_first`].
pub fn sort(sightings: &mut [Sighting]) {
    sightings.sort_by(Sighting::newest_first);
}

/// Lists the immediate entries of `dir` and returns every regular file that
/// parses as a [`Sighting`], newest first. Subdirectories, symlinks, and
/// files with non-UTF-8 or non-matching names are skipped.
pub fn scan(dir: &Path) -> Result<Vec<Sighting>> {
    let mut sightings: Vec<Sighting> = Vec::new();

    for result in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = result.map_err(|err| Error::Walk {
            path: dir.to_owned(),
            err,
        })?;
        if !entry.file_type().is_file() {
            debug!("Skipping non-file `{}`", entry.path().display());
            continue;
        }
        match entry.file_name().to_str().and_then(Sighting::from_file_name) {
            Some(sighting) => sightings.push(sighting),
            None => debug!("Skipping `{}`", entry.path().display()),
        }
    }

    sort(&mut sightings);
    Ok(sightings)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem reading the image directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when the directory (or one of its entries) can't be read.
    Walk { path: PathBuf, err: walkdir::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Walk { path, err } => {
                write!(f, "Reading image directory '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Walk { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir, File};

    fn sighting(file_name: &str) -> Sighting {
        Sighting::from_file_name(file_name).unwrap()
    }

    #[test]
    fn test_parse_file_name() {
        let s = sighting("2024-03-05 at 14.30.00 in Glasgow.jpg");
        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), s.date);
        assert_eq!(NaiveTime::from_hms_opt(14, 30, 0).unwrap(), s.time);
        assert_eq!("Glasgow", s.location);
        assert_eq!("2024-03-05 at 14.30.00 in Glasgow.jpg", s.file_name);
    }

    #[test]
    fn test_parse_location_with_punctuation_and_spaces() {
        let s = sighting("2023-11-20 at 08.05.59 in  Byres Road, Glasgow (West End) .png");
        assert_eq!("Byres Road, Glasgow (West End)", s.location);
    }

    #[test]
    fn test_parse_extension_case_insensitive() {
        for name in &[
            "2024-03-05 at 14.30.00 in Leith.JPG",
            "2024-03-05 at 14.30.00 in Leith.Jpeg",
            "2024-03-05 at 14.30.00 in Leith.webp",
            "2024-03-05 at 14.30.00 in Leith.GIF",
            "2024-03-05 AT 14.30.00 IN Leith.png",
        ] {
            assert!(Sighting::from_file_name(name).is_some(), "{}", name);
        }
    }

    #[test]
    fn test_reject_non_matching() {
        for name in &[
            "2024-03-05 at 14.30.00 in Leith.bmp",
            "2024-03-05 at 14:30:00 in Leith.jpg",
            "2024-03-05_at_14.30.00_in_Leith.jpg",
            "2024-3-5 at 14.30.00 in Leith.jpg",
            "2024-03-05 at 14.30 in Leith.jpg",
            "2024-03-05 at 14.30.00 in .jpg",
            "2024-03-05 at 14.30.00 in Leith",
            "2024-03-05 at 14.30.00 in Leith.jpg.txt",
            "notes.txt",
            ".DS_Store",
        ] {
            assert_eq!(None, Sighting::from_file_name(name), "{}", name);
        }
    }

    #[test]
    fn test_reject_impossible_date_and_time() {
        assert_eq!(None, Sighting::from_file_name("2024-13-05 at 14.30.00 in Leith.jpg"));
        assert_eq!(None, Sighting::from_file_name("2023-02-29 at 14.30.00 in Leith.jpg"));
        assert_eq!(None, Sighting::from_file_name("2024-03-05 at 24.30.00 in Leith.jpg"));
        assert_eq!(None, Sighting::from_file_name("2024-03-05 at 14.61.00 in Leith.jpg"));
        assert!(Sighting::from_file_name("2024-02-29 at 14.30.00 in Leith.jpg").is_some());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut sightings = vec![
            sighting("2023-12-31 at 23.59.59 in Perth.jpg"),
            sighting("2024-03-05 at 09.00.00 in Dundee.jpg"),
            sighting("2024-03-05 at 14.30.00 in Glasgow.jpg"),
            sighting("2022-06-01 at 12.00.00 in Ayr.jpg"),
        ];
        sort(&mut sightings);
        let captured: Vec<String> = sightings
            .iter()
            .map(|s| format!("{} {}", s.date, s.time))
            .collect();
        assert_eq!(
            vec![
                "2024-03-05 14:30:00",
                "2024-03-05 09:00:00",
                "2023-12-31 23:59:59",
                "2022-06-01 12:00:00",
            ],
            captured
        );
    }

    #[test]
    fn test_sort_ties_by_file_name() {
        let mut sightings = vec![
            sighting("2024-03-05 at 14.30.00 in Stirling.jpg"),
            sighting("2024-03-05 at 14.30.00 in Oban.png"),
            sighting("2024-03-05 at 14.30.00 in Aberdeen.jpg"),
        ];
        sort(&mut sightings);
        let locations: Vec<&str> = sightings.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(vec!["Aberdeen", "Oban", "Stirling"], locations);
    }

    #[test]
    fn test_scan() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("2024-01-02 at 10.00.00 in Fife.jpg"))?;
        File::create(dir.path().join("2024-03-05 at 14.30.00 in Glasgow.jpeg"))?;
        File::create(dir.path().join("2024-03-05 at 14.30.00 in Glasgow.txt"))?;
        File::create(dir.path().join("README.md"))?;
        create_dir(dir.path().join("2024-04-01 at 10.00.00 in Folder.jpg"))?;

        let sightings = scan(dir.path())?;
        let names: Vec<&str> = sightings.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(
            vec![
                "2024-03-05 at 14.30.00 in Glasgow.jpeg",
                "2024-01-02 at 10.00.00 in Fife.jpg",
            ],
            names
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_symlinks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir()?;
        let elsewhere = tempfile::tempdir()?;
        let target = elsewhere.path().join("2024-05-01 at 12.00.00 in Troon.jpg");
        File::create(&target)?;
        File::create(dir.path().join("2024-01-02 at 10.00.00 in Fife.jpg"))?;
        symlink(&target, dir.path().join("2024-05-01 at 12.00.00 in Troon.jpg"))?;
        symlink(
            dir.path().join("missing.jpg"),
            dir.path().join("2024-06-01 at 12.00.00 in Nowhere.jpg"),
        )?;

        let sightings = scan(dir.path())?;
        let names: Vec<&str> = sightings.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(vec!["2024-01-02 at 10.00.00 in Fife.jpg"], names);
        Ok(())
    }

    #[test]
    fn test_scan_empty_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        assert!(scan(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_scan_missing_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        match scan(&missing) {
            Err(Error::Walk { path, err: _ }) => assert_eq!(missing, path),
            Ok(_) => panic!("expected an error for a missing directory"),
        }
        Ok(())
    }
}
