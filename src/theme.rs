//! Defines the [`Theme`] type: the page templates plus the stylesheet and
//! script that get inlined into every page. A default theme is compiled into
//! the binary; a project can replace it with a directory holding the same
//! four files.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const LATEST_TEMPLATE: &str = "latest.html";
const PREVIOUS_TEMPLATE: &str = "previous.html";
const STYLESHEET: &str = "style.css";
const SCRIPT: &str = "share.js";

/// The sources that make up a theme. Templates use gtmpl (Go
/// `text/template`) syntax and are parsed by [`crate::build`].
#[derive(Clone, Debug)]
pub struct Theme {
    /// The template for `index.html`, which holds the latest sighting and, in
    /// the single-page layout, the gallery.
    pub latest_template: String,

    /// The template for `previous.html` in the split layout.
    pub previous_template: String,

    /// CSS inlined into each page's `<style>` element.
    pub stylesheet: String,

    /// JavaScript inlined into each page's `<script>` element.
    pub script: String,
}

impl Default for Theme {
    /// The built-in theme.
    fn default() -> Self {
        Theme {
            latest_template: include_str!("../theme/latest.html").to_owned(),
            previous_template: include_str!("../theme/previous.html").to_owned(),
            stylesheet: include_str!("../theme/style.css").to_owned(),
            script: include_str!("../theme/share.js").to_owned(),
        }
    }
}

impl Theme {
    /// Loads a theme from `dir`, which must contain `latest.html`,
    /// `previous.html`, `style.css`, and `share.js`.
    pub fn from_directory(dir: &Path) -> Result<Theme> {
        Ok(Theme {
            latest_template: read(&dir.join(LATEST_TEMPLATE))?,
            previous_template: read(&dir.join(PREVIOUS_TEMPLATE))?,
            stylesheet: read(&dir.join(STYLESHEET))?,
            script: read(&dir.join(SCRIPT))?,
        })
    }

    /// Loads the theme from `dir` if one is given, otherwise returns the
    /// built-in theme.
    pub fn load(dir: Option<&Path>) -> Result<Theme> {
        match dir {
            Some(dir) => Theme::from_directory(dir),
            None => Ok(Theme::default()),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
    Ok(contents)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a theme from disk.
#[derive(Debug)]
pub enum Error {
    /// Returned when a theme file can't be opened or read.
    Open { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening theme file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
        }
    }
}
