use crate::page::{pages, Kind, Page, Site, PREVIOUS_PAGE};
use crate::sighting::Sighting;
use crate::theme::Theme;
use gtmpl::{Template, Value};
use log::info;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Responsible for templating and writing HTML pages to disk from
/// [`Sighting`]s.
pub struct Writer<'a> {
    /// The template for the latest page.
    pub latest_template: &'a Template,

    /// The template for the previous page in the split layout.
    pub previous_template: &'a Template,

    /// The theme whose stylesheet and script are inlined into every page.
    pub theme: &'a Theme,

    /// The directory in which the HTML files will be written.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Templates a single [`Page`] into memory.
    pub fn render_page(&self, page: &Page) -> Result<Vec<u8>> {
        let mut item = page.item.clone();
        item.insert(
            "stylesheet".to_owned(),
            Value::String(self.theme.stylesheet.clone()),
        );
        item.insert("script".to_owned(), Value::String(self.theme.script.clone()));

        let template = match page.kind {
            Kind::Latest => self.latest_template,
            Kind::Previous => self.previous_template,
        };
        let mut buf: Vec<u8> = Vec::new();
        template.execute(&mut buf, &gtmpl::Context::from(Value::Object(item))?)?;
        Ok(buf)
    }

    /// Lays out `sightings` into pages and templates each one into memory.
    /// Returns the destination path and contents for each page.
    pub fn render(&self, sightings: &[Sighting], site: &Site) -> Result<Vec<(PathBuf, Vec<u8>)>> {
        pages(sightings, site)
            .iter()
            .map(|page| {
                Ok((
                    self.output_directory.join(page.file_name),
                    self.render_page(page)?,
                ))
            })
            .collect()
    }

    /// Renders the pages for `sightings` and writes them to disk, replacing
    /// any previous output. A `previous.html` left over from an earlier split
    /// build is removed when the single layout is in use. Returns the paths
    /// written.
    pub fn write_pages(&self, sightings: &[Sighting], site: &Site) -> Result<Vec<PathBuf>> {
        let rendered = self.render(sightings, site)?;
        std::fs::create_dir_all(self.output_directory).map_err(|err| Error::Write {
            path: self.output_directory.to_owned(),
            err,
        })?;
        let written = rendered
            .into_iter()
            .map(|(path, contents)| {
                write_atomic(&path, &contents).map_err(|err| Error::Write {
                    path: path.clone(),
                    err,
                })?;
                Ok(path)
            })
            .collect::<Result<Vec<PathBuf>>>()?;

        if !site.split_previous {
            let stale = self.output_directory.join(PREVIOUS_PAGE);
            remove_stale(&stale).map_err(|err| Error::Write { path: stale, err })?;
        }
        Ok(written)
    }
}

/// Writes `contents` to a temporary file beside `path` and renames it over
/// `path`, so readers see either the old file or the new one in full.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing file name"))?;
    let temp_path = path.with_file_name(format!(
        ".{}.tmp.{}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = std::fs::File::create(&temp_path)?;
    let result = file.write_all(contents).and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = result.and_then(|_| std::fs::rename(&temp_path, path)) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// Removes an output file that the current configuration no longer
/// produces. A file that is already gone is not an error.
pub fn remove_stale(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing an output file or creating the output directory.
    Write { path: PathBuf, err: io::Error },
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "Rendering template: {}", err),
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Write { path: _, err } => Some(err),
        }
    }
}
