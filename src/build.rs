//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: scanning the image directory
//! ([`crate::sighting`]), rendering the pages ([`crate::write`]), and
//! generating the Atom feed ([`crate::feed`]).

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig, FEED_FILE};
use crate::page::Site;
use crate::sighting::{scan, Error as ScanError};
use crate::theme::{Error as ThemeError, Theme};
use crate::write::{remove_stale, write_atomic, Error as WriteError, Writer};
use gtmpl::Template;
use log::info;
use std::fmt;
use std::path::PathBuf;

/// Builds the site from a [`Config`] object. This calls into [`scan`],
/// [`Writer::write_pages`], and [`write_feed`] which do the heavy-lifting.
/// Returns the paths of the files written.
pub fn build_site(config: &Config) -> Result<Vec<PathBuf>> {
    // collect all sightings
    let sightings = scan(&config.images_source_directory)?;
    info!(
        "Found {} image(s) in {}",
        sightings.len(),
        config.images_source_directory.display()
    );

    // load and parse the theme
    let theme = Theme::load(config.theme_directory.as_deref())?;
    let latest_template = parse_template(&theme.latest_template)?;
    let previous_template = parse_template(&theme.previous_template)?;

    let site = Site {
        title: &config.title,
        images_url: &config.images_url,
        split_previous: config.split_previous,
        feed_url: config.site_url.as_ref().map(|_| FEED_FILE),
    };

    // write the pages
    let writer = Writer {
        latest_template: &latest_template,
        previous_template: &previous_template,
        theme: &theme,
        output_directory: &config.output_directory,
    };
    let mut written = writer.write_pages(&sightings, &site)?;

    // create the atom feed, or drop one left over from an earlier build
    let feed_path = config.output_directory.join(FEED_FILE);
    if let Some(site_url) = &config.site_url {
        let mut buf: Vec<u8> = Vec::new();
        write_feed(
            &FeedConfig {
                title: &config.title,
                site_url,
                author: config.author.as_ref(),
            },
            &sightings,
            &site,
            &mut buf,
        )?;
        write_atomic(&feed_path, &buf).map_err(|err| Error::WriteFeed {
            path: feed_path.clone(),
            err,
        })?;
        written.push(feed_path);
    } else {
        remove_stale(&feed_path).map_err(|err| Error::WriteFeed {
            path: feed_path,
            err,
        })?;
    }

    for path in &written {
        info!("Generated {}", path.display());
    }
    Ok(written)
}

/// Parses a template from its source text.
pub fn parse_template(source: &str) -> Result<Template> {
    let mut template = Template::default();
    template
        .parse(source)
        .map_err(|e| Error::ParseTemplate(e.to_string()))?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during scanning,
/// loading or parsing the theme, writing pages, and writing the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors reading the image directory.
    Scan(ScanError),

    /// Returned for errors loading theme files.
    Theme(ThemeError),

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors rendering or writing pages to disk.
    Write(WriteError),

    /// Returned for errors building the feed.
    Feed(FeedError),

    /// Returned for I/O problems while writing the feed file.
    WriteFeed { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => err.fmt(f),
            Error::Theme(err) => err.fmt(f),
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::WriteFeed { path, err } => {
                write!(f, "Writing feed '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Scan(err) => Some(err),
            Error::Theme(err) => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::WriteFeed { path: _, err } => Some(err),
        }
    }
}

impl From<ScanError> for Error {
    /// Converts [`ScanError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<ThemeError> for Error {
    /// Converts [`ThemeError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ThemeError) -> Error {
        Error::Theme(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
