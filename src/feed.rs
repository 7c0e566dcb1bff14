//! Support for creating Atom feeds from a list of sightings.

use crate::config::Author;
use crate::page::{Site, LATEST_PAGE};
use crate::sighting::Sighting;
use crate::url::anchor_url;
use crate::value::{anchor, display_date, display_time};
use atom_syndication::{
    Entry, EntryBuilder, Error as AtomError, Feed, FeedBuilder, Link, LinkBuilder, Person,
    PersonBuilder, Text,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use std::time::UNIX_EPOCH;
use url::{ParseError, Url};

/// The file name of the feed, relative to the output directory.
pub const FEED_FILE: &str = "feed.atom";

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    /// The feed title, usually the site title.
    pub title: &'a str,

    /// The absolute URL of the output directory. This should end in a
    /// trailing slash.
    pub site_url: &'a Url,

    /// The feed author, if any.
    pub author: Option<&'a Author>,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Sighting`]s (newest first) and writes the result to a
/// [`std::io::Write`]. `site` decides which page each entry links to.
pub fn write_feed<W: Write>(
    config: &FeedConfig,
    sightings: &[Sighting],
    site: &Site,
    w: W,
) -> Result<()> {
    feed(config, sightings, site)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, sightings: &[Sighting], site: &Site) -> Result<Feed> {
    let home_page = config.site_url.join(LATEST_PAGE)?;

    // The feed is only as new as its newest entry; using the clock here would
    // make otherwise identical runs produce different output.
    let updated = match sightings.first() {
        Some(sighting) => captured_at(sighting),
        None => DateTime::<Utc>::from(UNIX_EPOCH).with_timezone(&Utc.fix()),
    };

    Ok(FeedBuilder::default()
        .title(config.title)
        .id(home_page.as_str())
        .updated(updated)
        .authors(author_to_people(config.author))
        .links(vec![alternate(home_page.as_str())])
        .entries(feed_entries(config, sightings, site)?)
        .build())
}

fn feed_entries(config: &FeedConfig, sightings: &[Sighting], site: &Site) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(sightings.len());

    for (i, sighting) in sightings.iter().enumerate() {
        let url = anchor_url(config.site_url, site.page_of(i), &anchor(sighting))?;
        let date = captured_at(sighting);
        entries.push(
            EntryBuilder::default()
                .id(url.as_str())
                .title(format!("Spotted in {}", sighting.location))
                .updated(date)
                .published(Some(date))
                .authors(author_to_people(config.author))
                .links(vec![alternate(url.as_str())])
                .summary(Some(Text::from(format!(
                    "{} at {} in {}",
                    display_date(&sighting.date),
                    display_time(&sighting.time),
                    sighting.location,
                ))))
                .build(),
        );
    }
    Ok(entries)
}

/// The capture time of a sighting. File names carry no time zone, so the
/// local time is reported with a zero UTC offset.
fn captured_at(sighting: &Sighting) -> DateTime<FixedOffset> {
    Utc.fix()
        .from_utc_datetime(&NaiveDateTime::new(sighting.date, sighting.time))
}

fn alternate(href: &str) -> Link {
    LinkBuilder::default().href(href).rel("alternate").build()
}

fn author_to_people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![PersonBuilder::default()
            .name(author.name.as_str())
            .email(author.email.clone())
            .build()],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and URL
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an entry URL can't be built from the site URL.
    Url(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url(err) => write!(f, "Building feed URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::Url(err)
    }
}
