//! The library code for the `kerbside` static site generator. It turns a
//! directory of photos named like `2024-03-05 at 14.30.00 in Glasgow.jpg`
//! into a gallery page. The architecture breaks down into two steps:
//!
//! 1. Scanning sightings from the image directory ([`crate::sighting`])
//! 2. Converting the sightings into output files on disk ([`crate::write`])
//!
//! The first step parses each file name into a date, time, and location,
//! skips anything that doesn't fit the pattern, and sorts the rest newest
//! first.
//!
//! The second step lays the sightings out into pages ([`crate::page`]): the
//! newest sighting becomes the "latest" block and the rest form the gallery,
//! either on the same page or on a separate `previous.html`. Each page is
//! then templated with the theme ([`crate::theme`]) and written to disk in a
//! single atomic write. When a public site URL is configured, an Atom feed
//! ([`crate::feed`]) is written alongside.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod page;
pub mod sighting;
pub mod theme;
pub mod url;
pub mod value;
pub mod write;
