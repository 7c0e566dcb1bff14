//! Builds the URLs that end up in rendered pages and feeds: relative image
//! references, page anchors, and absolute entry URLs.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use url::{ParseError, Url};

/// Bytes left as-is in an encoded file name: ASCII letters and digits plus
/// `-`, `_`, `.` and `~`. Everything else, including spaces and the
/// characters that are meaningful in URLs and HTML attributes, is escaped.
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a single file name or path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, FILE_NAME).to_string()
}

/// Returns the reference to an image as used in an `<img src>` attribute:
/// `{images_url}/{encoded file name}`. An empty `images_url` yields the bare
/// encoded file name.
pub fn image_reference(images_url: &str, file_name: &str) -> String {
    let images_url = images_url.trim_end_matches('/');
    match images_url.is_empty() {
        true => encode_segment(file_name),
        false => format!("{}/{}", images_url, encode_segment(file_name)),
    }
}

/// Converts a relative directory path into a relative URL prefix by
/// percent-encoding each of its components. Returns [`None`] if the path is
/// absolute or has non-UTF-8 components.
pub fn relative_url(path: &Path) -> Option<String> {
    use std::path::Component;
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => segments.push("..".to_owned()),
            Component::Normal(name) => segments.push(encode_segment(name.to_str()?)),
            _ => return None,
        }
    }
    Some(segments.join("/"))
}

/// Returns the absolute URL of a page's element: `{base}{page}#{anchor}`.
/// `base` should end in a trailing slash.
pub fn anchor_url(base: &Url, page: &str, anchor: &str) -> Result<Url, ParseError> {
    let mut url = base.join(page)?;
    url.set_fragment(Some(anchor));
    Ok(url)
}
