//! Converts [`Sighting`]s into template [`Value`]s along with the display
//! fields the templates need (human-readable date and time, anchor, image
//! reference).

use crate::sighting::Sighting;
use crate::url::image_reference;
use chrono::{NaiveDate, NaiveTime};
use gtmpl_value::Value;
use std::collections::HashMap;

/// Formats a date as `<day> <Month> <year>`, e.g. `5 March 2024`. The month
/// names are always English regardless of the host locale.
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Formats a time as `HH:MM`, dropping the seconds.
pub fn display_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// The element id for a sighting, e.g. `2024-03-05-143000-glasgow`.
pub fn anchor(sighting: &Sighting) -> String {
    slug::slugify(format!(
        "{}-{}-{}",
        sighting.date.format("%Y-%m-%d"),
        sighting.time.format("%H%M%S"),
        sighting.location,
    ))
}

/// Escapes `&`, `<`, `>` and `"` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // writing into a `String` can't fail
    let _ = pulldown_cmark::escape::escape_html(&mut escaped, text);
    escaped
}

/// A [`Sighting`] paired with the URL prefix of the image directory. This is
/// what gets handed to the templates for both the latest block and the
/// gallery items.
pub struct SightingCard<'a> {
    pub sighting: &'a Sighting,
    pub images_url: &'a str,
}

impl From<SightingCard<'_>> for Value {
    /// Converts a [`SightingCard`] into a [`Value::Object`] with the fields
    /// `date`, `time`, `location`, `anchor`, and `image`. `location` is
    /// HTML-escaped.
    fn from(card: SightingCard<'_>) -> Value {
        let s = card.sighting;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("date".to_owned(), Value::String(display_date(&s.date)));
        m.insert("time".to_owned(), Value::String(display_time(&s.time)));
        m.insert("location".to_owned(), Value::String(escape_html(&s.location)));
        m.insert("anchor".to_owned(), Value::String(anchor(s)));
        m.insert(
            "image".to_owned(),
            Value::String(image_reference(card.images_url, &s.file_name)),
        );
        Value::Object(m)
    }
}
