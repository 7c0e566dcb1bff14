//! Defines the [`Page`] type and the logic for laying sightings out across
//! output pages. The newest sighting always gets the latest block on
//! `index.html`; the rest go into the gallery, which is either appended to
//! `index.html` or, in the split layout, written to `previous.html`.

use crate::sighting::Sighting;
use crate::value::{escape_html, SightingCard};
use gtmpl_value::Value;
use std::collections::HashMap;

/// The file name of the page holding the latest sighting.
pub const LATEST_PAGE: &str = "index.html";

/// The file name of the gallery page in the split layout.
pub const PREVIOUS_PAGE: &str = "previous.html";

/// Site-wide settings that affect how pages are laid out.
pub struct Site<'a> {
    /// The site title, unescaped.
    pub title: &'a str,

    /// The URL prefix for image references, relative to the output pages.
    pub images_url: &'a str,

    /// Whether the gallery gets its own page.
    pub split_previous: bool,

    /// The feed's URL relative to the output pages, if a feed is written.
    pub feed_url: Option<&'a str>,
}

impl Site<'_> {
    /// Returns the file name of the page on which the `i`th sighting (newest
    /// first) is rendered.
    pub fn page_of(&self, i: usize) -> &'static str {
        match i > 0 && self.split_previous {
            true => PREVIOUS_PAGE,
            false => LATEST_PAGE,
        }
    }
}

/// Selects the template a [`Page`] is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Latest,
    Previous,
}

/// An object representing an output HTML file before templating.
pub struct Page {
    /// The template with which the page will be rendered.
    pub kind: Kind,

    /// The output file name, relative to the output directory.
    pub file_name: &'static str,

    /// The template fields for the page.
    pub item: HashMap<String, Value>,
}

/// Lays out `sightings` (which must already be sorted newest first) into
/// pages: always [`LATEST_PAGE`], plus [`PREVIOUS_PAGE`] in the split layout.
pub fn pages(sightings: &[Sighting], site: &Site) -> Vec<Page> {
    let cards = |sightings: &[Sighting]| -> Value {
        Value::Array(
            sightings
                .iter()
                .map(|sighting| {
                    Value::from(SightingCard {
                        sighting,
                        images_url: site.images_url,
                    })
                })
                .collect(),
        )
    };

    let (latest, previous) = match sightings.split_first() {
        Some((latest, previous)) => (Some(latest), previous),
        None => (None, &[][..]),
    };

    let mut latest_page = common_fields(sightings.len(), site);
    latest_page.insert("has_latest".to_owned(), Value::Bool(latest.is_some()));
    latest_page.insert(
        "latest".to_owned(),
        match latest {
            Some(sighting) => Value::from(SightingCard {
                sighting,
                images_url: site.images_url,
            }),
            None => Value::Nil,
        },
    );

    if !site.split_previous {
        latest_page.insert("has_previous".to_owned(), Value::Bool(!previous.is_empty()));
        latest_page.insert("previous".to_owned(), cards(previous));
        latest_page.insert("previous_page".to_owned(), Value::String(String::new()));
        return vec![Page {
            kind: Kind::Latest,
            file_name: LATEST_PAGE,
            item: latest_page,
        }];
    }

    latest_page.insert("has_previous".to_owned(), Value::Bool(false));
    latest_page.insert("previous".to_owned(), Value::Array(Vec::new()));
    latest_page.insert(
        "previous_page".to_owned(),
        Value::String(match previous.is_empty() {
            true => String::new(),
            false => PREVIOUS_PAGE.to_owned(),
        }),
    );

    let mut previous_page = common_fields(sightings.len(), site);
    previous_page.insert("has_previous".to_owned(), Value::Bool(!previous.is_empty()));
    previous_page.insert("previous".to_owned(), cards(previous));

    vec![
        Page {
            kind: Kind::Latest,
            file_name: LATEST_PAGE,
            item: latest_page,
        },
        Page {
            kind: Kind::Previous,
            file_name: PREVIOUS_PAGE,
            item: previous_page,
        },
    ]
}

/// The fields shared by every page: `title`, `total`, `plural`, `feed_url`,
/// and `latest_page`.
fn common_fields(total: usize, site: &Site) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), Value::String(escape_html(site.title)));
    m.insert("total".to_owned(), Value::String(total.to_string()));
    m.insert("plural".to_owned(), Value::Bool(total != 1));
    m.insert(
        "feed_url".to_owned(),
        Value::String(site.feed_url.unwrap_or_default().to_owned()),
    );
    m.insert("latest_page".to_owned(), Value::String(LATEST_PAGE.to_owned()));
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sightings(names: &[&str]) -> Vec<Sighting> {
        let mut v: Vec<Sighting> = names
            .iter()
            .map(|name| Sighting::from_file_name(name).unwrap())
            .collect();
        crate::sighting::sort(&mut v);
        v
    }

    fn site(split_previous: bool) -> Site<'static> {
        Site {
            title: "Parked Badly",
            images_url: "sightings",
            split_previous,
            feed_url: None,
        }
    }

    fn bool_field(page: &Page, key: &str) -> bool {
        match page.item.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => panic!("missing bool field `{}`", key),
        }
    }

    fn array_len(page: &Page, key: &str) -> usize {
        match page.item.get(key) {
            Some(Value::Array(v)) => v.len(),
            _ => panic!("missing array field `{}`", key),
        }
    }

    fn string_field<'a>(page: &'a Page, key: &str) -> &'a str {
        match page.item.get(key) {
            Some(Value::String(s)) => s,
            _ => panic!("missing string field `{}`", key),
        }
    }

    const THREE: [&str; 3] = [
        "2024-01-01 at 09.00.00 in Ayr.jpg",
        "2024-03-05 at 14.30.00 in Glasgow.jpg",
        "2024-02-10 at 18.45.00 in Leith.png",
    ];

    #[test]
    fn test_single_layout_empty() {
        let pages = pages(&[], &site(false));
        assert_eq!(1, pages.len());
        assert_eq!(LATEST_PAGE, pages[0].file_name);
        assert!(!bool_field(&pages[0], "has_latest"));
        assert!(!bool_field(&pages[0], "has_previous"));
        assert_eq!("0", string_field(&pages[0], "total"));
        assert!(bool_field(&pages[0], "plural"));
    }

    #[test]
    fn test_single_layout_one() {
        let pages = pages(&sightings(&THREE[..1]), &site(false));
        assert_eq!(1, pages.len());
        assert!(bool_field(&pages[0], "has_latest"));
        assert!(!bool_field(&pages[0], "has_previous"));
        assert!(!bool_field(&pages[0], "plural"));
    }

    #[test]
    fn test_single_layout_many() {
        let pages = pages(&sightings(&THREE), &site(false));
        assert_eq!(1, pages.len());
        assert_eq!(Kind::Latest, pages[0].kind);
        assert!(bool_field(&pages[0], "has_previous"));
        assert_eq!(2, array_len(&pages[0], "previous"));
        assert_eq!("", string_field(&pages[0], "previous_page"));
        assert_eq!("3", string_field(&pages[0], "total"));
    }

    #[test]
    fn test_split_layout_empty() {
        let pages = pages(&[], &site(true));
        assert_eq!(2, pages.len());
        assert_eq!(PREVIOUS_PAGE, pages[1].file_name);
        assert_eq!(Kind::Previous, pages[1].kind);
        assert!(!bool_field(&pages[1], "has_previous"));
        assert_eq!("", string_field(&pages[0], "previous_page"));
    }

    #[test]
    fn test_split_layout_many() {
        let pages = pages(&sightings(&THREE), &site(true));
        assert!(bool_field(&pages[0], "has_latest"));
        assert!(!bool_field(&pages[0], "has_previous"));
        assert_eq!(PREVIOUS_PAGE, string_field(&pages[0], "previous_page"));
        assert!(bool_field(&pages[1], "has_previous"));
        assert_eq!(2, array_len(&pages[1], "previous"));
    }

    #[test]
    fn test_page_of() {
        assert_eq!(LATEST_PAGE, site(false).page_of(0));
        assert_eq!(LATEST_PAGE, site(false).page_of(3));
        assert_eq!(LATEST_PAGE, site(true).page_of(0));
        assert_eq!(PREVIOUS_PAGE, site(true).page_of(1));
    }
}
