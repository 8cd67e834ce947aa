//! The named parameter catalogue of [`RequestBuilder`].
//!
//! Each entry maps a method name to the wire key it appends and the rule
//! used to turn its argument into a string:
//!
//! | rule   | argument                       | rendering                    |
//! |--------|--------------------------------|------------------------------|
//! | `text` | `impl Into<String>`            | as given                     |
//! | `int`  | `i64`                          | decimal                      |
//! | `real` | `f64`                          | shortest round-trip decimal  |
//! | `flag` | `bool`                         | `true` / `false`             |
//! | `time` | `impl Into<TimeParam>`         | `yyyy-MM-ddTHH:mm:ssZ` (UTC) |
//! | `json` | `&serde_json::Value`           | compact JSON                 |

use std::fmt;

use chrono::{DateTime, Utc};

use super::RequestBuilder;

/// Wire format of timestamp parameters.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A timestamp parameter: either a UTC instant or text already in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParam {
    /// Rendered with [`TIMESTAMP_FORMAT`].
    At(DateTime<Utc>),
    /// Passed through untouched.
    Raw(String),
}

impl fmt::Display for TimeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParam::At(at) => write!(f, "{}", at.format(TIMESTAMP_FORMAT)),
            TimeParam::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<DateTime<Utc>> for TimeParam {
    fn from(at: DateTime<Utc>) -> Self {
        TimeParam::At(at)
    }
}

impl From<String> for TimeParam {
    fn from(raw: String) -> Self {
        TimeParam::Raw(raw)
    }
}

impl From<&str> for TimeParam {
    fn from(raw: &str) -> Self {
        TimeParam::Raw(raw.to_string())
    }
}

macro_rules! param_catalogue {
    ($( $(#[$doc:meta])* $name:ident => $key:literal : $rule:ident ),* $(,)?) => {
        /// Every catalogue method with the key it appends.
        pub const PARAM_CATALOGUE: &[(&str, &str)] = &[ $( (stringify!($name), $key) ),* ];

        impl<'a> RequestBuilder<'a> {
            $( param_catalogue!(@method $(#[$doc])* $name, $key, $rule); )*
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, text) => {
        $(#[$doc])*
        pub fn $name(self, value: impl Into<String>) -> Self {
            self.param($key, value.into())
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, int) => {
        $(#[$doc])*
        pub fn $name(self, value: i64) -> Self {
            self.param($key, value)
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, real) => {
        $(#[$doc])*
        pub fn $name(self, value: f64) -> Self {
            self.param($key, value)
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, flag) => {
        $(#[$doc])*
        pub fn $name(self, value: bool) -> Self {
            self.param($key, if value { "true" } else { "false" })
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, time) => {
        $(#[$doc])*
        pub fn $name(self, value: impl Into<TimeParam>) -> Self {
            self.param($key, value.into())
        }
    };
    (@method $(#[$doc:meta])* $name:ident, $key:literal, json) => {
        $(#[$doc])*
        pub fn $name(self, value: &serde_json::Value) -> Self {
            self.param($key, value)
        }
    };
}

param_catalogue! {
    /// Name of the author, e.g. `Franz Kafka`.
    author => "author": text,
    /// Author(s) of a new book, comma separated.
    book_author => "book[author]": text,
    /// Identifier (ISBN) of a new book.
    book_identifier => "book[identifier]": text,
    /// Title of a new book.
    book_title => "book[title]": text,
    /// Comment text.
    comment_content => "comment[content]": text,
    /// When the comment was made, for comments posted after the fact.
    comment_posted_at => "comment[posted_at]": time,
    /// Number of results to return. Default 20, max 100.
    count => "count": int,
    /// Filter a set response.
    filter => "filter": text,
    /// Start of a date range.
    from => "from": time,
    /// Highlighted text.
    highlight_content => "highlight[content]": text,
    /// When the user made the highlight.
    highlight_highlighted_at => "highlight[highlighted_at]": time,
    /// Locator object pinning the highlight inside the text.
    highlight_locators => "highlight[locators]": json,
    /// Position of the highlight in the book, between `0.0` and `1.0`.
    highlight_position => "highlight[position]": real,
    /// Connections to share the highlight to, as `[{"id": ...}]`.
    highlight_post_to => "highlight[post_to]": json,
    /// Only readings with at least this many highlights.
    highlights_count_from => "highlights_count[from]": int,
    /// Only readings with at most this many highlights.
    highlights_count_to => "highlights_count[to]": int,
    /// Book identifier (ISBN).
    identifier => "identifier": text,
    /// Sort order, always descending: `touched_at`, `created_at`, `popular`.
    order => "order": text,
    /// Length of the reading session in seconds.
    ping_duration => "ping[duration]": int,
    /// Groups pings into one reading period.
    ping_identifier => "ping[identifier]": text,
    /// Latitude while reading.
    ping_lat => "ping[lat]": real,
    /// Longitude while reading.
    ping_lng => "ping[lng]": real,
    /// When the session took place.
    ping_occurred_at => "ping[occurred_at]": time,
    /// Progress through the book, between `0.0` and `1.0`.
    ping_progress => "ping[progress]": real,
    /// Search terms.
    query => "query": text,
    /// When the reading was abandoned.
    reading_abandoned_at => "reading[abandoned_at]": time,
    /// Closing remark on a finished or abandoned reading.
    reading_closing_remark => "reading[closing_remark]": text,
    /// When the reading was finished.
    reading_finished_at => "reading[finished_at]": time,
    /// Connections to share the reading to, as `[{"id": ...}]`.
    reading_post_to => "reading[post_to]": json,
    /// Private or public reading.
    reading_private => "reading[private]": flag,
    /// Whether the reader recommends the book.
    reading_recommended => "reading[recommended]": flag,
    /// When the reading was started.
    reading_started_at => "reading[started_at]": time,
    /// `interesting`, `reading`, `finished` or `abandoned`.
    reading_state => "reading[state]": text,
    /// User id to credit for the recommendation.
    reading_via_id => "reading[via_id]": int,
    /// Image size: `small_square`, `medium`, `large`.
    size => "size": text,
    /// Comma separated reading states to include.
    states => "states": text,
    /// Book title.
    title => "title": text,
    /// End of a date range, exclusive.
    to => "to": time,
}
