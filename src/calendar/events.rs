use super::grid::YearMonth;
use crate::locale::parse_iso_date;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Date;

/// At most this many event markers are drawn on a single day
pub const MAX_VISIBLE_EVENTS: usize = 3;

/// At most this many events are listed in a month's legend
pub const MAX_LEGEND_EVENTS: usize = 5;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EventVariant {
    #[default]
    Default,
    Primary,
    Secondary,
    Destructive,
}

impl EventVariant {
    /// Parse a variant name case-insensitively, returning `None` for unknown
    /// names
    pub fn from_name(name: &str) -> Option<EventVariant> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(EventVariant::Default),
            "primary" => Some(EventVariant::Primary),
            "secondary" => Some(EventVariant::Secondary),
            "destructive" => Some(EventVariant::Destructive),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EventMarker {
    pub date: Date,
    pub title: String,
    pub variant: EventVariant,
}

impl EventMarker {
    pub fn new<S: Into<String>>(date: Date, title: S) -> EventMarker {
        EventMarker {
            date,
            title: title.into(),
            variant: EventVariant::Default,
        }
    }

    pub fn variant(mut self, variant: EventVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// All of `events` that fall on `date`, in their given order.  Nothing is
/// dropped here; the display cap is applied by [`CalendarDay`](super::CalendarDay).
pub fn attach_events(date: Date, events: &[EventMarker]) -> Vec<EventMarker> {
    events.iter().filter(|ev| ev.date == date).cloned().collect()
}

/// The first [`MAX_LEGEND_EVENTS`] events falling within `anchor`
pub fn month_legend(events: &[EventMarker], anchor: YearMonth) -> Vec<EventMarker> {
    events
        .iter()
        .filter(|ev| anchor.contains(ev.date))
        .take(MAX_LEGEND_EVENTS)
        .cloned()
        .collect()
}

/// An event as written in an event file, before its date is parsed
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct RawEvent {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub variant: Option<String>,
}

/// Convert raw events to markers, skipping any whose date does not parse.
/// Unknown variants fall back to [`EventVariant::Default`].
pub fn parse_events<I: IntoIterator<Item = RawEvent>>(raw: I) -> Vec<EventMarker> {
    raw.into_iter()
        .filter_map(|ev| {
            let date = match parse_iso_date(&ev.date) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!(date = %ev.date, title = %ev.title, error = %e, "skipping event with malformed date");
                    return None;
                }
            };
            let variant = match ev.variant.as_deref() {
                None => EventVariant::Default,
                Some(name) => EventVariant::from_name(name).unwrap_or_else(|| {
                    tracing::warn!(variant = name, title = %ev.title, "unknown event variant; using default");
                    EventVariant::Default
                }),
            };
            Some(EventMarker {
                date,
                title: ev.title,
                variant,
            })
        })
        .collect()
}

/// Load events from a JSON file containing an array of
/// `{"date": "YYYY-MM-DD", "title": ..., "variant": ...}` objects
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<EventMarker>, EventFileError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| EventFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    let raw = serde_json::from_str::<Vec<RawEvent>>(&src).map_err(|source| {
        EventFileError::Parse {
            path: path.to_owned(),
            source,
        }
    })?;
    let events = parse_events(raw);
    tracing::debug!(path = %path.display(), count = events.len(), "loaded events");
    Ok(events)
}

#[derive(Debug, Error)]
pub enum EventFileError {
    #[error("failed to read event file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse event file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use time::macros::date;

    fn five_on_one_day() -> Vec<EventMarker> {
        (1..=5)
            .map(|i| EventMarker::new(date!(2025 - 11 - 06), format!("Event {i}")))
            .collect()
    }

    #[test]
    fn test_attach_keeps_everything_in_order() {
        let mut events = five_on_one_day();
        events.insert(2, EventMarker::new(date!(2025 - 11 - 07), "Elsewhere"));
        let attached = attach_events(date!(2025 - 11 - 06), &events);
        assert_eq!(attached.len(), 5);
        let titles = attached.iter().map(|ev| ev.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["Event 1", "Event 2", "Event 3", "Event 4", "Event 5"]);
        assert!(attach_events(date!(2025 - 11 - 08), &events).is_empty());
    }

    #[test]
    fn test_month_legend() {
        let mut events = vec![EventMarker::new(date!(2025 - 10 - 31), "October")];
        events.extend(five_on_one_day());
        events.push(EventMarker::new(date!(2025 - 11 - 30), "Sixth"));
        let legend = month_legend(&events, YearMonth::new(2025, 11));
        assert_eq!(legend.len(), MAX_LEGEND_EVENTS);
        assert_eq!(legend[0].title, "Event 1");
        assert!(legend.iter().all(|ev| ev.title != "October"));
    }

    #[test]
    fn test_parse_events_skips_malformed_dates() {
        let raw = vec![
            RawEvent {
                date: "2025-11-06".into(),
                title: "Meeting".into(),
                variant: Some("Destructive".into()),
            },
            RawEvent {
                date: "2025-13-01".into(),
                title: "Bad month".into(),
                variant: None,
            },
            RawEvent {
                date: "soon".into(),
                title: "Unparsable".into(),
                variant: None,
            },
            RawEvent {
                date: "2025-11-07".into(),
                title: "Odd variant".into(),
                variant: Some("sparkly".into()),
            },
        ];
        let events = parse_events(raw);
        assert_eq!(
            events,
            [
                EventMarker::new(date!(2025 - 11 - 06), "Meeting")
                    .variant(EventVariant::Destructive),
                EventMarker::new(date!(2025 - 11 - 07), "Odd variant"),
            ]
        );
    }

    #[test]
    fn test_load_events() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[
                {{"date": "2025-11-06", "title": "Launch", "variant": "primary"}},
                {{"date": "2025-02-30", "title": "Never"}},
                {{"date": "2025-11-20", "title": "Review"}}
            ]"#
        )
        .unwrap();
        let events = load_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].variant, EventVariant::Primary);
        assert_eq!(events[1].title, "Review");
    }

    #[test]
    fn test_load_events_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_events(&missing),
            Err(EventFileError::Read { .. })
        ));
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        let err = load_events(&bad).unwrap_err();
        assert!(matches!(err, EventFileError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
