//! Page components. Each one owns its display fields, refreshes them from
//! the backend on its own timer and shares nothing with the other pages.

pub mod alerts;
pub mod areas;
pub mod freshness;
pub mod main_page;
pub mod pool;
pub mod sensors;

use crate::charts::ChartSlot;
use crate::thresholds::{Band, Level};
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::Serialize;

/// Content of one block of a page. A failed fetch always lands on `NoData`,
/// replacing whatever the previous cycle rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Loading,
    NoData,
    Ready(T),
}

impl<T> Section<T> {
    pub fn from_snapshot<S>(snapshot: Option<S>, render: impl FnOnce(S) -> T) -> Self {
        match snapshot {
            Some(snapshot) => Section::Ready(render(snapshot)),
            None => Section::NoData,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Section::NoData)
    }
}

/// What a page currently shows: its display fields plus its charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered<V> {
    pub view: V,
    pub charts: Vec<ChartSlot>,
}

/// A label with the tier that colors it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusText {
    pub text: String,
    pub level: Level,
}

impl StatusText {
    pub fn new(text: impl Into<String>, level: Level) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

impl From<&Band> for StatusText {
    fn from(band: &Band) -> Self {
        StatusText::new(band.label, band.level)
    }
}

/// A badge: text, bootstrap-style class and icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub text: String,
    pub class: &'static str,
    pub icon: &'static str,
}

impl Badge {
    pub fn new(text: impl Into<String>, class: &'static str, icon: &'static str) -> Self {
        Self {
            text: text.into(),
            class,
            icon,
        }
    }
}

/// Wall clock and display offset, injected so views render deterministically.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl Clock {
    pub fn system() -> Self {
        let local = Local::now();
        Self {
            now: local.with_timezone(&Utc),
            offset: local.offset().fix(),
        }
    }

    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::at(now, Utc.fix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Main,
    Areas,
    Alerts,
    Pool,
    Sensors,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Main, Page::Areas, Page::Alerts, Page::Pool, Page::Sensors];

    /// Picks the page for a URL path; anything unrecognised is the main page.
    pub fn from_path(path: &str) -> Page {
        if path.contains("/areas") {
            Page::Areas
        } else if path.contains("/alertas") {
            Page::Alerts
        } else if path.contains("/piscina") {
            Page::Pool
        } else if path.contains("/resumo-sensores") {
            Page::Sensors
        } else {
            Page::Main
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::Main => "index",
            Page::Areas => "areas",
            Page::Alerts => "alertas",
            Page::Pool => "piscina",
            Page::Sensors => "resumo-sensores",
        }
    }

    pub fn href(self) -> String {
        match self {
            Page::Main => "/dashboard".to_string(),
            other => format!("/dashboard/{}", other.slug()),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Main => "Painel Principal",
            Page::Areas => "Áreas",
            Page::Alerts => "Alertas",
            Page::Pool => "Monitoramento da Piscina",
            Page::Sensors => "Resumo de Sensores",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_detection_by_path() {
        assert_eq!(Page::from_path("/dashboard"), Page::Main);
        assert_eq!(Page::from_path("/dashboard/index"), Page::Main);
        assert_eq!(Page::from_path("/dashboard/areas.html"), Page::Areas);
        assert_eq!(Page::from_path("/dashboard/alertas"), Page::Alerts);
        assert_eq!(Page::from_path("/dashboard/piscina"), Page::Pool);
        assert_eq!(Page::from_path("/dashboard/resumo-sensores"), Page::Sensors);
        assert_eq!(Page::from_path("/dashboard/unknown"), Page::Main);
    }

    #[test]
    fn slugs_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
        }
        assert_eq!(Page::from_slug("nope"), None);
    }

    #[test]
    fn section_from_failed_snapshot_is_no_data() {
        let section: Section<u32> = Section::from_snapshot(None::<u32>, |v| v);
        assert!(section.is_no_data());
        let section = Section::from_snapshot(Some(4), |v| v * 2);
        assert_eq!(section.ready(), Some(&8));
    }
}
