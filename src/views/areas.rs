use crate::charts::{self, ChartSlot};
use crate::fetcher::{ApiClient, Resource};
use crate::models::{Area, AreasOccupation};
use crate::scheduler::Refresh;
use crate::thresholds::{AREA_OCCUPANCY, Level};
use crate::views::{Rendered, Section, StatusText};
use serde::Serialize;
use std::cmp::Ordering;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreasView {
    pub areas: Section<AreasBoard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreasBoard {
    pub summary: AreasSummary,
    pub rows: Vec<AreaRow>,
    pub notices: CapacityNotices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreasSummary {
    pub total_areas: usize,
    pub critical_areas: usize,
    pub warning_areas: usize,
    pub total_people: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRow {
    pub id: String,
    pub name: String,
    pub current_people: u64,
    pub capacity: u64,
    pub percentage: f64,
    pub bar_width: f64,
    pub status: StatusText,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapacityNotices {
    AllNormal { message: String },
    Items { items: Vec<CapacityNotice> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityNotice {
    pub level: Level,
    pub area: String,
    pub message: String,
}

fn percentage(area: &Area) -> f64 {
    area.occupation_percentage.unwrap_or(0.0)
}

fn area_name(area: &Area) -> String {
    area.name.clone().unwrap_or_else(|| "Sem nome".to_string())
}

pub fn summary(snapshot: &AreasOccupation, areas: &[Area]) -> AreasSummary {
    let count_level = |level: Level| {
        areas
            .iter()
            .filter(|area| AREA_OCCUPANCY.level(percentage(area)) == level)
            .count()
    };
    AreasSummary {
        total_areas: areas.len(),
        critical_areas: count_level(Level::Critical),
        warning_areas: count_level(Level::Warning),
        // The backend does not always send the total; fall back to the rows.
        total_people: snapshot
            .total_people
            .unwrap_or_else(|| areas.iter().filter_map(|a| a.current_people).sum()),
    }
}

/// Table rows, fullest area first.
pub fn rows(areas: &[Area]) -> Vec<AreaRow> {
    let mut sorted: Vec<&Area> = areas.iter().collect();
    sorted.sort_by(|a, b| {
        percentage(b)
            .partial_cmp(&percentage(a))
            .unwrap_or(Ordering::Equal)
    });
    sorted
        .into_iter()
        .map(|area| {
            let pct = percentage(area);
            AreaRow {
                id: area.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                name: area_name(area),
                current_people: area.current_people.unwrap_or(0),
                capacity: area.capacity.unwrap_or(0),
                percentage: pct,
                bar_width: pct.min(100.0),
                status: AREA_OCCUPANCY.classify(pct).into(),
            }
        })
        .collect()
}

/// Critical areas first, then the ones needing attention, each in the
/// order the backend listed them.
pub fn notices(areas: &[Area]) -> CapacityNotices {
    let describe = |level: Level, headline: &'static str| {
        areas
            .iter()
            .filter(move |area| AREA_OCCUPANCY.level(percentage(area)) == level)
            .map(move |area| CapacityNotice {
                level,
                area: area_name(area),
                message: format!(
                    "{headline} ({}/{} - {:.0}%)",
                    area.current_people.unwrap_or(0),
                    area.capacity.unwrap_or(0),
                    percentage(area)
                ),
            })
    };
    let items: Vec<CapacityNotice> = describe(Level::Critical, "Capacidade crítica")
        .chain(describe(Level::Warning, "Atenção na ocupação"))
        .collect();
    if items.is_empty() {
        CapacityNotices::AllNormal {
            message: "Todas as áreas estão com ocupação normal".to_string(),
        }
    } else {
        CapacityNotices::Items { items }
    }
}

pub fn render(snapshot: Option<AreasOccupation>) -> Rendered<AreasView> {
    let chart = ChartSlot::new(
        "occupationByAreaChart",
        charts::occupation_by_area(snapshot.as_ref()),
    );
    // A payload without an `areas` list carries nothing to show.
    let board = snapshot.and_then(|snapshot| {
        let areas = snapshot.areas.as_deref()?;
        Some(AreasBoard {
            summary: summary(&snapshot, areas),
            rows: rows(areas),
            notices: notices(areas),
        })
    });
    Rendered {
        view: AreasView {
            areas: Section::from_snapshot(board, |board| board),
        },
        charts: vec![chart],
    }
}

pub struct AreasPage {
    api: ApiClient,
    rendered: RwLock<Rendered<AreasView>>,
}

impl AreasPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rendered: RwLock::new(Rendered {
                view: AreasView {
                    areas: Section::Loading,
                },
                charts: Vec::new(),
            }),
        }
    }

    pub async fn current(&self) -> Rendered<AreasView> {
        self.rendered.read().await.clone()
    }
}

impl Refresh for AreasPage {
    fn name(&self) -> &'static str {
        "areas"
    }

    async fn refresh(&self) {
        let snapshot = self
            .api
            .fetch::<AreasOccupation>(Resource::AreasOccupation)
            .await;
        let rendered = render(snapshot);
        *self.rendered.write().await = rendered;
    }
}
