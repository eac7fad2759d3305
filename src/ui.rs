//! Server-side HTML. Every page shares one layout template whose `{{SLOT}}`
//! placeholders are filled with the page body, the header indicator and the
//! chart configurations.

use crate::charts::ChartSlot;
use crate::thresholds::Level;
use crate::views::alerts::{AlertCard, AlertList, AlertsView, FilterState};
use crate::views::areas::{AreasBoard, AreasView, CapacityNotices};
use crate::views::freshness::Freshness;
use crate::views::main_page::{AlertFeed, MainView};
use crate::views::pool::{PoolView, WaterQualityCard};
use crate::views::sensors::{FleetSummary, SensorsView};
use crate::views::{Badge, Page, Section, StatusText};
use serde::Serialize;
use std::time::Duration;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to inline inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

/// Single pass over the template so filled values are never rescanned.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = &after[..end];
        match slots.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn refresh_seconds(period: Duration) -> u64 {
    let millis = period.as_millis() as u64;
    millis.div_ceil(1000).max(1)
}

fn nav(current: Page) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == current { "nav-link active" } else { "nav-link" };
            format!(
                r#"<a class="{class}" href="{}">{}</a>"#,
                page.href(),
                escape(page.title())
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn indicator(freshness: &Freshness) -> String {
    format!(
        r#"<div id="last-update-indicator" class="indicator indicator-{}"><i class="fas {}"></i> {}</div>"#,
        freshness.level.css_class(),
        freshness.icon,
        escape(&freshness.text)
    )
}

pub fn render_page(
    page: Page,
    freshness: &Freshness,
    refresh: Duration,
    body: &str,
    charts: &[ChartSlot],
) -> String {
    let refresh = refresh_seconds(refresh).to_string();
    let nav = nav(page);
    let indicator = indicator(freshness);
    let charts = script_json(&charts);
    fill(
        LAYOUT_HTML,
        &[
            ("TITLE", page.title()),
            ("REFRESH", &refresh),
            ("NAV", &nav),
            ("INDICATOR", &indicator),
            ("CONTENT", body),
            ("CHARTS", &charts),
        ],
    )
}

fn section<T>(section: &Section<T>, render: impl FnOnce(&T) -> String) -> String {
    match section {
        Section::Loading => r#"<p class="placeholder">Carregando...</p>"#.to_string(),
        Section::NoData => {
            r#"<p class="no-data"><i class="fas fa-exclamation-triangle"></i> Sem dados</p>"#
                .to_string()
        }
        Section::Ready(value) => render(value),
    }
}

fn status_line(status: &StatusText) -> String {
    format!(
        r#"<span class="metric-status status-{}">{}</span>"#,
        status.level.css_class(),
        escape(&status.text)
    )
}

fn badge(badge: &Badge) -> String {
    let icon = if badge.icon.is_empty() {
        String::new()
    } else {
        format!(r#"<i class="fas {}"></i> "#, badge.icon)
    };
    format!(
        r#"<span class="badge {}">{icon}{}</span>"#,
        badge.class,
        escape(&badge.text)
    )
}

fn metric_card(title: &str, icon: &str, body: String) -> String {
    format!(
        r#"<article class="metric-card">
  <header><i class="fas {icon}"></i> {}</header>
  {body}
</article>"#,
        escape(title)
    )
}

fn chart_box(title: &str, canvas: &str) -> String {
    format!(
        r#"<div class="chart-box"><h2>{}</h2><div class="chart-wrap"><canvas id="{canvas}"></canvas></div></div>"#,
        escape(title)
    )
}

fn card_level_class(level: Level) -> &'static str {
    match level {
        Level::Critical => "danger",
        Level::Warning | Level::Moderate => "warning",
        Level::Normal => "info",
    }
}

pub fn main_body(view: &MainView) -> String {
    let occupancy = section(&view.occupancy, |card| {
        format!(
            r#"<div class="metric-value {}">{}</div>
  <p>{}</p>
  <p>Entradas hoje: {}</p>
  <p>Taxa de ocupação: {}</p>
  {}"#,
            card_level_class(card.status.level),
            card.current_people,
            escape(&card.capacity_info),
            card.entries_today,
            escape(&card.occupation_rate),
            status_line(&card.status)
        )
    });
    let visits = section(&view.visits, |card| {
        format!(
            r#"<div class="metric-value">{}</div>
  <p>Permanência média: {}</p>
  <p>Pico de hoje: {}</p>"#,
            escape(&card.daily_average),
            escape(&card.average_stay),
            card.today_peak
        )
    });
    let peak = section(&view.peak, |card| {
        format!(
            r#"<div class="metric-value">{}</div>
  <p>{}</p>"#,
            escape(&card.peak_hour),
            escape(&card.prediction)
        )
    });
    let alerts_card = section(&view.alerts, |card| {
        format!(
            r#"<div class="metric-value {}">{}</div>
  <p>{}</p>
  {}"#,
            card_level_class(card.status.level),
            card.total,
            escape(&card.breakdown),
            status_line(&card.status)
        )
    });
    let feed = section(&view.alerts, |card| match &card.feed {
        AlertFeed::AllClear { title, message } => format!(
            r#"<div class="all-clear"><i class="fas fa-check-circle"></i><strong>{}</strong><p>{}</p></div>"#,
            escape(title),
            escape(message)
        ),
        AlertFeed::Items { items } => items
            .iter()
            .map(|item| {
                format!(
                    r#"<div class="feed-item {}"><i class="fas {}"></i><div><strong>{}</strong><p>{}</p><small>{}</small></div></div>"#,
                    item.severity.css_class(),
                    item.icon,
                    escape(&item.title),
                    escape(&item.message),
                    escape(&item.age)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    });

    format!(
        r#"<section class="cards">
{}
{}
{}
{}
</section>
<section class="charts">
{}
{}
</section>
<section class="panel">
<h2>Alertas recentes</h2>
{feed}
</section>"#,
        metric_card("Pessoas no local", "fa-users", occupancy),
        metric_card("Visitas", "fa-chart-line", visits),
        metric_card("Próximo pico", "fa-clock", peak),
        metric_card("Alertas ativos", "fa-bell", alerts_card),
        chart_box("Fluxo de Pessoas", "peopleFlowChart"),
        chart_box("Ocupação por Área", "occupationByAreaChart"),
    )
}

fn areas_board(board: &AreasBoard) -> String {
    let summary = &board.summary;
    let rows = board
        .rows
        .iter()
        .map(|row| {
            let class = row.status.level.css_class();
            format!(
                r#"<tr class="area-row {class}">
  <td><i class="fas fa-map-marker-alt"></i> {}</td>
  <td>{}</td>
  <td>{}</td>
  <td><div class="progress-bar"><div class="progress-fill {class}" style="width: {:.0}%"></div><span class="progress-text">{:.0}%</span></div></td>
  <td><span class="badge badge-{class}">{}</span></td>
</tr>"#,
                escape(&row.name),
                row.current_people,
                row.capacity,
                row.bar_width,
                row.percentage,
                escape(&row.status.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let notices = match &board.notices {
        CapacityNotices::AllNormal { message } => format!(
            r#"<div class="alert alert-success"><i class="fas fa-check-circle"></i> {}</div>"#,
            escape(message)
        ),
        CapacityNotices::Items { items } => items
            .iter()
            .map(|notice| {
                let (class, icon) = match notice.level {
                    Level::Critical => ("alert-danger", "fa-exclamation-triangle"),
                    _ => ("alert-warning", "fa-exclamation-circle"),
                };
                format!(
                    r#"<div class="alert {class}"><i class="fas {icon}"></i> <strong>{}</strong>: {}</div>"#,
                    escape(&notice.area),
                    escape(&notice.message)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    format!(
        r#"<section class="cards">
{}
{}
{}
{}
</section>
<section class="panel">
<table class="areas-table">
<thead><tr><th>Área</th><th>Atual</th><th>Capacidade</th><th>Ocupação</th><th>Status</th></tr></thead>
<tbody id="areas-table-body">
{rows}
</tbody>
</table>
</section>
<section class="panel" id="capacity-alerts">
{notices}
</section>"#,
        metric_card(
            "Total de áreas",
            "fa-building",
            format!(r#"<div class="metric-value">{}</div>"#, summary.total_areas)
        ),
        metric_card(
            "Áreas críticas",
            "fa-exclamation-triangle",
            format!(r#"<div class="metric-value danger">{}</div>"#, summary.critical_areas)
        ),
        metric_card(
            "Áreas em atenção",
            "fa-exclamation-circle",
            format!(r#"<div class="metric-value warning">{}</div>"#, summary.warning_areas)
        ),
        metric_card(
            "Ocupação total",
            "fa-users",
            format!(r#"<div class="metric-value">{}</div>"#, summary.total_people)
        ),
    )
}

pub fn areas_body(view: &AreasView) -> String {
    format!(
        "{}\n<section class=\"charts\">\n{}\n</section>",
        section(&view.areas, areas_board),
        chart_box("Ocupação por Área", "occupationByAreaChart")
    )
}

fn select(name: &str, current: &str, options: &[(&str, &str)]) -> String {
    let options = options
        .iter()
        .map(|(value, label)| {
            let selected = if *value == current { " selected" } else { "" };
            format!(r#"<option value="{value}"{selected}>{}</option>"#, escape(label))
        })
        .collect::<Vec<_>>()
        .join("");
    format!(r#"<select id="filter-{name}" name="{name}">{options}</select>"#)
}

fn filter_form(filter: &FilterState) -> String {
    format!(
        r#"<form class="filters" method="get" action="/dashboard/alertas">
{}
{}
{}
<button type="submit"><i class="fas fa-filter"></i> Filtrar</button>
</form>"#,
        select(
            "type",
            filter.kind,
            &[
                ("all", "Todos os tipos"),
                ("capacity", "Capacidade"),
                ("security", "Segurança"),
                ("maintenance", "Manutenção"),
                ("system", "Sistema"),
                ("sensor", "Sensor"),
                ("other", "Outro"),
            ]
        ),
        select(
            "priority",
            filter.priority,
            &[
                ("all", "Todas as prioridades"),
                ("high", "Alta"),
                ("medium", "Média"),
                ("low", "Baixa"),
            ]
        ),
        select(
            "status",
            filter.status,
            &[
                ("all", "Todos os status"),
                ("active", "Ativos"),
                ("resolved", "Resolvidos"),
                ("ignored", "Ignorados"),
            ]
        ),
    )
}

fn alert_card(card: &AlertCard) -> String {
    let id = escape(&card.id);
    let actions = if card.actionable {
        format!(
            r#"<form method="post" action="/dashboard/alertas/{id}/resolve"><button class="btn-sm btn-resolve" type="submit"><i class="fas fa-check"></i> Resolver</button></form>
<form method="post" action="/dashboard/alertas/{id}/ignore"><button class="btn-sm btn-ignore" type="submit"><i class="fas fa-times"></i> Ignorar</button></form>"#
        )
    } else {
        String::new()
    };
    let area = card
        .area
        .as_deref()
        .map(|area| {
            format!(
                r#"<span class="alert-location"><i class="fas fa-map-marker-alt"></i> {}</span>"#,
                escape(area)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="alert-card {} {}" data-id="{id}">
  <div class="alert-header"><span class="alert-type"><i class="fas {}"></i> {}</span>{}</div>
  <h4 class="alert-title">{}</h4>
  <p class="alert-message">{}</p>
  <div class="alert-meta"><span class="alert-time"><i class="fas fa-clock"></i> {}</span>{area}</div>
  <div class="alert-footer">{}<div class="alert-actions">{actions}</div></div>
</div>"#,
        card.priority_class,
        card.status_class,
        card.type_icon,
        escape(card.type_label),
        badge(&card.priority),
        escape(&card.title),
        escape(&card.message),
        escape(&card.age),
        badge(&card.status),
    )
}

pub fn alerts_body(view: &AlertsView) -> String {
    let summary = section(&view.summary, |summary| {
        [
            ("Total de alertas", "fa-bell", summary.total),
            ("Alta prioridade", "fa-exclamation-triangle", summary.high_priority),
            ("Ativos", "fa-bolt", summary.active),
            ("Resolvidos hoje", "fa-check-circle", summary.resolved_today),
        ]
        .iter()
        .map(|(title, icon, value)| {
            metric_card(title, icon, format!(r#"<div class="metric-value">{value}</div>"#))
        })
        .collect::<Vec<_>>()
        .join("\n")
    });
    let list = section(&view.list, |list| match list {
        AlertList::Empty { title, message } => format!(
            r#"<div class="no-alerts"><i class="fas fa-check-circle"></i><h3>{}</h3><p>{}</p></div>"#,
            escape(title),
            escape(message)
        ),
        AlertList::Items { items } => items
            .iter()
            .map(alert_card)
            .collect::<Vec<_>>()
            .join("\n"),
    });
    format!(
        r#"<section class="cards">
{summary}
</section>
<section class="panel">
{}
<div id="alerts-list">
{list}
</div>
</section>
<section class="charts">
{}
</section>"#,
        filter_form(&view.filter),
        chart_box("Alertas por Tipo", "alertsByTypeChart"),
    )
}

fn quality_grid(card: &WaterQualityCard) -> String {
    let metrics = card
        .metrics
        .iter()
        .map(|metric| {
            format!(
                r#"<div class="quality-card {}"><span class="quality-label">{}</span><span id="{}-value" class="quality-value">{}</span><span class="quality-status {}">{}</span></div>"#,
                metric.class,
                escape(metric.label),
                metric.key,
                escape(&metric.value),
                metric.class,
                escape(metric.status_text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<div class="quality-grid">
{metrics}
</div>
<p id="overall-quality-status">Qualidade geral: {}</p>"#,
        badge(&card.overall)
    )
}

pub fn pool_body(view: &PoolView) -> String {
    let status = section(&view.status, |card| {
        let temperature_status = card
            .temperature_status
            .map(|t| {
                format!(
                    r#"<span class="metric-status {}">{}</span>"#,
                    t.status.css_class(),
                    escape(t.label)
                )
            })
            .unwrap_or_default();
        format!(
            r#"<div class="metric-value">{}</div>
  {temperature_status}
  <p>Temperatura ambiente: {}</p>
  <p>Última atualização: {}</p>
  <p id="operational-status">{}</p>"#,
            escape(&card.water_temperature),
            escape(&card.ambient_temperature),
            escape(&card.last_update),
            badge(&card.operational)
        )
    });
    let occupation = section(&view.occupation, |card| {
        format!(
            r#"<div class="metric-value">{}/{}</div>
  <p>Disponível: {}</p>
  <div class="progress-bar"><div id="pool-occupation-bar" class="progress-fill {}" style="width: {:.0}%"></div><span class="progress-text">{}</span></div>
  <p id="occupation-status">{}</p>"#,
            card.current_people,
            card.capacity,
            card.available,
            card.bar_class,
            card.bar_width,
            escape(&card.percentage_text),
            badge(&card.status)
        )
    });
    let quality = section(&view.quality, quality_grid);
    format!(
        r#"<section class="cards">
{}
{}
</section>
<section class="panel">
<h2>Qualidade da Água</h2>
{quality}
</section>
<section class="charts">
{}
{}
</section>"#,
        metric_card("Temperatura da água", "fa-thermometer-half", status),
        metric_card("Ocupação", "fa-swimmer", occupation),
        chart_box("Ocupação ao longo do dia", "poolOccupationChart"),
        chart_box("pH e Cloro", "waterQualityChart"),
    )
}

fn fleet(summary: &FleetSummary) -> String {
    let protocols = summary
        .protocols
        .iter()
        .map(|share| {
            format!(
                "<li>{}: <strong>{}</strong></li>",
                escape(&share.protocol),
                share.sensors
            )
        })
        .collect::<Vec<_>>()
        .join("");
    let battery = summary.battery;
    let signal = summary.signal;
    format!(
        r#"<section class="cards">
{}
{}
{}
{}
</section>
<section class="panel stats-grid">
<div><h3>Protocolos</h3><ul>{protocols}</ul></div>
<div><h3>Bateria</h3><ul><li>Excelente (90-100%): <strong>{}</strong></li><li>Boa (70-89%): <strong>{}</strong></li><li>Crítica (&lt;50%): <strong>{}</strong></li></ul></div>
<div><h3>Sinal</h3><ul><li>Excelente (-40 a -60 dBm): <strong>{}</strong></li><li>Bom (-61 a -70 dBm): <strong>{}</strong></li><li>Fraco (&lt; -70 dBm): <strong>{}</strong></li></ul></div>
</section>"#,
        metric_card(
            "Total de sensores",
            "fa-microchip",
            format!(r#"<div class="metric-value">{}</div>"#, summary.total_sensors)
        ),
        metric_card(
            "Sensores ativos",
            "fa-signal",
            format!(r#"<div class="metric-value">{}</div>"#, summary.active_sensors)
        ),
        metric_card(
            "Total de leituras",
            "fa-database",
            format!(
                r#"<div class="metric-value">{}</div>"#,
                escape(&summary.total_readings)
            )
        ),
        metric_card(
            "Protocolos",
            "fa-network-wired",
            format!(r#"<div class="metric-value">{}</div>"#, summary.total_protocols)
        ),
        battery.excellent,
        battery.good,
        battery.critical,
        signal.excellent,
        signal.good,
        signal.poor,
    )
}

pub fn sensors_body(view: &SensorsView) -> String {
    format!(
        "{}\n<section class=\"charts\">\n{}\n</section>",
        section(&view.fleet, fleet),
        chart_box("Leituras por Sensor", "sensorsDistributionChart")
    )
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta http-equiv="refresh" content="{{REFRESH}}" />
  <title>{{TITLE}} · SmartCEU</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css" />
  <style>
    :root {
      --bg: #eef2f7;
      --ink: #2c3e50;
      --muted: #7f8c8d;
      --card: #ffffff;
      --primary: #1565c0;
      --normal: #2ecc71;
      --moderate: #3498db;
      --warning: #f1c40f;
      --critical: #e74c3c;
      --shadow: 0 12px 30px rgba(44, 62, 80, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    .topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
      padding: 16px 28px;
      background: var(--primary);
      color: white;
    }

    .topbar h1 {
      margin: 0;
      font-size: 1.4rem;
    }

    nav {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .nav-link {
      color: rgba(255, 255, 255, 0.8);
      text-decoration: none;
      padding: 6px 12px;
      border-radius: 999px;
    }

    .nav-link.active {
      background: rgba(255, 255, 255, 0.2);
      color: white;
    }

    .indicator {
      padding: 6px 12px;
      border-radius: 8px;
      background: rgba(0, 0, 0, 0.2);
      font-size: 0.9rem;
    }

    .indicator-normal { color: #5efc82; }
    .indicator-warning { color: #ffd54f; }
    .indicator-critical { color: #ff8a80; }

    main {
      display: grid;
      gap: 24px;
      padding: 28px;
      max-width: 1280px;
      margin: 0 auto;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 18px;
    }

    .metric-card, .panel, .chart-box {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px 20px;
    }

    .metric-card header {
      text-transform: uppercase;
      letter-spacing: 0.08em;
      font-size: 0.8rem;
      color: var(--muted);
    }

    .metric-value {
      font-size: 2rem;
      font-weight: 600;
      margin: 10px 0;
    }

    .metric-value.warning { color: #d4a000; }
    .metric-value.danger { color: var(--critical); }

    .metric-status {
      display: inline-block;
      padding: 4px 10px;
      border-radius: 999px;
      font-size: 0.85rem;
    }

    .status-normal, .status-optimal { background: rgba(46, 204, 113, 0.15); color: #1e8449; }
    .status-moderate { background: rgba(52, 152, 219, 0.15); color: #1f618d; }
    .status-warning { background: rgba(241, 196, 15, 0.2); color: #9a7d0a; }
    .status-critical { background: rgba(231, 76, 60, 0.15); color: #b03a2e; }

    .placeholder, .no-data {
      color: var(--muted);
      font-style: italic;
    }

    .no-data { color: var(--critical); }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 18px;
    }

    .chart-box h2, .panel h2 {
      margin: 0 0 12px;
      font-size: 1.1rem;
    }

    .chart-wrap {
      position: relative;
      height: 280px;
    }

    .badge {
      display: inline-block;
      padding: 3px 10px;
      border-radius: 999px;
      font-size: 0.8rem;
      color: white;
      background: var(--muted);
    }

    .badge-success, .badge-normal { background: var(--normal); }
    .badge-info, .badge-moderate { background: var(--moderate); }
    .badge-warning { background: var(--warning); color: var(--ink); }
    .badge-danger, .badge-critical { background: var(--critical); }
    .badge-secondary { background: #95a5a6; }

    .progress-bar {
      position: relative;
      height: 18px;
      border-radius: 999px;
      background: #ecf0f1;
      overflow: hidden;
    }

    .progress-fill { height: 100%; background: var(--normal); }
    .progress-fill.moderate { background: var(--moderate); }
    .progress-fill.warning { background: var(--warning); }
    .progress-fill.critical { background: var(--critical); }

    .progress-text {
      position: absolute;
      inset: 0;
      text-align: center;
      font-size: 0.75rem;
      line-height: 18px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #ecf0f1;
    }

    .alert {
      padding: 10px 14px;
      border-radius: 10px;
      margin-bottom: 8px;
    }

    .alert-success { background: rgba(46, 204, 113, 0.15); }
    .alert-warning { background: rgba(241, 196, 15, 0.2); }
    .alert-danger { background: rgba(231, 76, 60, 0.15); }

    .feed-item, .alert-card {
      display: flex;
      gap: 12px;
      padding: 12px;
      border-left: 4px solid var(--moderate);
      border-radius: 10px;
      background: #f8f9fa;
      margin-bottom: 10px;
    }

    .alert-card { display: block; }
    .feed-item.critical, .alert-card.priority-high { border-color: var(--critical); }
    .feed-item.warning, .alert-card.priority-medium { border-color: var(--warning); }
    .alert-card.resolved, .alert-card.ignored { opacity: 0.7; }

    .alert-header, .alert-footer, .alert-meta {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .alert-actions, .filters {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .filters { margin-bottom: 16px; }

    button, select {
      border: none;
      border-radius: 8px;
      padding: 8px 12px;
      font: inherit;
      cursor: pointer;
    }

    select { background: #ecf0f1; }
    .btn-resolve { background: var(--normal); color: white; }
    .btn-ignore { background: #95a5a6; color: white; }

    .all-clear, .no-alerts {
      text-align: center;
      color: #1e8449;
      padding: 18px;
    }

    .quality-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .quality-card {
      display: grid;
      gap: 6px;
      padding: 12px;
      border-radius: 12px;
      background: #f8f9fa;
    }

    .quality-value { font-size: 1.5rem; font-weight: 600; }

    .stats-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 18px;
    }

    @media (max-width: 640px) {
      main { padding: 16px; }
      .charts { grid-template-columns: 1fr; }
    }
  </style>
</head>
<body>
  <header class="topbar">
    <h1><i class="fas fa-chart-pie"></i> {{TITLE}}</h1>
    <nav>
        {{NAV}}
    </nav>
    {{INDICATOR}}
  </header>
  <main>
{{CONTENT}}
  </main>
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
  <script>
    const CHARTS = {{CHARTS}};
    for (const slot of CHARTS) {
      const canvas = document.getElementById(slot.canvas);
      if (canvas && window.Chart) {
        new Chart(canvas, slot.spec);
      }
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_specials() {
        assert_eq!(
            escape(r#"<b>"Sala" & 'Quadra'</b>"#),
            "&lt;b&gt;&quot;Sala&quot; &amp; &#39;Quadra&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn fill_does_not_rescan_inserted_values() {
        let out = fill("<p>{{A}}</p>{{B}}{{C}}", &[("A", "{{B}}"), ("B", "b")]);
        assert_eq!(out, "<p>{{B}}</p>b{{C}}");
    }

    #[test]
    fn script_json_cannot_close_the_script_tag() {
        let json = script_json(&vec!["</script><script>alert(1)"]);
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn refresh_rounds_up_to_whole_seconds() {
        assert_eq!(refresh_seconds(Duration::from_secs(15)), 15);
        assert_eq!(refresh_seconds(Duration::from_millis(250)), 1);
        assert_eq!(refresh_seconds(Duration::from_millis(1500)), 2);
    }

    #[test]
    fn layout_marks_the_current_page() {
        let html = render_page(
            Page::Pool,
            &Freshness::no_data(),
            Duration::from_secs(30),
            "<p>corpo</p>",
            &[],
        );
        assert!(html.contains(r#"<meta http-equiv="refresh" content="30" />"#));
        assert!(html.contains(r#"<a class="nav-link active" href="/dashboard/piscina">"#));
        assert!(html.contains("<p>corpo</p>"));
        assert!(html.contains("Sem dados"));
        assert!(html.contains("const CHARTS = [];"));
    }

    #[test]
    fn filter_selects_reflect_the_current_filter() {
        let form = filter_form(&FilterState {
            kind: "all",
            priority: "high",
            status: "active",
        });
        assert!(form.contains(r#"<option value="high" selected>"#));
        assert!(form.contains(r#"<option value="active" selected>"#));
        assert!(!form.contains(r#"<option value="low" selected>"#));
    }
}
