//! Historical data: activity logs and RSSI monitoring records.
//!
//! Wire records as the backend serves them, plus the pure shaping the console
//! applies before display: the pagination strip for the logs table and the
//! scatter/line series for the monitoring charts. The RSSI statistics
//! themselves are computed by the backend; nothing here derives them.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pages beyond which the strip collapses into ellipses.
const MAX_UNCOLLAPSED_PAGES: u32 = 7;

// =============================================================
// Logs
// =============================================================

/// Source of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    #[serde(rename = "MCU")]
    Mcu,
    #[serde(rename = "ACTIVITY")]
    Activity,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mcu => "MCU",
            Self::Activity => "ACTIVITY",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    #[serde(alias = "logType")]
    pub status: LogKind,
    pub text: String,
}

/// One page of `GET /logs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub data: Vec<LogRecord>,
    #[serde(default)]
    pub total_pages: u32,
}

/// An entry in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page numbers to show for `current` of `total` pages.
///
/// Up to seven pages are listed in full. Beyond that the strip keeps the
/// first and last page and collapses the rest around `current`.
#[must_use]
pub fn pagination_range(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(Page).collect();
    }
    if current < 5 {
        return vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(total)];
    }
    if current > total - 4 {
        let mut items = vec![Page(1), Ellipsis];
        items.extend((total - 4..=total).map(Page));
        return items;
    }
    vec![Page(1), Ellipsis, Page(current - 1), Page(current), Page(current + 1), Ellipsis, Page(total)]
}

/// Clamp a requested page into `1..=total` (page 1 when there are none).
#[must_use]
pub fn clamp_page(page: u32, total: u32) -> u32 {
    page.clamp(1, total.max(1))
}

/// Render the strip as text, bracketing the current page: `1 … 4 [5] 6 … 9`.
#[must_use]
pub fn format_pagination(items: &[PageItem], current: u32) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(p) if *p == current => format!("[{p}]"),
            PageItem::Page(p) => p.to_string(),
            PageItem::Ellipsis => "…".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================
// Monitoring
// =============================================================

/// One aggregation window of RSSI statistics from `GET /monitoring/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRssi {
    pub timestamp: String,
    #[serde(default)]
    pub rssi1: Vec<f64>,
    #[serde(default)]
    pub rssi2: Vec<f64>,
    #[serde(default)]
    pub rssi3: Vec<f64>,
    pub variance1: f64,
    pub variance2: f64,
    pub variance3: f64,
    pub median1: f64,
    pub median2: f64,
    pub median3: f64,
    pub mean1: f64,
    pub mean2: f64,
    pub mean3: f64,
}

impl RawRssi {
    #[must_use]
    pub fn samples(&self, channel: RssiChannel) -> &[f64] {
        match channel {
            RssiChannel::One => &self.rssi1,
            RssiChannel::Two => &self.rssi2,
            RssiChannel::Three => &self.rssi3,
        }
    }
}

/// Which receiver's raw samples to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RssiChannel {
    #[default]
    One,
    Two,
    Three,
}

impl RssiChannel {
    /// Parse a 1-based receiver index.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }
}

/// A single raw sample placed on the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub time: String,
    pub value: f64,
}

/// Per-window statistics for the variance/median/mean line charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub time: String,
    pub variance: [f64; 3],
    pub median: [f64; 3],
    pub mean: [f64; 3],
}

/// Flatten every record's samples for `channel`, in record order.
#[must_use]
pub fn scatter_points(records: &[RawRssi], channel: RssiChannel) -> Vec<ScatterPoint> {
    records
        .iter()
        .flat_map(|record| {
            let time = time_label(&record.timestamp);
            record.samples(channel).iter().map(move |&value| ScatterPoint { time: time.clone(), value })
        })
        .collect()
}

#[must_use]
pub fn chart_rows(records: &[RawRssi]) -> Vec<ChartRow> {
    records
        .iter()
        .map(|r| ChartRow {
            time: time_label(&r.timestamp),
            variance: [r.variance1, r.variance2, r.variance3],
            median: [r.median1, r.median2, r.median3],
            mean: [r.mean1, r.mean2, r.mean3],
        })
        .collect()
}

/// `HH:MM` from an ISO-8601 style timestamp; the input unchanged otherwise.
#[must_use]
pub fn time_label(timestamp: &str) -> String {
    let Some((_, time)) = timestamp.split_once(['T', ' ']) else {
        return timestamp.to_owned();
    };
    match time.get(..5) {
        Some(hh_mm) if hh_mm.as_bytes().get(2) == Some(&b':') => hh_mm.to_owned(),
        _ => timestamp.to_owned(),
    }
}
