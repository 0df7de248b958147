//! Dashboard summary: headline counts and the three most recent documents.

use chrono::NaiveDateTime;

use crate::record::{RawDocument, parse_timestamp};

/// How many documents the "recent" panel shows.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: usize,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDocument {
    pub id: String,
    /// Uppercased document type, or `DOCUMENT`.
    pub name: String,
    pub status: String,
    pub date_display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub stats: Vec<Stat>,
    pub recent: Vec<RecentDocument>,
}

fn count_status(docs: &[RawDocument], status: &str) -> usize {
    docs.iter()
        .filter(|d| d.status.as_deref() == Some(status))
        .count()
}

fn change(value: usize, sign: char, cap: usize, divisor: f64) -> String {
    if value == 0 {
        return "0%".to_string();
    }
    let scaled = (value as f64 / divisor).round() as usize;
    format!("{sign}{}%", scaled.min(cap))
}

/// Headline counts, computed over the full (unsliced) collection.
pub fn compute_stats(docs: &[RawDocument]) -> Vec<Stat> {
    let total = docs.len();
    let pending = count_status(docs, "pending");
    let completed = count_status(docs, "completed");
    let drafts = count_status(docs, "draft");

    vec![
        Stat {
            label: "Contracts Created",
            value: total,
            change: change(total, '+', 50, 5.0),
        },
        Stat {
            label: "Pending Downloads",
            value: pending,
            change: change(pending, '-', 20, 1.0),
        },
        Stat {
            label: "AI Consultations",
            value: completed,
            change: change(completed, '+', 30, 2.0),
        },
        Stat {
            label: "Active Templates",
            value: drafts,
            change: change(drafts, '+', 40, 1.0),
        },
    ]
}

fn recency_key(d: &RawDocument) -> NaiveDateTime {
    d.created_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| d.updated_at.as_deref().and_then(parse_timestamp))
        .unwrap_or_default()
}

/// Most recent documents first, by created then updated time.
pub fn recent_documents(docs: &[RawDocument], limit: usize) -> Vec<RecentDocument> {
    let mut sorted: Vec<&RawDocument> = docs.iter().collect();
    // Stable sort keeps backend order among equal timestamps.
    sorted.sort_by_key(|d| std::cmp::Reverse(recency_key(d)));

    sorted
        .into_iter()
        .take(limit)
        .map(|d| {
            let type_name = d.doc_type.as_deref().filter(|t| !t.is_empty());
            let date_display = d
                .created_at
                .as_deref()
                .or(d.updated_at.as_deref())
                .and_then(parse_timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            RecentDocument {
                id: d.id.clone(),
                name: type_name
                    .map(str::to_uppercase)
                    .unwrap_or_else(|| "DOCUMENT".to_string()),
                status: d
                    .status
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "draft".to_string()),
                date_display,
            }
        })
        .collect()
}

pub fn summarize(docs: &[RawDocument]) -> DashboardSummary {
    DashboardSummary {
        stats: compute_stats(docs),
        recent: recent_documents(docs, RECENT_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, status: Option<&str>, created: Option<&str>) -> RawDocument {
        RawDocument {
            id: id.into(),
            doc_type: Some("nda".into()),
            status: status.map(Into::into),
            created_at: created.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn empty_collection_reports_zero_changes() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.len(), 4);
        assert!(stats.iter().all(|s| s.value == 0 && s.change == "0%"));
    }

    #[test]
    fn stats_count_by_status() {
        let docs = vec![
            doc("1", Some("pending"), None),
            doc("2", Some("completed"), None),
            doc("3", Some("completed"), None),
            doc("4", Some("draft"), None),
            doc("5", None, None),
        ];
        let stats = compute_stats(&docs);
        assert_eq!(stats[0].value, 5);
        assert_eq!(stats[0].change, "+1%");
        assert_eq!(stats[1].value, 1);
        assert_eq!(stats[1].change, "-1%");
        assert_eq!(stats[2].value, 2);
        assert_eq!(stats[2].change, "+1%");
        assert_eq!(stats[3].value, 1);
    }

    #[test]
    fn changes_are_capped() {
        let docs: Vec<_> = (0..400)
            .map(|i| doc(&i.to_string(), Some("pending"), None))
            .collect();
        let stats = compute_stats(&docs);
        assert_eq!(stats[0].change, "+50%");
        assert_eq!(stats[1].change, "-20%");
    }

    #[test]
    fn recent_keeps_three_newest() {
        let docs = vec![
            doc("old", None, Some("2026-01-01T00:00:00")),
            doc("newest", None, Some("2026-03-01T00:00:00")),
            doc("undated", None, None),
            doc("mid", Some("completed"), Some("2026-02-01T00:00:00")),
        ];
        let recent = recent_documents(&docs, RECENT_LIMIT);
        let ids: Vec<_> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "mid", "old"]);
        assert_eq!(recent[0].name, "NDA");
        assert_eq!(recent[0].status, "draft");
        assert_eq!(recent[1].status, "completed");
    }

    #[test]
    fn recent_falls_back_to_updated_at_and_generic_name() {
        let mut d = RawDocument {
            id: "x".into(),
            updated_at: Some("2026-05-05T12:30:00".into()),
            ..Default::default()
        };
        d.doc_type = None;
        let recent = recent_documents(&[d], RECENT_LIMIT);
        assert_eq!(recent[0].name, "DOCUMENT");
        assert_eq!(recent[0].date_display, "2026-05-05 12:30");
    }
}
