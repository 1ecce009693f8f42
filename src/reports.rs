//! Reporting over vehicle records: completed-session summary, open-session
//! list, and the rolling 7-day revenue report.
//!
//! The aggregation itself is pure functions over fetched documents;
//! [`ReportService`] only feeds them from the store. Vehicle documents are
//! opaque maps, so field access goes through the small accessors below and
//! tolerates missing or oddly-typed fields.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::collection::Collection;
use crate::store::{Document, DocumentStore, StoreError};

/// Statuses that mean a parking session has ended and payment is settled.
pub const COMPLETED_STATUSES: [&str; 2] = ["closed", "completed"];

/// Status of a session still in progress.
pub const OPEN_STATUS: &str = "open";

#[derive(Debug, Serialize)]
pub struct CompletedSummary {
    pub records: Vec<Document>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    pub date: String,
    pub total: f64,
}

/// The one shared calendar-day formatter (dd/mm/yyyy).
///
/// Both the bucket keys and the canonical label sequence of the 7-day report
/// are produced here. Keeping a single formatter is what guarantees the two
/// sides can never drift apart and silently stop matching.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

fn status(doc: &Document) -> Option<&str> {
    doc.get("status").and_then(Value::as_str)
}

fn is_completed(doc: &Document) -> bool {
    status(doc).is_some_and(|s| COMPLETED_STATUSES.contains(&s))
}

/// Paid amount, with null/missing treated as zero.
fn amount_paid(doc: &Document) -> f64 {
    doc.get("amountPaid").and_then(Value::as_f64).unwrap_or(0.0)
}

fn timestamp_field(doc: &Document, field: &str) -> Option<DateTime<Utc>> {
    doc.get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn exit_time(doc: &Document) -> Option<DateTime<Utc>> {
    timestamp_field(doc, "exitTime")
}

fn entry_time(doc: &Document) -> Option<DateTime<Utc>> {
    timestamp_field(doc, "entryTime")
}

/// Completed sessions ordered by exit time descending, plus the settled
/// total. No time-window restriction.
pub fn summarize_completed(records: Vec<Document>) -> CompletedSummary {
    let mut completed: Vec<Document> = records.into_iter().filter(is_completed).collect();
    completed.sort_by(|a, b| exit_time(b).cmp(&exit_time(a)));

    let total = completed.iter().map(amount_paid).sum();
    CompletedSummary { records: completed, total }
}

/// Sessions still open, most recent entry first.
pub fn open_vehicles(records: Vec<Document>) -> Vec<Document> {
    let mut open: Vec<Document> =
        records.into_iter().filter(|doc| status(doc) == Some(OPEN_STATUS)).collect();
    open.sort_by(|a, b| entry_time(b).cmp(&entry_time(a)));
    open
}

/// Rolling 7-day revenue report: one bucket per calendar day from `now - 6`
/// through `now`, ascending, zero-filled for days with no completed records.
///
/// The window's lower bound is the start of its first calendar day,
/// inclusive; a record whose exit falls exactly on the boundary is counted.
pub fn daily_report(records: Vec<Document>, now: DateTime<Utc>) -> Vec<DailyBucket> {
    let today = now.date_naive();
    let window_start = (today - Days::new(6)).and_time(NaiveTime::MIN).and_utc();

    let mut sums: HashMap<String, f64> = HashMap::new();
    for doc in records.iter().filter(|doc| is_completed(doc)) {
        let exit = match exit_time(doc) {
            Some(t) if t >= window_start => t,
            _ => continue,
        };
        *sums.entry(day_label(exit.date_naive())).or_insert(0.0) += amount_paid(doc);
    }

    (0..7u64)
        .map(|i| {
            let label = day_label(today - Days::new(6 - i));
            let total = sums.get(&label).copied().unwrap_or(0.0);
            DailyBucket { date: label, total }
        })
        .collect()
}

/// Feeds the pure aggregations from the vehicle collection.
pub struct ReportService {
    store: Arc<dyn DocumentStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn all_vehicles(&self) -> Result<Vec<Document>, StoreError> {
        self.store.find(Collection::Vehicles, &HashMap::new()).await
    }

    pub async fn completed_summary(&self) -> Result<CompletedSummary, StoreError> {
        Ok(summarize_completed(self.all_vehicles().await?))
    }

    pub async fn open_vehicles(&self) -> Result<Vec<Document>, StoreError> {
        Ok(open_vehicles(self.all_vehicles().await?))
    }

    pub async fn daily_report(&self, now: DateTime<Utc>) -> Result<Vec<DailyBucket>, StoreError> {
        Ok(daily_report(self.all_vehicles().await?, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle(status: &str, exit: &str, amount: Value) -> Document {
        json!({ "status": status, "exitTime": exit, "amountPaid": amount })
            .as_object()
            .expect("object")
            .clone()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-10T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn summary_counts_null_amounts_as_zero() {
        let records = vec![
            vehicle("closed", "2024-06-10T10:00:00Z", json!(100)),
            vehicle("completed", "2024-06-09T10:00:00Z", json!(null)),
            vehicle("closed", "2024-06-08T10:00:00Z", json!(50)),
        ];

        let summary = summarize_completed(records);
        assert_eq!(summary.records.len(), 3);
        assert_eq!(summary.total, 150.0);
    }

    #[test]
    fn summary_excludes_open_and_orders_by_exit_desc() {
        let records = vec![
            vehicle("closed", "2024-06-08T10:00:00Z", json!(30)),
            vehicle("open", "2024-06-10T09:00:00Z", json!(0)),
            vehicle("completed", "2024-06-10T10:00:00Z", json!(50)),
        ];

        let summary = summarize_completed(records);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0].get("exitTime"), Some(&json!("2024-06-10T10:00:00Z")));
        assert_eq!(summary.records[1].get("exitTime"), Some(&json!("2024-06-08T10:00:00Z")));
        assert_eq!(summary.total, 80.0);
    }

    #[test]
    fn open_list_orders_by_entry_desc() {
        let docs: Vec<Document> = [
            json!({ "status": "open", "entryTime": "2024-06-10T08:00:00Z", "plate": "AAA" }),
            json!({ "status": "closed", "entryTime": "2024-06-10T11:00:00Z", "plate": "BBB" }),
            json!({ "status": "open", "entryTime": "2024-06-10T10:00:00Z", "plate": "CCC" }),
        ]
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect();

        let open = open_vehicles(docs);
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].get("plate"), Some(&json!("CCC")));
        assert_eq!(open[1].get("plate"), Some(&json!("AAA")));
    }

    #[test]
    fn daily_report_is_seven_ascending_buckets_even_when_empty() {
        let report = daily_report(vec![], now());

        assert_eq!(report.len(), 7);
        let expected: Vec<String> =
            (4..=10).map(|d| format!("{:02}/06/2024", d)).collect();
        let labels: Vec<&str> = report.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(labels, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(report.iter().all(|b| b.total == 0.0));
    }

    #[test]
    fn daily_report_buckets_and_zero_fills() {
        let records = vec![
            vehicle("closed", "2024-06-10T10:00:00Z", json!(50)),
            vehicle("completed", "2024-06-08T18:30:00Z", json!(30)),
            // Outside the 7-day window; must not appear anywhere
            vehicle("closed", "2024-06-03T10:00:00Z", json!(999)),
        ];

        let report = daily_report(records, now());
        assert_eq!(report.len(), 7);
        assert_eq!(report[0], DailyBucket { date: "04/06/2024".into(), total: 0.0 });
        assert_eq!(report[4], DailyBucket { date: "08/06/2024".into(), total: 30.0 });
        assert_eq!(report[6], DailyBucket { date: "10/06/2024".into(), total: 50.0 });

        let grand_total: f64 = report.iter().map(|b| b.total).sum();
        assert_eq!(grand_total, 80.0, "out-of-window amount leaked into the report");
    }

    #[test]
    fn window_start_boundary_is_inclusive() {
        let records = vec![vehicle("closed", "2024-06-04T00:00:00Z", json!(25))];

        let report = daily_report(records, now());
        assert_eq!(report[0], DailyBucket { date: "04/06/2024".into(), total: 25.0 });
    }

    #[test]
    fn daily_report_treats_null_amount_as_zero() {
        let records = vec![
            vehicle("closed", "2024-06-09T10:00:00Z", json!(null)),
            vehicle("closed", "2024-06-09T11:00:00Z", json!(40)),
        ];

        let report = daily_report(records, now());
        assert_eq!(report[5], DailyBucket { date: "09/06/2024".into(), total: 40.0 });
    }

    #[test]
    fn unparseable_exit_time_is_skipped() {
        let records = vec![
            vehicle("closed", "yesterday-ish", json!(10)),
            vehicle("closed", "2024-06-10T10:00:00Z", json!(5)),
        ];

        let report = daily_report(records, now());
        let grand_total: f64 = report.iter().map(|b| b.total).sum();
        assert_eq!(grand_total, 5.0);
    }
}
