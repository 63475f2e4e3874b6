//! Analytics aggregation tests
//!
//! Covers window cutoff strictness, ranking order and truncation, and
//! the label fallbacks for orphaned ids.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::analytics::{
    top_customers, top_suppliers, warehouse_distribution, window_cutoff, PERIOD_CHOICES,
};
use shared::models::{Client, Issue, LedgerEntry, MovementType, Warehouse};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(days_ago: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap() - Duration::days(days_ago)
}

fn now() -> DateTime<Utc> {
    at(0)
}

fn ledger_issue(warehouse_id: i64, days_ago: i64, total: &str) -> LedgerEntry {
    LedgerEntry {
        id: warehouse_id * 100 + days_ago,
        date_time: Some(at(days_ago)),
        warehouse_id,
        material_id: 1,
        movement_type: MovementType::Issue,
        qty_change: dec("-1"),
        unit_price: Some(dec("1")),
        currency: Some("UAH".to_string()),
        total_price: Some(-dec(total)),
        reference_doc_type: None,
        reference_doc_id: None,
        remarks: None,
    }
}

fn issue(client_id: Option<i64>, days_ago: i64, total: &str) -> Issue {
    Issue {
        id: days_ago,
        document_number: format!("ISS-{days_ago}"),
        date: Some(at(days_ago)),
        client_id,
        currency: "UAH".to_string(),
        total_amount: dec(total),
        notes: None,
        items: Vec::new(),
        created_at: None,
    }
}

fn client(id: i64, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        contact_info: None,
        created_at: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    /// Entries exactly at the cutoff are in; older ones are out
    #[test]
    fn test_window_boundary_is_inclusive() {
        let rows = warehouse_distribution(
            &[
                ledger_issue(1, 30, "100"), // exactly on the cutoff
                ledger_issue(2, 31, "999"), // one day too old
            ],
            &[],
            now(),
            30,
            10,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].warehouse_id, 1);
    }

    /// Outbound entries are valued at their absolute total
    #[test]
    fn test_values_are_absolute() {
        let rows = warehouse_distribution(&[ledger_issue(1, 5, "250")], &[], now(), 30, 10);
        assert_eq!(rows[0].total_value, dec("250"));
        assert_eq!(rows[0].total_qty, dec("1"));
    }

    /// Ranked descending by value and truncated to N
    #[test]
    fn test_ranking_and_truncation() {
        let issues = vec![
            issue(Some(1), 1, "50"),
            issue(Some(2), 2, "300"),
            issue(Some(3), 3, "120"),
        ];
        let clients = vec![client(1, "Alfa"), client(2, "Beta"), client(3, "Gamma")];

        let rows = top_customers(&issues, &clients, now(), 30, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Beta");
        assert_eq!(rows[1].name, "Gamma");
    }

    /// Documents with no counterparty are skipped, not grouped together
    #[test]
    fn test_null_counterparty_skipped() {
        let issues = vec![issue(None, 1, "400"), issue(Some(1), 2, "50")];
        let rows = top_customers(&issues, &[client(1, "Alfa")], now(), 30, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Alfa");
    }

    /// An id with no matching party still appears, under a synthetic label
    #[test]
    fn test_orphan_id_gets_fallback_label() {
        let rows = top_customers(&[issue(Some(42), 1, "10")], &[], now(), 30, 10);
        assert_eq!(rows[0].name, "Client #42");
    }

    /// Several documents for the same party fold into one row with the
    /// average and the most recent event
    #[test]
    fn test_counterparty_rollup() {
        let issues = vec![
            issue(Some(1), 10, "100"),
            issue(Some(1), 2, "300"),
        ];
        let rows = top_customers(&issues, &[client(1, "Alfa")], now(), 30, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].document_count, 2);
        assert_eq!(rows[0].total_value, dec("400"));
        assert_eq!(rows[0].avg_value, dec("200"));
        assert_eq!(rows[0].days_since_last, Some(2));
    }

    /// Supplier side mirrors the customer side over receipts
    #[test]
    fn test_supplier_report_uses_receipts() {
        use shared::models::{Receipt, Supplier};
        let receipts = vec![Receipt {
            id: 1,
            document_number: "RCV-1".to_string(),
            date: Some(at(3)),
            supplier_id: Some(9),
            currency: "UAH".to_string(),
            total_amount: dec("75"),
            notes: None,
            items: Vec::new(),
            created_at: None,
        }];
        let suppliers = vec![Supplier {
            id: 9,
            name: "Postach".to_string(),
            contact_info: None,
            created_at: None,
        }];
        let rows = top_suppliers(&receipts, &suppliers, now(), 30, 10);
        assert_eq!(rows[0].name, "Postach");
        assert_eq!(rows[0].total_value, dec("75"));
    }

    /// Finished report rows serialize to CSV with one header line
    #[test]
    fn test_report_rows_export_as_csv() {
        use warehouse_console::services::AnalyticsService;

        let rows = top_customers(
            &[issue(Some(1), 2, "300"), issue(Some(1), 10, "100")],
            &[client(1, "Alfa")],
            now(),
            30,
            10,
        );
        let csv = AnalyticsService::export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,document_count,total_value,avg_value,last_event,days_since_last")
        );
        let data = lines.next().unwrap();
        assert!(data.starts_with("1,Alfa,2,400,200,"));
        assert_eq!(lines.next(), None);
    }

    /// Warehouse labels fall back to a synthetic name when unmatched
    #[test]
    fn test_warehouse_label_fallback() {
        let known = vec![Warehouse {
            id: 1,
            name: "Central".to_string(),
            address: None,
            manager_name: None,
            capacity: None,
            capacity_unit: None,
            created_at: None,
        }];
        let rows = warehouse_distribution(
            &[ledger_issue(1, 1, "10"), ledger_issue(7, 1, "20")],
            &known,
            now(),
            30,
            10,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.warehouse_name.as_str()).collect();
        assert!(names.contains(&"Central"));
        assert!(names.contains(&"Warehouse #7"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The cutoff is exactly `days` before now, for every offered period
    #[test]
    fn prop_cutoff_matches_period(choice in 0usize..PERIOD_CHOICES.len()) {
        let days = PERIOD_CHOICES[choice];
        let cutoff = window_cutoff(now(), days);
        prop_assert_eq!(now() - cutoff, Duration::days(days));
    }

    /// No report row ever reaches past the window, whatever the data
    #[test]
    fn prop_window_filters_strictly(
        offsets in prop::collection::vec(0i64..120, 1..40),
        days in prop::sample::select(PERIOD_CHOICES.to_vec()),
    ) {
        let issues: Vec<Issue> = offsets
            .iter()
            .map(|&d| issue(Some(d), d, "10"))
            .collect();
        let rows = top_customers(&issues, &[], now(), days, usize::MAX);

        let expected: usize = offsets.iter().filter(|&&d| d <= days).count();
        let counted: u64 = rows.iter().map(|r| r.document_count).sum();
        prop_assert_eq!(counted as usize, expected);
    }

    /// Ranking is monotonically non-increasing in total value
    #[test]
    fn prop_ranking_is_sorted(totals in prop::collection::vec(1u32..10_000, 1..30)) {
        let issues: Vec<Issue> = totals
            .iter()
            .enumerate()
            .map(|(i, &t)| issue(Some(i as i64), 1, &t.to_string()))
            .collect();
        let rows = top_customers(&issues, &[], now(), 30, 10);

        prop_assert!(rows.len() <= 10);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].total_value >= pair[1].total_value);
        }
    }
}
