//! Document draft tests
//!
//! Covers the derived-total arithmetic, the availability-driven line
//! rules, and payload assembly from raw form state.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::draft::{
    AvailabilityIndex, DocumentDraft, DocumentField, DraftError, LinePatch,
};
use shared::models::{DocumentKind, Material, StockRow};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn material(id: i64, price: &str) -> Material {
    Material {
        id,
        code: format!("MAT-{id}"),
        name: format!("Material {id}"),
        unit: "kg".to_string(),
        weight_per_unit: None,
        description: None,
        price: dec(price),
        currency: "UAH".to_string(),
        min_stock: Decimal::ZERO,
        category_id: None,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

fn stock(warehouse_id: i64, material_id: i64, qty: &str, reserved: &str) -> StockRow {
    StockRow {
        id: warehouse_id * 1000 + material_id,
        warehouse_id,
        material_id,
        quantity: dec(qty),
        reserved_quantity: dec(reserved),
        last_updated: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    /// Garbage quantity or price input degrades to zero, never NaN
    #[test]
    fn test_total_survives_unparsable_input() {
        let mut draft = DocumentDraft::new(DocumentKind::Receipt);
        draft.lines[0].qty = "not a number".to_string();
        draft.lines[0].unit_price = "3.50".to_string();
        assert_eq!(draft.compute_total(), Decimal::ZERO);

        draft.lines[0].qty = "2".to_string();
        assert_eq!(draft.compute_total(), dec("7.00"));
    }

    /// Availability is quantity minus reservations, summed per pair
    #[test]
    fn test_availability_subtracts_reservations() {
        let index = AvailabilityIndex::from_stock(&[
            stock(1, 10, "50", "8"),
            stock(1, 10, "20", "2"), // second row for the same pair
            stock(2, 10, "5", "5"),
        ]);
        assert_eq!(index.available(1, 10), Some(dec("60")));
        assert_eq!(index.available(2, 10), Some(dec("0")));
        assert_eq!(index.available(3, 10), None);
        assert_eq!(index.warehouses_with_available(10), vec![1]);
    }

    /// Switching an issue's warehouse clears a material that is not
    /// available there, and resets its price
    #[test]
    fn test_issue_warehouse_switch_clears_unavailable_material() {
        let materials = vec![material(10, "4.00")];
        let index = AvailabilityIndex::from_stock(&[stock(1, 10, "50", "0")]);

        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.set_line_field(0, LinePatch::warehouse("1"), &materials, &index);
        draft.set_line_field(0, LinePatch::material("10"), &materials, &index);
        assert_eq!(draft.lines[0].unit_price, "4.00");

        draft.set_line_field(0, LinePatch::warehouse("2"), &materials, &index);
        assert_eq!(draft.lines[0].material_id, "");
        assert_eq!(draft.lines[0].unit_price, "0");
    }

    /// A receipt keeps its material when the warehouse changes
    #[test]
    fn test_receipt_warehouse_switch_keeps_material() {
        let materials = vec![material(10, "4.00")];
        let index = AvailabilityIndex::from_stock(&[stock(1, 10, "50", "0")]);

        let mut draft = DocumentDraft::new(DocumentKind::Receipt);
        draft.set_line_field(0, LinePatch::material("10"), &materials, &index);
        draft.set_line_field(0, LinePatch::warehouse("2"), &materials, &index);
        assert_eq!(draft.lines[0].material_id, "10");
    }

    /// Choosing a material with exactly one stocked warehouse fills the
    /// warehouse in
    #[test]
    fn test_sole_warehouse_auto_selected() {
        let materials = vec![material(10, "4.00")];
        let index = AvailabilityIndex::from_stock(&[stock(3, 10, "9", "0")]);

        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.set_line_field(0, LinePatch::material("10"), &materials, &index);
        assert_eq!(draft.lines[0].warehouse_id, "3");
    }

    /// Issue selectors keep the current selection even at zero
    /// availability, so it cannot vanish from its own dropdown
    #[test]
    fn test_current_selection_stays_listed() {
        let materials = vec![material(10, "4.00"), material(11, "1.00")];
        let index = AvailabilityIndex::from_stock(&[
            stock(1, 10, "5", "5"), // fully reserved
            stock(1, 11, "7", "0"),
        ]);

        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.lines[0].warehouse_id = "1".to_string();
        draft.lines[0].material_id = "10".to_string();

        let options = draft.selectable_materials(0, &materials, &index);
        let ids: Vec<i64> = options.iter().map(|o| o.material.id).collect();
        assert!(ids.contains(&10));
        assert!(ids.contains(&11));
    }

    /// A selection that no longer resolves in the reference data drops
    /// out of the selector but is never cleared from the line itself
    #[test]
    fn test_stale_selection_survives_outside_selector() {
        let materials = vec![material(11, "1.00")];
        let index = AvailabilityIndex::from_stock(&[stock(1, 11, "7", "0")]);

        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.set_field(DocumentField::Counterparty, "7");
        draft.lines[0].warehouse_id = "1".to_string();
        draft.lines[0].material_id = "999".to_string(); // deleted material

        let options = draft.selectable_materials(0, &materials, &index);
        assert!(options.iter().all(|o| o.material.id != 999));

        let payload = draft.build_payload().unwrap();
        assert_eq!(payload.items[0].material_id, 999);
    }

    /// Over-availability warns but does not block payload assembly
    #[test]
    fn test_over_availability_is_advisory() {
        let materials = vec![material(10, "4.00")];
        let index = AvailabilityIndex::from_stock(&[stock(1, 10, "3", "0")]);

        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.set_field(DocumentField::Counterparty, "7");
        draft.set_line_field(0, LinePatch::warehouse("1"), &materials, &index);
        draft.set_line_field(0, LinePatch::material("10"), &materials, &index);
        draft.set_line_field(0, LinePatch::qty("999"), &materials, &index);

        let warnings = draft.availability_warnings(&index);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].available, dec("3"));
        assert!(draft.build_payload().is_ok());
    }

    /// Untouched default lines are dropped; half-filled ones are errors
    #[test]
    fn test_blank_lines_dropped_incomplete_rejected() {
        let mut draft = DocumentDraft::new(DocumentKind::Receipt);
        draft.set_field(DocumentField::Counterparty, "7");
        draft.lines[0].material_id = "10".to_string();
        draft.lines[0].warehouse_id = "1".to_string();
        draft.add_line(); // stays blank

        let payload = draft.build_payload().unwrap();
        assert_eq!(payload.items.len(), 1);

        draft.lines[1].material_id = "11".to_string(); // no warehouse
        assert_eq!(draft.build_payload(), Err(DraftError::IncompleteLine(1)));
    }

    #[test]
    fn test_counterparty_required() {
        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.lines[0].material_id = "10".to_string();
        draft.lines[0].warehouse_id = "1".to_string();
        assert_eq!(draft.build_payload(), Err(DraftError::MissingClient));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The document total is the sum of the line totals, whatever the
    /// raw inputs hold
    #[test]
    fn prop_total_is_sum_of_line_totals(
        lines in prop::collection::vec(("[0-9]{0,4}", "[0-9]{0,3}(\\.[0-9]{1,2})?"), 1..6)
    ) {
        let mut draft = DocumentDraft::new(DocumentKind::Receipt);
        draft.lines.clear();
        for (qty, price) in &lines {
            draft.add_line();
            let index = draft.lines.len() - 1;
            draft.lines[index].qty = qty.clone();
            draft.lines[index].unit_price = price.clone();
        }

        let expected: Decimal = draft.lines.iter().map(|l| l.total()).sum();
        prop_assert_eq!(draft.compute_total(), expected);
    }

    /// Any byte soup in the numeric fields still yields a finite total
    #[test]
    fn prop_total_never_panics_on_garbage(qty in ".*", price in ".*") {
        let mut draft = DocumentDraft::new(DocumentKind::Issue);
        draft.lines[0].qty = qty;
        draft.lines[0].unit_price = price;
        let _ = draft.compute_total();
    }

    /// Availability sums every stock row for the same pair
    #[test]
    fn prop_availability_sums_rows(
        quantities in prop::collection::vec((1u32..1000, 0u32..100), 1..10)
    ) {
        let rows: Vec<StockRow> = quantities
            .iter()
            .map(|(q, r)| stock(1, 10, &q.to_string(), &r.min(q).to_string()))
            .collect();
        let expected: Decimal = quantities
            .iter()
            .map(|(q, r)| Decimal::from(*q) - Decimal::from((*r).min(*q)))
            .sum();

        let index = AvailabilityIndex::from_stock(&rows);
        prop_assert_eq!(index.available(1, 10), Some(expected));
    }
}
