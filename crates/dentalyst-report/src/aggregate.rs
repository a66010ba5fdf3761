//! # Category Aggregation
//!
//! Groups a fetched set of expense records by category, producing
//! per-category totals and the underlying dated entries.
//!
//! ## Contract
//!
//! - Grouping is by category exactly. The `_id` wrapper object in the
//!   wire format is a holdover from the historical group key and carries
//!   only the category; totals are never split by month or year.
//! - Within a group, entries are sorted by date descending (newest
//!   first). The sort is stable, so records sharing a date keep their
//!   fetch order.
//! - Groups are sorted by category name ascending, case-sensitive
//!   lexicographic.
//! - `consultantName` appears on an entry only for the Consultants group.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dentalyst_core::{Category, Expense, ExpenseId};

/// The group key. Wraps the category to preserve the `{"_id": {"category":
/// ...}}` wire shape consumed by the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKey {
    pub category: Category,
}

/// One aggregated category: its total and its entries, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    #[serde(rename = "_id")]
    pub key: GroupKey,
    /// Sum of `amount` over the group's entries.
    pub total: f64,
    /// The underlying records, sorted by date descending.
    pub entries: Vec<GroupEntry>,
}

/// A single dated entry within a category group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntry {
    #[serde(rename = "_id")]
    pub id: ExpenseId,
    pub date: DateTime<Utc>,
    pub amount: f64,
    /// Present only in the Consultants group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultant_name: Option<String>,
}

/// Group expense records by category.
///
/// The caller supplies the records for the requested date range (the
/// store returns them date-ascending); this function never filters by
/// date itself. Pure — no side effects.
pub fn aggregate_by_category(records: &[Expense]) -> Vec<CategoryGroup> {
    let mut by_category: HashMap<Category, Vec<GroupEntry>> = HashMap::new();

    for record in records {
        let consultant_name = if record.category.requires_consultant_name() {
            record.consultant_name.clone()
        } else {
            None
        };
        by_category
            .entry(record.category)
            .or_default()
            .push(GroupEntry {
                id: record.id,
                date: record.date,
                amount: record.amount,
                consultant_name,
            });
    }

    let mut groups: Vec<CategoryGroup> = by_category
        .into_iter()
        .map(|(category, mut entries)| {
            // Stable: records sharing a date keep their fetch order.
            entries.sort_by(|a, b| b.date.cmp(&a.date));
            let total = entries.iter().map(|e| e.amount).sum();
            CategoryGroup {
                key: GroupKey { category },
                total,
                entries,
            }
        })
        .collect();

    groups.sort_by(|a, b| a.key.category.as_str().cmp(b.key.category.as_str()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dentalyst_core::NewExpense;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn expense(d: u32, category: Category, amount: f64) -> Expense {
        expense_named(d, category, amount, None)
    }

    fn expense_named(
        d: u32,
        category: Category,
        amount: f64,
        consultant: Option<&str>,
    ) -> Expense {
        let draft = NewExpense::new(
            day(d),
            category,
            amount,
            None,
            consultant.map(str::to_string),
        )
        .unwrap();
        Expense {
            id: ExpenseId::new(),
            date: draft.date,
            category: draft.category,
            amount: draft.amount,
            description: draft.description,
            consultant_name: draft.consultant_name,
            created_at: day(d),
            updated_at: day(d),
        }
    }

    #[test]
    fn test_groups_sorted_and_totalled() {
        // Two Assistant records and one E-Bill record; "Assistant" sorts
        // before "E-Bill".
        let records = vec![
            expense(1, Category::Assistant, 10.0),
            expense(5, Category::Assistant, 5.0),
            expense(3, Category::EBill, 7.0),
        ];
        let groups = aggregate_by_category(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.category, Category::Assistant);
        assert_eq!(groups[0].total, 15.0);
        assert_eq!(groups[1].key.category, Category::EBill);
        assert_eq!(groups[1].total, 7.0);

        // Entries newest first.
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[0].date, day(5));
        assert_eq!(groups[0].entries[1].date, day(1));
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(aggregate_by_category(&[]).is_empty());
    }

    #[test]
    fn test_alphabetical_is_case_sensitive_lexicographic() {
        // "Bio Medicals" < "Consultants" < "E-Bill" < "Gross Income"
        // < "Lab Materials" byte-wise.
        let records = vec![
            expense(1, Category::LabMaterials, 1.0),
            expense(1, Category::GrossIncome, 1.0),
            expense_named(1, Category::Consultants, 1.0, Some("Dr. Rao")),
            expense(1, Category::EBill, 1.0),
            expense(1, Category::BioMedicals, 1.0),
        ];
        let groups = aggregate_by_category(&records);
        let order: Vec<&str> = groups.iter().map(|g| g.key.category.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "Bio Medicals",
                "Consultants",
                "E-Bill",
                "Gross Income",
                "Lab Materials"
            ]
        );
    }

    #[test]
    fn test_consultant_name_only_in_consultants_group() {
        let records = vec![
            expense_named(2, Category::Consultants, 500.0, Some("Dr. Rao")),
            expense(2, Category::Rent, 300.0),
        ];
        let groups = aggregate_by_category(&records);

        let consultants = &groups[0];
        assert_eq!(consultants.key.category, Category::Consultants);
        assert_eq!(
            consultants.entries[0].consultant_name.as_deref(),
            Some("Dr. Rao")
        );

        let rent = &groups[1];
        assert!(rent.entries[0].consultant_name.is_none());
    }

    #[test]
    fn test_same_date_entries_keep_fetch_order() {
        let a = expense(4, Category::Water, 1.0);
        let b = expense(4, Category::Water, 2.0);
        let (id_a, id_b) = (a.id, b.id);
        let groups = aggregate_by_category(&[a, b]);
        assert_eq!(groups[0].entries[0].id, id_a);
        assert_eq!(groups[0].entries[1].id, id_b);
    }

    #[test]
    fn test_wire_shape() {
        let records = vec![expense_named(2, Category::Consultants, 500.0, Some("Dr. Rao"))];
        let groups = aggregate_by_category(&records);
        let json = serde_json::to_value(&groups).unwrap();

        assert_eq!(json[0]["_id"]["category"], "Consultants");
        assert_eq!(json[0]["total"], 500.0);
        assert_eq!(json[0]["entries"][0]["consultantName"], "Dr. Rao");
        assert!(json[0]["entries"][0].get("_id").is_some());
    }
}
