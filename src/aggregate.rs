use crate::{normalize_key, parse_date, SaleRecord};
use std::collections::HashMap;

/// All sales of one ledger customer, along with their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesGroup {
    /// The [normalized](normalize_key) customer name shared by all sales of the group.
    pub customer_key: String,
    /// The customer name as spelled by the last sale of the group.
    pub customer_name: String,
    /// Positions of the group's sales in the ledger, ascending.
    pub sales: Vec<usize>,
    pub total_net: f64,
    pub earliest_date: Option<time::Date>,
    pub latest_date: Option<time::Date>,
}

impl SalesGroup {
    pub fn count(&self) -> usize {
        self.sales.len()
    }
}

/// Group `sales` by normalized customer name, in order of first appearance.
///
/// Sales without a readable date count towards the total but not the date range.
pub fn group_sales(sales: &[SaleRecord]) -> Vec<SalesGroup> {
    let mut groups = Vec::<SalesGroup>::new();
    let mut group_by_key = HashMap::<String, usize>::new();
    for (position, sale) in sales.iter().enumerate() {
        let key = normalize_key(&sale.customer_name);
        if key.is_empty() {
            continue;
        }
        let group_idx = *group_by_key.entry(key.clone()).or_insert_with(|| {
            groups.push(SalesGroup {
                customer_key: key,
                customer_name: String::new(),
                sales: Vec::new(),
                total_net: 0.0,
                earliest_date: None,
                latest_date: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[group_idx];
        group.customer_name.clone_from(&sale.customer_name);
        group.sales.push(position);
        group.total_net += sale.net_amount;
        if let Some(date) = parse_date(&sale.sale_date) {
            group.earliest_date = Some(group.earliest_date.map_or(date, |d| d.min(date)));
            group.latest_date = Some(group.latest_date.map_or(date, |d| d.max(date)));
        }
    }
    groups
}
