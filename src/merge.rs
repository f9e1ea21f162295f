use crate::{ClientRecord, SaleRecord};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not write the unified client and sales data")]
    Write(#[from] serde_json::Error),
}

/// How the ledger customers were resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// The amount of distinct customers in the ledger.
    pub groups: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    /// The amount of clients created for customers that couldn't be resolved.
    pub synthesized: usize,
}

/// The unified data, serialized as the output document.
#[derive(Debug, serde::Serialize)]
pub struct Outcome {
    /// All clients, ordered by display name.
    pub clients: Vec<ClientRecord>,
    /// All sales in ledger order, each attributed to a client.
    pub sales_history: Vec<SaleRecord>,
    #[serde(skip)]
    pub stats: Stats,
}

impl Outcome {
    pub fn client(&self, display_name: &str) -> Option<&ClientRecord> {
        self.clients
            .iter()
            .find(|client| client.display_name() == display_name)
    }

    /// Write this instance as pretty-printed JSON document to `out`.
    pub fn write_json(&self, out: impl std::io::Write) -> Result<(), Error> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }
}

pub(crate) mod function {
    use crate::matcher::MatchKind;
    use crate::merge::{Outcome, Stats};
    use crate::{format_date, group_sales, ClientRecord, IdentityIndex, Matcher, SaleRecord, SalesSummary};
    use std::collections::BTreeMap;

    /// Attribute each sale to a client, enriching clients with the figures of their sales and
    /// creating clients for customers that `matcher` can't resolve.
    ///
    /// A client's figures are replaced, not accumulated, if more than one customer resolves to it.
    /// Clients sharing a display name collapse into the last one.
    pub fn merge(clients: Vec<ClientRecord>, mut sales: Vec<SaleRecord>, matcher: &Matcher) -> Outcome {
        let groups = group_sales(&sales);
        let mut stats = Stats {
            groups: groups.len(),
            ..Default::default()
        };

        let targets: Vec<Option<String>> = {
            let index = IdentityIndex::new(&clients);
            groups
                .iter()
                .map(|group| {
                    let found = matcher.resolve(&group.customer_key, &index)?;
                    match found.kind {
                        MatchKind::Exact => stats.exact_matches += 1,
                        MatchKind::Fuzzy { .. } => stats.fuzzy_matches += 1,
                    }
                    Some(found.client.display_name().to_owned())
                })
                .collect()
        };

        let mut merged: BTreeMap<String, ClientRecord> = clients
            .into_iter()
            .map(|client| (client.display_name().to_owned(), client))
            .collect();
        for (group, target) in groups.iter().zip(targets) {
            let summary = SalesSummary {
                total_sales_amount: group.total_net,
                last_sale_date: group.latest_date.map(format_date).unwrap_or_default(),
                sales_count: group.count(),
            };
            let client_name = match target {
                Some(name) => {
                    if let Some(client) = merged.get_mut(&name) {
                        client.enrich(summary);
                    }
                    name
                }
                None => {
                    log::debug!("No client found for '{}', adding it", group.customer_name);
                    stats.synthesized += 1;
                    let creation_date = group.earliest_date.map(format_date).unwrap_or_default();
                    merged.insert(
                        group.customer_name.clone(),
                        ClientRecord::synthesize(&group.customer_name, creation_date, summary),
                    );
                    group.customer_name.clone()
                }
            };
            for &position in &group.sales {
                sales[position].stamp(&client_name);
            }
        }

        Outcome {
            clients: merged.into_values().collect(),
            sales_history: sales,
            stats,
        }
    }
}
