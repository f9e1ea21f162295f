use crate::{normalize_key, ClientRecord, Field};
use std::collections::{BTreeSet, HashMap};

/// Lookup of clients by their [normalized](normalize_key) display name and legal name.
///
/// Clients whose names normalize to the same key shadow each other, the last one wins.
pub struct IdentityIndex<'a> {
    by_name: HashMap<String, &'a ClientRecord>,
    by_legal_name: HashMap<String, &'a ClientRecord>,
}

impl<'a> IdentityIndex<'a> {
    pub fn new(clients: impl IntoIterator<Item = &'a ClientRecord>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_legal_name = HashMap::new();
        for client in clients {
            for (field, map) in [
                (Field::Name, &mut by_name),
                (Field::LegalName, &mut by_legal_name),
            ] {
                let key = normalize_key(client.get(field).unwrap_or_default());
                if !key.is_empty() {
                    map.insert(key, client);
                }
            }
        }
        IdentityIndex {
            by_name,
            by_legal_name,
        }
    }

    /// Find the client whose display name, or failing that, legal name normalizes to `key`.
    pub fn lookup_exact(&self, key: &str) -> Option<&'a ClientRecord> {
        self.by_name
            .get(key)
            .or_else(|| self.by_legal_name.get(key))
            .copied()
    }

    /// All keys known to [`lookup_exact()`](Self::lookup_exact()), in ascending order.
    pub fn all_known_identity_strings(&self) -> BTreeSet<&str> {
        self.by_name
            .keys()
            .chain(self.by_legal_name.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_legal_name.is_empty()
    }
}
