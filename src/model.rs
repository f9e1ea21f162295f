//! The records flowing through the merge: ledger sales and export clients.
use std::collections::BTreeMap;

/// A single row of the sales ledger after continuation values have been applied.
///
/// The serialized field names are those of the `sales_history` section of the output document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SaleRecord {
    #[serde(rename = "numero_venda")]
    pub sale_number: Option<String>,
    #[serde(rename = "nf")]
    pub invoice_number: Option<String>,
    /// The customer as spelled in the ledger, never empty.
    #[serde(rename = "cliente")]
    pub customer_name: String,
    #[serde(rename = "vendedor")]
    pub vendor_name: Option<String>,
    /// The raw `day/month/year` text, which may be empty or malformed.
    #[serde(rename = "data")]
    pub sale_date: String,
    #[serde(rename = "valor_bruto")]
    pub gross_amount: f64,
    #[serde(rename = "valor_liquido")]
    pub net_amount: f64,
    #[serde(rename = "matched_name")]
    pub(crate) matched_client_name: Option<String>,
}

impl SaleRecord {
    /// A sale without sale number, invoice or vendor, not yet attributed to a client.
    pub fn new(
        customer_name: impl Into<String>,
        sale_date: impl Into<String>,
        gross_amount: f64,
        net_amount: f64,
    ) -> Self {
        SaleRecord {
            sale_number: None,
            invoice_number: None,
            customer_name: customer_name.into(),
            vendor_name: None,
            sale_date: sale_date.into(),
            gross_amount,
            net_amount,
            matched_client_name: None,
        }
    }

    /// The display name of the client this sale was attributed to, once merged.
    pub fn matched_client_name(&self) -> Option<&str> {
        self.matched_client_name.as_deref()
    }

    pub(crate) fn stamp(&mut self, client_name: &str) {
        debug_assert!(
            self.matched_client_name.is_none(),
            "a sale is attributed to a client only once"
        );
        self.matched_client_name = Some(client_name.to_owned());
    }
}

/// The client fields the merge reads or writes. All others pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The display name, which is also the key of the merged collection.
    Name,
    /// The legal or company name.
    LegalName,
    Cnpj,
    Cpf,
    Email,
    Phone,
    Status,
    CreationDate,
}

impl Field {
    /// The field name as used by the client export.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "Nome",
            Field::LegalName => "RazaoSocial",
            Field::Cnpj => "CNPJ",
            Field::Cpf => "CPF",
            Field::Email => "Emailprincipal",
            Field::Phone => "TelefonePrincipal",
            Field::Status => "Status",
            Field::CreationDate => "DataCriacao",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Active,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "ativado",
        }
    }
}

/// The sales figures attached to a client by the merge.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SalesSummary {
    /// Sum of the net amount of all attributed sales.
    #[serde(rename = "TotalVendas")]
    pub total_sales_amount: f64,
    /// `DD/MM/YYYY`, or empty if none of the sales had a readable date.
    #[serde(rename = "DataUltimaVenda")]
    pub last_sale_date: String,
    #[serde(rename = "SalesCount")]
    pub sales_count: usize,
}

impl SalesSummary {
    const FIELD_NAMES: [&'static str; 3] = ["TotalVendas", "DataUltimaVenda", "SalesCount"];
}

/// A client as a bag of named string fields, with typed access to the [fields](Field) we know about
/// and an optional [`SalesSummary`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ClientRecord {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    #[serde(flatten)]
    sales: Option<SalesSummary>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClientRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ClientRecord {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            sales: None,
        }
    }
}

impl ClientRecord {
    /// A client created for ledger customers without counterpart in the export.
    pub fn synthesize(name: &str, creation_date: String, summary: SalesSummary) -> Self {
        let mut client = ClientRecord::default();
        client.set(Field::Name, name);
        client.set(Field::Status, ClientStatus::Active.as_str());
        client.set(Field::CreationDate, creation_date);
        for field in [Field::Cnpj, Field::Cpf, Field::Email, Field::Phone] {
            client.set(field, "");
        }
        client.enrich(summary);
        client
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.get_raw(field.as_str())
    }

    /// Access any field by the name it has in the export.
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.insert_raw(field.as_str(), value);
    }

    pub fn insert_raw(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The name this client is known by, empty if the export didn't provide one.
    pub fn display_name(&self) -> &str {
        self.get(Field::Name).unwrap_or_default()
    }

    pub fn legal_name(&self) -> Option<&str> {
        self.get(Field::LegalName)
    }

    pub fn sales(&self) -> Option<&SalesSummary> {
        self.sales.as_ref()
    }

    /// Attach `summary`, replacing a previous one along with any source fields of the same name.
    pub fn enrich(&mut self, summary: SalesSummary) {
        for name in SalesSummary::FIELD_NAMES {
            self.fields.remove(name);
        }
        self.sales = Some(summary);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
