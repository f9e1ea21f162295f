#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot use '{0}' as delimiter")]
    InvalidDelimiter(char),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("A {kind} column named '{name}' could not be found in first line of CSV file")]
    MissingColumn { name: String, kind: &'static str },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    pub delimiter: char,
    pub sale_number_column: String,
    pub invoice_column: String,
    pub customer_column: String,
    pub vendor_column: String,
    pub date_column: String,
    pub gross_amount_column: String,
    pub net_amount_column: String,
    /// Rows carrying this text as customer or sale number are the ledger's summary lines.
    pub grand_total_marker: String,
    /// Separator for use with amount parsing.
    pub thousands_separator: char,
    /// Separator for use with amount parsing.
    pub decimal_separator: char,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            delimiter: ',',
            sale_number_column: "Número da venda".into(),
            invoice_column: "Nota fiscal/RPS".into(),
            customer_column: "Cliente".into(),
            vendor_column: "Vendedor".into(),
            date_column: "Data da venda".into(),
            gross_amount_column: "Valor bruto".into(),
            net_amount_column: "Valor líquido".into(),
            grand_total_marker: "Total geral".into(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

pub(crate) mod function {
    use crate::sales::{Error, Options};
    use crate::{parse_amount_with, SaleRecord};

    /// Read all sales from the ledger CSV in `csv_data`, in order.
    ///
    /// A sale spanning multiple rows only names its number, invoice, customer and vendor on
    /// the first one, so blank cells in these columns inherit the last value seen above them.
    pub fn read_sales(
        csv_data: impl std::io::Read,
        Options {
            delimiter,
            sale_number_column,
            invoice_column,
            customer_column,
            vendor_column,
            date_column,
            gross_amount_column,
            net_amount_column,
            grand_total_marker,
            thousands_separator,
            decimal_separator,
        }: Options,
    ) -> Result<Vec<SaleRecord>, Error> {
        let delimiter: u8 = delimiter
            .try_into()
            .map_err(|_| Error::InvalidDelimiter(delimiter))?;
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data);
        let headers = csv.headers()?.clone();
        let columns = Columns {
            sale_number: header_idx(&sale_number_column, &headers, "sale number")?,
            invoice: header_idx(&invoice_column, &headers, "invoice")?,
            customer: header_idx(&customer_column, &headers, "customer")?,
            vendor: header_idx(&vendor_column, &headers, "vendor")?,
            date: header_idx(&date_column, &headers, "date")?,
            gross_amount: header_idx(&gross_amount_column, &headers, "gross amount")?,
            net_amount: header_idx(&net_amount_column, &headers, "net amount")?,
        };

        let mut sales = Vec::new();
        let mut continuation = Continuation::default();
        let mut skipped = 0_usize;
        for record in csv.records() {
            let record = record?;
            let cell = |index: usize| record.get(index).unwrap_or_default();
            continuation.advance(
                cell(columns.sale_number),
                cell(columns.invoice),
                cell(columns.customer),
                cell(columns.vendor),
            );

            let customer_name = match &continuation.customer_name {
                Some(name)
                    if !name.contains(grand_total_marker.as_str())
                        && cell(columns.sale_number) != grand_total_marker =>
                {
                    name.clone()
                }
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            sales.push(SaleRecord {
                sale_number: continuation.sale_number.clone(),
                invoice_number: continuation.invoice_number.clone(),
                vendor_name: continuation.vendor_name.clone(),
                ..SaleRecord::new(
                    customer_name,
                    cell(columns.date),
                    parse_amount_with(
                        cell(columns.gross_amount),
                        thousands_separator,
                        decimal_separator,
                    ),
                    parse_amount_with(
                        cell(columns.net_amount),
                        thousands_separator,
                        decimal_separator,
                    ),
                )
            });
        }
        if skipped > 0 {
            log::debug!("Skipped {skipped} ledger rows without customer or with grand totals");
        }
        Ok(sales)
    }

    struct Columns {
        sale_number: usize,
        invoice: usize,
        customer: usize,
        vendor: usize,
        date: usize,
        gross_amount: usize,
        net_amount: usize,
    }

    /// The values a row inherits from the rows above it if its own cells are blank.
    #[derive(Default)]
    struct Continuation {
        sale_number: Option<String>,
        invoice_number: Option<String>,
        customer_name: Option<String>,
        vendor_name: Option<String>,
    }

    impl Continuation {
        fn advance(&mut self, sale_number: &str, invoice_number: &str, customer: &str, vendor: &str) {
            carry(&mut self.sale_number, sale_number);
            carry(&mut self.invoice_number, invoice_number);
            carry(&mut self.customer_name, customer);
            carry(&mut self.vendor_name, vendor);
        }
    }

    fn carry(value: &mut Option<String>, cell: &str) {
        let cell = cell.trim();
        if !cell.is_empty() {
            *value = Some(cell.to_owned());
        }
    }

    /// Return the position of `name` in `headers`, ignoring a byte-order mark in front of the first one.
    fn header_idx(name: &str, headers: &csv::StringRecord, kind: &'static str) -> Result<usize, Error> {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_owned(),
                kind,
            })
    }
}
