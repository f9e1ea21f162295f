use anyhow::Context;
use clap::Parser;
use clientmerge::{Capability, Config, Matcher};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

mod options {
    use std::path::PathBuf;

    #[derive(Debug, clap::Parser)]
    #[command(
        name = "clientmerge",
        about = "Unify the client export with the sales ledger into one client list with sales figures"
    )]
    pub struct Args {
        /// The sales ledger CSV export. Multi-row sales leave number, invoice, customer and vendor blank after their first row.
        #[clap(long, short = 's', default_value = "vendas.csv")]
        pub sales: PathBuf,
        /// The XML client export.
        #[clap(
            long,
            short = 'c',
            default_value = "Modelo Base de importação de Clientes Conta Azul.xml"
        )]
        pub clients: PathBuf,
        /// Where to write the unified JSON document to.
        #[clap(long, short = 'o', default_value = "unified_data.json")]
        pub output: PathBuf,
        /// A RON file to override column names, separators and the matching threshold with.
        #[clap(long)]
        pub config: Option<PathBuf>,
        /// Only attribute sales to clients whose name or legal name matches exactly.
        #[clap(long)]
        pub exact_only: bool,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = options::Args::parse();
    let Config {
        sales: sales_options,
        clients: client_options,
        matcher: matcher_options,
    } = args
        .config
        .as_deref()
        .map(|path| {
            Config::from_path(path)
                .with_context(|| format!("Could not load configuration from '{}'", path.display()))
        })
        .transpose()?
        .unwrap_or_default();

    info!("Unifying clients and sales");
    let sales = match read_optional(&args.sales, "sales ledger")? {
        Some(data) => clientmerge::read_sales(data.as_slice(), sales_options)
            .with_context(|| format!("Could not read sales from '{}'", args.sales.display()))?,
        None => Vec::new(),
    };
    info!("Read {} sale rows", sales.len());

    let clients = match read_optional(&args.clients, "client export")? {
        Some(data) => clientmerge::read_clients(data.as_slice(), client_options)
            .with_context(|| format!("Could not read clients from '{}'", args.clients.display()))?,
        None => Vec::new(),
    };
    info!("Read {} clients", clients.len());

    let capability = if args.exact_only {
        Capability::ExactOnly
    } else {
        Capability::detect()
    };
    let matcher = Matcher::new(capability, matcher_options);
    if !matcher.is_fuzzy() {
        info!("Approximate matching is off, customers are matched by exact name only");
    }

    let outcome = clientmerge::merge(clients, sales, &matcher);
    let stats = outcome.stats;
    info!(
        "Unified {} clients: {} customers matched exactly, {} approximately, {} added",
        outcome.clients.len(),
        stats.exact_matches,
        stats.fuzzy_matches,
        stats.synthesized
    );

    let out = std::fs::File::create(&args.output)
        .with_context(|| format!("Could not create output file at '{}'", args.output.display()))?;
    let mut out = std::io::BufWriter::new(out);
    outcome.write_json(&mut out)?;
    out.flush()
        .with_context(|| format!("Could not write output file at '{}'", args.output.display()))?;
    info!("Wrote unified data to '{}'", args.output.display());
    Ok(())
}

/// Read the whole file at `path`, or return `None` if there is no such file.
fn read_optional(path: &Path, kind: &str) -> anyhow::Result<Option<Vec<u8>>> {
    if !path.exists() {
        warn!("No {kind} found at '{}', continuing without it", path.display());
        return Ok(None);
    }
    std::fs::read(path)
        .map(Some)
        .with_context(|| format!("Could not read {kind} at '{}'", path.display()))
}
