use anyhow::Result;
use clap::Parser;
use macvendor::{Registry, Vendor};
use tracing::error;

/// macvendor — resolve MAC addresses to their registered vendor.
#[derive(Parser, Debug)]
#[command(name = "macvendor", version, about)]
struct Cli {
    /// MAC addresses (colon or hyphen separated).
    #[arg(required = true)]
    addresses: Vec<String>,

    /// Print each result as a JSON object.
    #[arg(long)]
    json: bool,
}

fn print_vendor(vendor: &Vendor) {
    println!("OUI: {}", vendor.oui);
    println!("AssignmentBlockSize: {}", vendor.assignment_block_size);
    println!("IsPrivate: {}", vendor.is_private);
    println!("CompanyName: {}", vendor.company_name);
    println!("LastUpdate: {}", vendor.last_update);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macvendor=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::embedded();

    let mut failed = 0usize;
    for (i, address) in cli.addresses.iter().enumerate() {
        match registry.lookup(address) {
            Ok(vendor) if cli.json => println!("{}", serde_json::to_string(&vendor)?),
            Ok(vendor) => {
                if i > 0 {
                    println!();
                }
                print_vendor(&vendor);
            }
            Err(e) => {
                error!(address = %address, "{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} lookups failed", cli.addresses.len());
    }
    Ok(())
}
