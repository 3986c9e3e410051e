//! Till command line interface

use std::{io, process::ExitCode};

use clap::Parser;
use till::{billing::BillingSystem, catalog::Catalog, cli::Session, config::Cli, logging};

#[expect(clippy::print_stderr, reason = "errors are reported on stderr before exiting")]
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{error}");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), String> {
    logging::init(&cli.logging).map_err(|error| error.to_string())?;

    let configured_currency = cli.pricing.currency().map_err(|error| error.to_string())?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_fixture_file(path)
            .map_err(|error| format!("failed to load catalog {}: {error}", path.display()))?,
        None => Catalog::sample(configured_currency),
    };

    let currency = catalog.currency().unwrap_or(configured_currency);

    if currency != configured_currency {
        tracing::info!(
            catalog = currency.iso_alpha_code,
            configured = configured_currency.iso_alpha_code,
            "using catalog currency"
        );
    }

    let policy = cli
        .pricing
        .policy(currency)
        .map_err(|error| error.to_string())?;

    let billing = BillingSystem::with_catalog(catalog, policy);

    Session::new(billing, io::stdin().lock(), io::stdout().lock())
        .with_sort(cli.receipt.sort)
        .with_style(cli.receipt.style)
        .run()
        .map_err(|error| error.to_string())
}
