//! Campus Rentals CLI
//!
//! Fee quotes and catalog matching from the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- quote 1500 12 > quote.csv
//! cargo run -- match catalog.csv "need a scientific calculator" 20 > matches.csv
//! cargo run -- match - "clrs algorithms book"
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use campus_rentals::{
    match_request, Amount, Catalog, Error, FeeSchedule, ItemRequest, Result, UserHistory,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;
use std::str::FromStr;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(Error::MissingArgument("command"))?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    match command.as_str() {
        "quote" => quote(&args[1..], handle),
        "match" => match_catalog(&args[1..], handle),
        other => Err(Error::UnknownCommand(other.to_string())),
    }
}

fn quote<W: Write>(args: &[String], out: W) -> Result<()> {
    let raw_amount = args.first().ok_or(Error::MissingArgument("amount"))?;
    let schedule = FeeSchedule::default();

    let amount = Amount::from_str(raw_amount)
        .ok()
        .filter(|a| schedule.validate(*a))
        .ok_or_else(|| Error::InvalidAmount(raw_amount.clone()))?;

    let history = match args.get(1) {
        Some(raw) => Some(UserHistory {
            completed_rentals: raw.parse().map_err(|_| Error::InvalidArgument {
                name: "completed_rentals",
                value: raw.clone(),
            })?,
            ..UserHistory::default()
        }),
        None => None,
    };

    let calc = schedule.calculate(amount, history.as_ref());

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "rental_amount",
        "commission_rate",
        "commission_fee",
        "vendor_amount",
        "minimum_fee_applied",
        "maximum_fee_capped",
    ])?;
    writer.write_record([
        calc.rental_amount.to_string(),
        calc.commission_rate.to_string(),
        calc.commission_fee.to_string(),
        calc.vendor_amount.to_string(),
        calc.breakdown.minimum_fee_applied.to_string(),
        calc.breakdown.maximum_fee_capped.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

fn match_catalog<W: Write>(args: &[String], out: W) -> Result<()> {
    let catalog_path = args.first().ok_or(Error::MissingArgument("catalog"))?;
    let text = args.get(1).ok_or(Error::MissingArgument("request"))?;

    let catalog = if catalog_path == "-" {
        Catalog::campus()
    } else {
        Catalog::from_csv(BufReader::new(File::open(catalog_path)?))?
    };

    let mut request = ItemRequest::new(text.as_str());
    if let Some(raw) = args.get(2) {
        let budget = Amount::from_str(raw)
            .ok()
            .filter(Amount::is_positive)
            .ok_or_else(|| Error::InvalidArgument {
                name: "budget",
                value: raw.clone(),
            })?;
        request = request.with_budget(budget);
    }

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["id", "title", "score"])?;
    for scored in match_request(&request, &catalog) {
        writer.write_record([
            scored.item.id.as_str(),
            scored.item.title.as_str(),
            scored.score.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
