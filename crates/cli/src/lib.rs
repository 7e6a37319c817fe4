pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clearance_core::config::{AppConfig, LoadOptions};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(
    name = "clearance",
    about = "Clearance pricing operator CLI",
    long_about = "Manage clearance settings and per-product clearance prices, and evaluate cart, display and label pricing against the stored configuration.",
    after_help = "Examples:\n  clearance migrate\n  clearance settings save --enabled --override-simple --from-date 2026-11-27 --to-date 2026-11-30\n  clearance price set 1042 19.99\n  clearance quote --product 1042 --regular-price 29.99"
)]
pub struct Cli {
    #[arg(long = "config", global = true, help = "Path to a clearance.toml config file")]
    config_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(subcommand, about = "Show or save the clearance settings form")]
    Settings(SettingsCommand),
    #[command(about = "Delete all clearance settings (per-product prices are kept)")]
    Uninstall,
    #[command(subcommand, about = "Edit or inspect the clearance price of a product or variation")]
    Price(PriceCommand),
    #[command(about = "Resolve the effective price of a single line item")]
    Quote {
        #[arg(long)]
        product: String,
        #[arg(long)]
        variation: Option<String>,
        #[arg(long)]
        regular_price: Decimal,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[command(flatten)]
        day: DayArg,
    },
    #[command(about = "Apply clearance prices to a JSON cart file (`-` reads stdin)")]
    Cart {
        file: PathBuf,
        #[command(flatten)]
        day: DayArg,
    },
    #[command(about = "Render the storefront price HTML for a product")]
    Display {
        #[command(flatten)]
        product: ProductArgs,
        #[arg(long, help = "Default price HTML produced by the storefront")]
        html: String,
        #[command(flatten)]
        day: DayArg,
    },
    #[command(about = "Choose the sale label for a product")]
    Label {
        #[command(flatten)]
        product: ProductArgs,
        #[arg(long, help = "Default label; falls back to storefront.default_sale_label")]
        label: Option<String>,
        #[command(flatten)]
        day: DayArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    #[command(about = "Print the stored clearance settings")]
    Show,
    #[command(about = "Submit the settings form; omitted checkboxes are saved as unchecked")]
    Save(SettingsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub enabled: bool,
    #[arg(long)]
    pub override_simple: bool,
    #[arg(long)]
    pub override_variable: bool,
    #[arg(long, default_value = "")]
    pub from_date: String,
    #[arg(long, default_value = "")]
    pub to_date: String,
}

#[derive(Debug, Subcommand)]
pub enum PriceCommand {
    #[command(about = "Store a clearance price; an empty value clears it")]
    Set { entity_id: String, value: String },
    #[command(about = "Print the stored clearance price")]
    Get { entity_id: String },
    #[command(about = "Print the admin listing column text")]
    Column { entity_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Simple,
    Variable,
    Other,
}

#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub product: String,
    #[arg(long, value_enum, default_value_t = KindArg::Simple)]
    pub kind: KindArg,
    #[arg(long = "variation", help = "Variation id of a variable product (repeatable)")]
    pub variations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct DayArg {
    #[arg(long, help = "Evaluate as of this store-local day (YYYY-MM-DD); defaults to today")]
    pub date: Option<NaiveDate>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { config_path: cli.config_path.clone(), ..LoadOptions::default() };

    if let Ok(config) = AppConfig::load(options.clone()) {
        logging::init(&config.logging);
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(&options),
        },
        Command::Settings(SettingsCommand::Show) => commands::settings::show(&options),
        Command::Settings(SettingsCommand::Save(args)) => commands::settings::save(&options, args),
        Command::Uninstall => commands::settings::uninstall(&options),
        Command::Price(PriceCommand::Set { entity_id, value }) => {
            commands::price::set(&options, &entity_id, &value)
        }
        Command::Price(PriceCommand::Get { entity_id }) => commands::price::get(&options, &entity_id),
        Command::Price(PriceCommand::Column { entity_id }) => {
            commands::price::column(&options, &entity_id)
        }
        Command::Quote { product, variation, regular_price, quantity, day } => {
            commands::evaluate::quote(
                &options,
                commands::evaluate::QuoteRequest {
                    product,
                    variation,
                    regular_price,
                    quantity,
                    date: day.date,
                },
            )
        }
        Command::Cart { file, day } => commands::evaluate::cart(&options, &file, day.date),
        Command::Display { product, html, day } => {
            commands::evaluate::display(&options, &product, &html, day.date)
        }
        Command::Label { product, label, day } => {
            commands::evaluate::label(&options, &product, label.as_deref(), day.date)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
