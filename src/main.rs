use anyhow::Result;
use clap::Parser;
use log::debug;

use estate::cli::commands::property::{ AddArgs, Field };
use estate::cli::commands::{ events, property, succession, will, CommandContext };
use estate::cli::{ self, Commands, EstateCli };
use estate::{ PropertyId, RegistryError };

fn main() {
    // Parse the command line arguments
    let cli = EstateCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        match e.downcast_ref::<RegistryError>() {
            Some(registry_error) => cli::ui::print_registry_error(registry_error),
            None => cli::ui::print_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

fn run(cli: EstateCli) -> Result<()> {
    // Pick up ESTATE_* overrides from a .env file if there is one
    if let Err(e) = dotenv::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let config = cli.resolve_config(|key| std::env::var(key).ok())?;
    let ctx = CommandContext::open(&config, cli.clock()?, cli.caller.clone(), cli.format()?)?;

    match &cli.command {
        Commands::Add { name, kind, price, value, location, description, expiry, beneficiary } => {
            property::add(&ctx, AddArgs {
                name,
                kind,
                price: *price,
                value: *value,
                location,
                description,
                expiry,
                beneficiary,
            })
        }
        Commands::Show { id } => property::show(&ctx, PropertyId(*id)),
        Commands::Value { id } => property::value(&ctx, PropertyId(*id)),
        Commands::List { owner } => property::list(&ctx, owner.as_ref()),
        Commands::Transfer { id, to } => property::transfer(&ctx, PropertyId(*id), to),
        Commands::Expire { id } => property::expire(&ctx, PropertyId(*id)),
        Commands::Delete { id, yes } => property::delete(&ctx, PropertyId(*id), *yes),
        Commands::Will { action } => will::execute(&ctx, action),
        Commands::Bequeath { id } => succession::bequeath(&ctx, PropertyId(*id)),
        Commands::AutoTransfer { id } => succession::auto_transfer(&ctx, PropertyId(*id)),
        Commands::Status { id } => succession::status(&ctx, PropertyId(*id)),
        Commands::SetExpiry { id, expiry } => succession::set_expiry(&ctx, PropertyId(*id), expiry),
        Commands::Renew { id, at } => succession::renew(&ctx, PropertyId(*id), at.as_deref()),
        Commands::SetBeneficiary { id, beneficiary, expiry } => {
            succession::set_beneficiary(&ctx, PropertyId(*id), beneficiary, expiry)
        }
        Commands::SetPrice { id, price, value } => {
            property::update_field(&ctx, PropertyId(*id), Field::PriceAndValue(*price, *value))
        }
        Commands::SetLocation { id, location } => {
            property::update_field(&ctx, PropertyId(*id), Field::Location(location))
        }
        Commands::SetDescription { id, description } => {
            property::update_field(&ctx, PropertyId(*id), Field::Description(description))
        }
        Commands::SetKind { id, kind } => property::update_field(&ctx, PropertyId(*id), Field::Kind(kind)),
        Commands::SetName { id, name } => property::update_field(&ctx, PropertyId(*id), Field::Name(name)),
        Commands::Events { id } => events::execute(&ctx, id.map(PropertyId)),
    }
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new().filter_level(level).init();

    debug!("Logger initialized with level: {}", log_level);
}
