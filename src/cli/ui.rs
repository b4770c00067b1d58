use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Confirm };
use textwrap::wrap;

use crate::{
    ExpiryStanding,
    PrincipalId,
    PropertyDetails,
    PropertyId,
    RecoverableError,
    RegistryError,
    RegistryEvent,
    Standing,
};

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn term_width() -> usize {
    let width = Term::stdout().size().1 as usize;
    if width == 0 { 80 } else { width }
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = term_width();
    for line in text.lines() {
        for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
            println!("{}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Report a registry failure along with its recovery hint, if any
pub fn print_registry_error(error: &RegistryError) {
    print_error(&error.to_string());
    if let Some(hint) = error.recovery_strategy() {
        eprintln!("  {} {}", "hint:".dimmed(), hint);
    }
}

/// Ask for a yes/no confirmation, defaulting to no
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    Confirm::with_theme(&get_theme())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

/// Display a property record
pub fn display_property(id: PropertyId, details: &PropertyDetails, will_owners: &[PrincipalId]) {
    if details.is_vacant() {
        print_warning(&format!("Property {} does not exist or has been cleared", id));
        return;
    }

    print_header(&format!("Property {}", id));
    print_result("Name", &details.name);
    print_result("Kind", &details.kind);
    print_result("Location", &details.location);
    print_result("Price", &details.price.to_string());
    print_result("Value", &details.value.to_string());
    print_result("Owner", &details.owner.to_string());
    print_result("Beneficiary", &details.beneficiary.to_string());
    print_result("Expiry", &details.expiry.to_string());
    print_result("Last renewal", &details.last_renewal.to_string());
    let will_owners = if will_owners.is_empty() {
        "none".to_string()
    } else {
        will_owners
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    print_result("Will owners", &will_owners);

    if !details.description.is_empty() {
        println!("{}", "Description:".bold());
        print_text(&details.description);
    }
}

/// Display the derived standing of a property
pub fn display_standing(standing: &Standing) {
    let expiry = match standing.expiry {
        ExpiryStanding::Active => standing.expiry.to_string().green(),
        ExpiryStanding::ExpiresNow => standing.expiry.to_string().yellow(),
        ExpiryStanding::Expired => standing.expiry.to_string().red(),
    };
    println!("{}: {}", "Expiry".bold(), expiry);
    let eligible = if standing.auto_transfer_eligible {
        "eligible".yellow()
    } else {
        "not eligible".normal()
    };
    println!("{}: {}", "Auto-transfer".bold(), eligible);
    print_result("Evaluated at", &standing.evaluated_at.to_string());
}

/// Display a single journal entry
pub fn display_event(index: usize, event: &RegistryEvent) {
    println!("{:>4}. {}", index + 1, event.to_string().cyan());
}
