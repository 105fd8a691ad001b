//! Command-line interface module

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::{style, Term};
use uuid::Uuid;

use crate::archive;
use crate::conversion::{ConversionConfig, StreamConverter};
use crate::encrypt::{Gpg, GpgConfig};

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "vedconv")]
#[command(about = "Convert a member data CSV file into an encrypted VED archive")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Company ID the documents are keyed under (UUID)
    #[arg(long)]
    pub company_id: String,

    /// Path to the partner data file in CSV format
    #[arg(long)]
    pub data_file: PathBuf,

    /// Path to the column type file (two CSV records: names, then types)
    #[arg(long)]
    pub type_file: PathBuf,

    /// Recipient the archive is encrypted for (repeatable)
    #[arg(long = "recipient")]
    pub recipients: Vec<String>,

    /// Public key file imported before encrypting (repeatable)
    #[arg(long = "key-file")]
    pub key_files: Vec<PathBuf>,

    /// GPG home directory used as the key store
    #[arg(long, default_value = ".vedconv/gpghome")]
    pub gpg_home: PathBuf,

    /// Stop after archiving, skip encryption
    #[arg(long)]
    pub skip_encryption: bool,

    /// Maximum number of row diagnostics before processing stops early
    #[arg(long, default_value_t = 100)]
    pub max_errors: usize,

    /// Disable the confirmation prompt before the run starts
    #[arg(long)]
    pub no_input: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,
}

/// Validate the company id command-line parameter as a UUID
pub fn validate_company_id(company_id: &str) -> bool {
    Uuid::parse_str(company_id).is_ok()
}

/// Run the full pipeline: convert, archive, encrypt
pub fn run(args: Args) -> Result<()> {
    if !args.quiet {
        print_options(&args);
    }
    if !args.no_input && !confirm("Are you sure?")? {
        bail!("Aborting.");
    }

    if !validate_company_id(&args.company_id) {
        bail!("Invalid format for company ID parameter, aborting");
    }
    if !args.skip_encryption && args.recipients.is_empty() {
        bail!("At least one --recipient is required (or pass --skip-encryption)");
    }

    // Key-store problems should surface before any conversion work.
    let gpg = if args.skip_encryption {
        None
    } else {
        Some(Gpg::init(GpgConfig {
            home_dir: args.gpg_home.clone(),
            recipients: args.recipients.clone(),
            key_files: args.key_files.clone(),
        })?)
    };

    let config = ConversionConfig::default().with_max_errors(args.max_errors);
    let converter = StreamConverter::new(config);
    let data = File::open(&args.data_file)
        .with_context(|| format!("Cannot open data file {}", args.data_file.display()))?;
    let types = File::open(&args.type_file)
        .with_context(|| format!("Cannot open type file {}", args.type_file.display()))?;
    let outcome = converter.convert(data, &args.data_file, types, &args.company_id);

    if !outcome.diagnostics.is_empty() {
        eprintln!("{}", style("Errors:").red());
        for diagnostic in &outcome.diagnostics {
            eprintln!("{diagnostic}");
        }
        bail!(
            "conversion failed with {} error(s)",
            outcome.diagnostics.len()
        );
    }
    let jpl_path = outcome
        .output_path
        .context("conversion reported success without an output path")?;
    show_success(&format!("{} lines written", outcome.rows_written), args.quiet);

    show_info("Archiving ...", args.quiet);
    let report =
        archive::compress(&jpl_path).context("Errors occurred during compression")?;
    show_success(
        &format!("{} archived to {}.", jpl_path.display(), report.path.display()),
        args.quiet,
    );
    show_info(
        &format!("Original file size: {} bytes.", report.original_size),
        args.quiet,
    );
    show_info(
        &format!("Compressed file size: {} bytes", report.compressed_size),
        args.quiet,
    );

    if let Some(gpg) = gpg {
        show_info("Encrypting ...", args.quiet);
        let ved_path = gpg.encrypt(&report.path)?;
        show_success(
            &format!(
                "{} encrypted to {}",
                report.path.display(),
                ved_path.display()
            ),
            args.quiet,
        );
    }

    Ok(())
}

/// Echo the resolved options so the user can review them before
/// confirming
fn print_options(args: &Args) {
    println!("\n{}", style("running with options:").bold());
    print_option("company-id", &args.company_id);
    print_option("data-file", &args.data_file.display().to_string());
    print_option("type-file", &args.type_file.display().to_string());
    print_option("recipients", &args.recipients.join(", "));
    print_option("gpg-home", &args.gpg_home.display().to_string());
    print_option("skip-encryption", &args.skip_encryption.to_string());
    print_option("max-errors", &args.max_errors.to_string());
    println!();
}

fn print_option(key: &str, value: &str) {
    println!("  {}: {}", key, style(value).white());
}

/// Yes/no confirmation on the terminal; anything but y/yes declines.
/// Without a terminal there is nobody to ask, so the answer is no -
/// non-interactive runs pass --no-input.
fn confirm(prompt: &str) -> io::Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }
    let term = Term::stderr();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Show a success message (if not in quiet mode)
pub fn show_success(message: &str, quiet: bool) {
    if !quiet {
        println!("✓ {message}");
    }
}

/// Show a progress message (if not in quiet mode)
pub fn show_info(message: &str, quiet: bool) {
    if !quiet {
        println!("{message}");
    }
}

/// Show an error message
pub fn show_error(message: &str) {
    eprintln!("✗ {}", style(message).red());
}
