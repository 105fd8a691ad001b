use clap::Parser;

use vedconv::cli;

fn main() {
    let args = cli::Args::parse();
    if let Err(err) = cli::run(args) {
        cli::show_error(&format!("{err:#}"));
        std::process::exit(2);
    }
}
