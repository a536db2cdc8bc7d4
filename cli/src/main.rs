use clap::Parser;
use log::error;
use crate::args::Args;
use crate::commands::run;

mod args;
mod commands;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
