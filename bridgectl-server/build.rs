//! Build script for bridgectl-server.
//!
//! Renders the `bridgectl.1` man page into `OUT_DIR` with clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the argument
//! list is declared again here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Mirror of the parser in src/cli.rs. Keep the two in sync.
fn build_cli() -> Command {
    Command::new("bridgectl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hand out free TCP ports over HTTP")
        .long_about(
            "Serves GET /api/request and answers with the first free TCP port at or above 10000",
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .help("Address the HTTP server listens on")
                .value_name("ADDR")
                .default_value("0.0.0.0:5480")
                .env("BRIDGECTL_LISTEN"),
        )
        .arg(
            Arg::new("check-command")
                .long("check-command")
                .help("Program that decides whether a port is occupied")
                .value_name("PROGRAM"),
        )
        .arg(
            Arg::new("check-arg")
                .long("check-arg")
                .help("Argument passed to the check program before the port")
                .value_name("ARG")
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("create man directory");

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("render man page");

    fs::write(man_dir.join("bridgectl.1"), buffer).expect("write man page");

    println!("cargo:rerun-if-changed=src/cli.rs");
}
