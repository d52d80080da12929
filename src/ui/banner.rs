//! Console text: help, usage, copy reports and failure diagnostics.

use console::style;
use std::path::Path;

use super::icons::{CROSS, FILE_KEPT, FILE_NEW};
use crate::errors::DispatchError;
use crate::templates::CopyReport;

pub const BIN: &str = "nuxi-docker";

/// The full command reference printed by `nuxi-docker help`.
pub fn help_text() -> String {
    format!(
        "\
{bin} - a preconfigured docker environment to interact with nuxt projects with the nuxi cli

QUICK START
to add the docker setup to an existing project:
    {bin} install

to create a new project:
    {bin} init [directory]

to bring the containers up:
    {bin} up -d

to start the dev site:
    {bin} dev

add, analyze, build-module, cleanup, dev, devtools, generate, info, prepare, preview, typecheck,
and upgrade are proxied straight to nuxi in the app container:
    {bin} <COMMAND> [args]

nuxi-build (to avoid collision with docker compose build) runs nuxi build in the app container:
    {bin} nuxi-build [args]

nuxi, nuxt, node, npm, npx, yarn, pnpm, pnpx, bun, bunx are proxied to the binaries in the app container:
    {bin} <COMMAND> [args]

shell/bash initiates a terminal in the app container:
    {bin} shell

postgres proxies commands to the postgres container:
    {bin} postgres [args]

postgres shell/bash initiates a terminal in the postgres container:
    {bin} postgres shell

psql opens a postgres cli terminal in the postgres container:
    {bin} psql

help prints this message:
    {bin} help

anything else is proxied to docker compose",
        bin = BIN
    )
}

pub fn print_help() {
    println!("{}", help_text());
}

/// Printed when no command was given.
pub fn print_usage() {
    eprintln!("Usage: {} <COMMAND> [args]", BIN);
    eprintln!();
    eprintln!("{} help for a list of valid commands", BIN);
}

pub fn print_copy_report(report: &CopyReport, base: &Path) {
    for path in &report.copied {
        println!("  {}{}", FILE_NEW, style(relative(path, base)).green());
    }
    for path in &report.skipped {
        println!(
            "  {}{} {}",
            FILE_KEPT,
            relative(path, base),
            style("(already exists, left unchanged)").dim()
        );
    }
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print the diagnostic for `err` on stderr.
pub fn print_failure(err: &DispatchError) {
    match err {
        DispatchError::CommandFailed { command, .. } => {
            eprintln!();
            eprintln!("{}: failed to execute this command:", style(BIN).red().bold());
            eprintln!("    {}", command);
            eprintln!();
            eprintln!("{} help for a list of valid commands", BIN);
        }
        DispatchError::NotRunning => {
            eprintln!("{}{}", CROSS, err);
            eprintln!("Bring the container up with {} up -d", BIN);
        }
        DispatchError::ComposeFileExists { path } => {
            eprintln!("{}{}", CROSS, err);
            eprintln!(
                "Remove {} first if you want to reinstall the docker setup.",
                path.display()
            );
        }
        DispatchError::Other(e) => {
            eprintln!("{}{:#}", CROSS, e);
        }
        _ => {
            eprintln!("{}{}", CROSS, err);
        }
    }
}
