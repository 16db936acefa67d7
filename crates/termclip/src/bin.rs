mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use termclip::Clipboard;
use termclip::config::{Config, effective_max_payload};
use termclip::detect::{self, Unsupported};

fn run<R: Read, W: Write>(
    cli: Cli,
    support: Result<(), Unsupported>,
    input: R,
    output: W,
) -> Result<u8> {
    if cli.check {
        if let Err(reason) = &support {
            log::info!("OSC 52 unsupported: {}", reason);
            return Ok(1);
        }
        return Ok(0);
    }

    let config = Config::load(cli.config.clone())?;

    if let Err(reason) = support {
        if !(cli.force || config.force) {
            log::warn!("not copying, {} (use --force to override)", reason);
            return Ok(1);
        }
        log::debug!("forcing copy: {}", reason);
    }

    let max_payload = cli
        .max_bytes
        .map(effective_max_payload)
        .unwrap_or_else(|| config.max_payload());
    let mut clipboard = Clipboard::new(output).with_max_payload(max_payload);

    match cli.joined_text() {
        Some(text) => clipboard.copy_str(&text),
        None => clipboard.copy(input),
    }

    Ok(0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli, detect::check(), io::stdin().lock(), io::stdout()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("termclip: {:#}", e);
            ExitCode::from(1)
        }
    }
}
