use std::{io::stdout, path::PathBuf};
use anyhow::{Context, Result};

mod config;
mod app;

use app::{App, Command};


fn header_arg() -> clap::Arg<'static, 'static> {
    clap::Arg::with_name("header")
        .help("Value of an Accept header, e.g. \"text/html, */*; q=0.8\"")
        .required(true)
        .index(1)
}

fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    let matches = clap::App::new("mimeneg")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about("Parses Accept headers and negotiates media types against them")
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name("config")
                .long("config")
                .short("c")
                .help("Where can I find my configuration?")
                .long_help("TOML file with default candidates and fallback for the negotiate command, under a [mimeneg] table.")
                .global(true)
                .takes_value(true))
        .subcommand(
            clap::SubCommand::with_name("parse")
                .about("Print the header's preferences, most preferred first")
                .arg(header_arg()))
        .subcommand(
            clap::SubCommand::with_name("match")
                .about("Check whether the header accepts a media type at all")
                .arg(header_arg())
                .arg(
                    clap::Arg::with_name("type")
                        .help("Concrete media type, e.g. application/json")
                        .required(true)
                        .index(2)))
        .subcommand(
            clap::SubCommand::with_name("negotiate")
                .about("Pick the candidate the header prefers most")
                .arg(header_arg())
                .arg(
                    clap::Arg::with_name("candidate")
                        .long("candidate")
                        .help("Media type the caller can produce; repeat in order of the caller's own preference")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1))
                .arg(
                    clap::Arg::with_name("fallback")
                        .long("fallback")
                        .help("Reported when no candidate is acceptable")
                        .takes_value(true)))
        .get_matches();

    let config_path = matches.subcommand()
        .1
        .and_then(|sub| sub.value_of("config"))
        .or(matches.value_of("config"))
        .map(PathBuf::from);

    let config = config::load(config_path).context("Loading configuration")?;

    let command = match matches.subcommand() {
        ("parse", Some(sub)) => Command::Parse {
            header: sub.value_of("header").unwrap_or_default().to_string(),
        },
        ("match", Some(sub)) => Command::Match {
            header: sub.value_of("header").unwrap_or_default().to_string(),
            candidate: sub.value_of("type").unwrap_or_default().to_string(),
        },
        ("negotiate", Some(sub)) => Command::Negotiate {
            header: sub.value_of("header").unwrap_or_default().to_string(),
            candidates: sub.values_of("candidate")
                .map(|values| values.map(String::from).collect())
                .unwrap_or_default(),
            fallback: sub.value_of("fallback").map(String::from),
        },
        (name, _) => anyhow::bail!("Unknown command: {}", name),
    };

    log::debug!("Running command with config: {:?}", config);

    let app = App::new(config);
    let stdout = stdout();
    let mut out = stdout.lock();
    app.run(command, &mut out)
}
