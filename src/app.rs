use super::config;
use super::Result;

use std::io::Write;
use anyhow::Context;
use json::{object, JsonValue};
use mimeheader::{AcceptHeader, MimePreference};


pub(crate) enum Command {
    Parse { header: String },
    Match { header: String, candidate: String },
    Negotiate { header: String, candidates: Vec<String>, fallback: Option<String> },
}

pub(crate) struct App {
    config: config::AppConfig,
}

impl App {

    pub(crate) fn new(config: config::AppConfig) -> Self {
        log::debug!(
            "Initialized with {} configured candidates (fallback: {:?})",
            config.negotiate.candidates.len(),
            config.negotiate.fallback,
        );

        App { config }
    }

    pub(crate) fn run(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        let result = self.handle(command);
        writeln!(out, "{}", result.dump()).context("Writing result")?;
        out.flush().context("Flushing result")?;
        Ok(())
    }

    pub(crate) fn handle(&self, command: Command) -> JsonValue {
        match command {
            Command::Parse { header } => {
                let accept = AcceptHeader::parse(&header);
                JsonValue::Array(accept.iter().map(preference_json).collect())
            }
            Command::Match { header, candidate } => {
                let matched = AcceptHeader::parse(&header).matches(&candidate);
                object!{ "matched": matched }
            }
            Command::Negotiate { header, candidates, fallback } => {
                let candidates = if candidates.is_empty() {
                    &self.config.negotiate.candidates
                } else {
                    &candidates
                };
                let fallback = fallback.as_deref().unwrap_or(self.config.negotiate.fallback.as_str());

                let result = AcceptHeader::parse(&header).negotiate(candidates, fallback);
                object!{
                    "preferred": result.preferred,
                    "candidate": result.candidate,
                    "found": result.found
                }
            }
        }
    }
}

fn preference_json(preference: &MimePreference) -> JsonValue {
    let mime_type = preference.mime_type();

    let mut params = JsonValue::new_object();
    for (key, value) in mime_type.params().iter() {
        params[key] = value.into();
    }

    object!{
        "type": mime_type.type_(),
        "subtype": mime_type.subtype(),
        "quality": preference.quality(),
        "params": params
    }
}
