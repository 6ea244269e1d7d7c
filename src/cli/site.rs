use clap::Subcommand;
use comfy_table::{Attribute, Cell, Table, presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS};
use indicatif::MultiProgress;
use std::io::{self, Write};
use super::status_spinner::StatusSpinner;
use crate::{
    credentials::{Resolver, TerminalInput, API_KEY_PARAM, COMPANY_PARAM},
    http_client::{KinstaClient, Site},
    preferences::Preferences,
};

const HEADER: [&'static str; 5] = ["ID", "NAME", "DISPLAY NAME", "STATUS", "SITE LABELS"];

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all sites associated to the given company ID
    List {
        /// The API key used to query Kinsta APIs. Falls back to KINSTA_API_KEY, then prompts
        #[arg(long)]
        api_key: Option<String>,
        /// The company ID to query. Falls back to KINSTA_COMPANY, then prompts
        #[arg(long)]
        company: Option<String>
    }
}

/// Returns the process exit status
pub async fn handle(command: Command, prefs: &Preferences, multi: MultiProgress) -> super::Result<u8> {
    match command {
        Command::List { api_key, company } => {
            let input = TerminalInput;
            let resolver = Resolver::new(&input);
            let api_key = resolver.resolve(API_KEY_PARAM, api_key.as_deref())?;
            let company = resolver.resolve(COMPANY_PARAM, company.as_deref())?;

            let client = KinstaClient::new(prefs.api_url());
            Ok(list(&client, &api_key, &company, &multi, &mut io::stdout()).await?)
        }
    }
}

/// Fetch the company's sites and write them as a table to `out`.
/// Nothing is written when the request fails
async fn list(client: &KinstaClient, api_key: &str, company: &str, multi: &MultiProgress, out: &mut impl Write) -> io::Result<u8> {
    let status = StatusSpinner::new("Loading sites...", multi);
    match client.list_sites(api_key, company).await {
        Ok(list) => {
            let sites = list.company.sites;
            status.finish(&format!("Found {} sites", sites.len()), true);
            writeln!(out, "{}", sites_table(&sites))?;
            Ok(0)
        },
        Err(e) => {
            status.fail(&e.to_string());
            Ok(1)
        }
    }
}

/// one row per site: id, display name, name, status, labels
fn site_rows(sites: &[Site]) -> Vec<[String; 5]> {
    sites.iter()
        .map(|s| [
            s.id.clone(),
            s.display_name.clone(),
            s.name.clone(),
            s.status.clone(),
            s.label_names()
        ])
        .collect()
}

fn sites_table(sites: &[Site]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(HEADER.iter().map(|h| Cell::new(h).add_attribute(Attribute::Bold)));
    table.add_rows(site_rows(sites));
    table
}
