use clap::{Subcommand, ValueEnum};
use dialoguer::{Input, theme::ColorfulTheme};
use indicatif::MultiProgress;
use console::{user_attended, style, strip_ansi_codes};
use crate::{preferences::DataStore, cli::status_spinner::StatusSpinner};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a preference key
    Get {
        /// Preference key to retrieve
        #[arg(value_enum)]
        key: PrefKey
    },
    /// Set a preference key. Will prompt for value
    Set {
        /// Preference key to set
        #[command(subcommand)]
        key: SetValues
    },
    /// Restore every preference to its default
    Reset
}

#[derive(Subcommand, Debug)]
pub enum SetValues {
    /// Base URL of the Kinsta API
    ApiUrl {
        value: Option<String>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum PrefKey {
    /// Base URL of the Kinsta API
    ApiUrl
}

fn display_value(prefs: &DataStore, key: PrefKey) -> super::Result<String> {
    let lock = prefs.read()?;
    Ok(match key {
        PrefKey::ApiUrl => match &lock.api_url {
            Some(url) => style(url.clone()).cyan(),
            None => style(format!("{} (default)", lock.api_url())).dim()
        }
    }.bright().bold().to_string())
}

pub async fn handle(command: Option<Command>, prefs: &DataStore, multi: MultiProgress) -> super::Result {
    match command {
        Some(Command::Get { key }) => {
            let value = display_value(prefs, key)?;
            if user_attended() {
                println!("{} {}", style(match key {
                    PrefKey::ApiUrl => "API URL:"
                }).dim(), value);
            } else {
                // just print the value without formatting
                println!("{}", strip_ansi_codes(&value));
            }
        },
        Some(Command::Set { key }) => {
            {
                let mut lock = prefs.write()?;
                match key {
                    SetValues::ApiUrl { value } => {
                        let input = if let Some(value) = value { value } else {
                            Input::with_theme(&ColorfulTheme::default())
                                .with_prompt("Enter the API URL")
                                .with_initial_text(lock.api_url())
                                .interact_text()?
                        };
                        lock.api_url = Some(input);
                    }
                }
            }
            let status = StatusSpinner::new("Saving...", &multi);
            prefs.save().await?;
            status.finish("Saved", true);
        },
        Some(Command::Reset) => {
            *prefs.write()? = Default::default();
            let status = StatusSpinner::new("Saving...", &multi);
            prefs.save().await?;
            status.finish("Preferences reset", true);
        },
        None => {
            println!("{}", style("Preferences:").green().bold().bright());
            println!(
                "{} {}",
                style("API URL:").dim(),
                display_value(prefs, PrefKey::ApiUrl)?
            );
        }
    }
    Ok(())
}
