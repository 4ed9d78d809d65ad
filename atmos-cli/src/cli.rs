use std::path::PathBuf;

use anyhow::{Context, Result};
use atmos_core::{Assistant, Config, RegionCatalog, sources_from_config};
use clap::{Parser, Subcommand};
use inquire::{InquireError, MultiSelect, Select, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmos", version, about = "Ask about the weather in Indian states")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a single free-text prompt.
    Ask {
        /// The prompt, e.g. "humidity in kerala as a bar chart".
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Chart type to draw instead of the one named in the prompt.
        #[arg(long)]
        chart: Option<String>,
    },

    /// Keep asking prompts until an empty line, `exit` or Ctrl-C.
    Chat,

    /// Full live weather for one state; asks which one if not given.
    Show {
        state: Option<String>,
    },

    /// Live weather for several states; offers a picker if none are given.
    Favorites {
        states: Vec<String>,
    },

    /// List the supported states and the city used for each.
    States,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let catalog = RegionCatalog::india();
        let Cli { config, command, .. } = self;

        if let Command::States = command {
            for region in catalog.iter() {
                println!("{:<20} {}", region.name, region.city);
            }
            return Ok(());
        }

        let config = Config::load(config.as_deref())?;
        let (weather, air) = sources_from_config(&config)?;
        let assistant = Assistant::new(&catalog, weather, air);

        match command {
            Command::Ask { prompt, chart } => {
                let reply = assistant.answer(&prompt.join(" "), chart.as_deref()).await?;
                print!("{reply}");
            }
            Command::Chat => chat(&assistant).await?,
            Command::Show { state } => {
                let state = match state {
                    Some(state) => state,
                    None => pick_state(&catalog)?,
                };
                print!("{}", assistant.quick_view(&state).await?);
            }
            Command::Favorites { states } => {
                let states = if states.is_empty() { pick_favorites(&catalog)? } else { states };
                print!("{}", assistant.favorites(states.as_slice()).await?);
            }
            Command::States => {}
        }

        Ok(())
    }
}

async fn chat(assistant: &Assistant<'_>) -> Result<()> {
    println!("Ask me anything about weather in India. Leave the line empty or type `exit` to quit.");

    loop {
        let input = match Text::new("You:")
            .with_help_message("e.g. \"compare humidity in goa and kerala as a bar chart\"")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read prompt"),
        };

        let prompt = input.trim();
        if prompt.is_empty() || matches!(prompt, "exit" | "quit") {
            break;
        }

        // A failed request ends that answer only, not the session.
        match assistant.answer(prompt, None).await {
            Ok(reply) => print!("{reply}"),
            Err(err) => {
                tracing::debug!(error = ?err, "request failed");
                eprintln!("error: {err:#}");
            }
        }
    }

    Ok(())
}

fn pick_state(catalog: &RegionCatalog) -> Result<String> {
    let choice = Select::new("Select a state to instantly view weather", catalog.names())
        .prompt()
        .context("No state selected")?;

    Ok(choice.to_string())
}

fn pick_favorites(catalog: &RegionCatalog) -> Result<Vec<String>> {
    let chosen = MultiSelect::new("Select your favorite states:", catalog.names())
        .prompt()
        .context("No favorites selected")?;

    Ok(chosen.into_iter().map(str::to_string).collect())
}
