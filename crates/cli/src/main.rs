use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dest_agents::{AppConfig, DestinationAgent};
use dest_core::{ConversationMessage, Role};
use dest_observability::init_tracing;
use dest_storage::MemoryStore;
use dest_travel::{FlightQuery, ServiceClass, TravelClient};

#[derive(Debug, Parser)]
#[command(name = "destgpt")]
#[command(about = "Dest GPT travel destinations assistant")]
struct Cli {
    #[arg(long, env = "DEST_OPENAI_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat,
    Ask {
        question: String,
    },
    Tag {
        text: String,
    },
    Tool {
        #[command(subcommand)]
        command: ToolCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ToolCommand {
    Airports {
        #[arg(long)]
        name: String,
    },
    Hotels {
        #[arg(long)]
        name: String,
    },
    Restaurants {
        #[arg(long)]
        name: String,
    },
    Flights(FlightArgs),
}

#[derive(Debug, Args)]
struct FlightArgs {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    return_date: Option<String>,
    #[arg(long, default_value_t = 1)]
    adults: u32,
    #[arg(long, default_value_t = 0)]
    seniors: u32,
    #[arg(long, default_value = "economy")]
    class: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("dest_cli");
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(model) = cli.model {
        config.openai.model = model;
    }

    match cli.command {
        Command::Chat => run_chat(DestinationAgent::from_config(&config)?).await?,
        Command::Ask { question } => {
            let question = non_blank(&question, "question")?;
            let agent = DestinationAgent::from_config(&config)?;
            agent
                .handle_turn_with(None, question, print_progress)
                .await?;
        }
        Command::Tag { text } => {
            let text = non_blank(&text, "text")?;
            let agent = DestinationAgent::from_config(&config)?;
            let intent = agent.tagger().extract_information(text).await?;
            println!("{}", serde_json::to_string_pretty(&intent)?);
        }
        Command::Tool { command } => {
            let travel = TravelClient::new(config.travel.clone())?;
            let output = match command {
                ToolCommand::Airports { name } => travel.get_airports(&name).await?,
                ToolCommand::Hotels { name } => travel.get_hotels(&name).await?,
                ToolCommand::Restaurants { name } => travel.get_restaurants(&name).await?,
                ToolCommand::Flights(args) => travel.get_flights(&flight_query(args)?).await?,
            };
            println!("{output}");
        }
    }

    Ok(())
}

async fn run_chat(agent: DestinationAgent<MemoryStore>) -> Result<()> {
    let mut session_id: Option<String> = None;

    println!(
        "I am a helpful travel destinations bot. Ask me anything about travel destinations! (type 'exit' to quit)"
    );

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let outcome = agent
            .handle_turn_with(session_id.clone(), message, print_progress)
            .await?;
        session_id = Some(outcome.session_id);
    }

    Ok(())
}

// The user's own line is already on screen.
fn print_progress(message: &ConversationMessage) {
    if message.role == Role::Assistant {
        println!("\n{}\n", message.content);
    }
}

fn non_blank<'a>(value: &'a str, label: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{label} must not be empty");
    }
    Ok(value)
}

fn flight_query(args: FlightArgs) -> Result<FlightQuery> {
    let departure = calendar_date(&args.date)?;
    let return_date = args.return_date.as_deref().map(calendar_date).transpose()?;
    let Some(service_class) = ServiceClass::parse(&args.class) else {
        bail!("invalid --class value: {}", args.class);
    };

    Ok(FlightQuery {
        source_airport: args.from,
        dest_airport: args.to,
        year: departure.year(),
        month: departure.month(),
        day: departure.day(),
        round_trip: return_date.is_some(),
        return_year: return_date.map(|date| date.year()),
        return_month: return_date.map(|date| date.month()),
        return_day: return_date.map(|date| date.day()),
        num_adults: args.adults,
        num_seniors: args.seniors,
        service_class,
    })
}

fn calendar_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {value}, expected YYYY-MM-DD"))
}
