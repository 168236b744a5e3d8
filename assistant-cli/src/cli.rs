use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_assistant_core::{Assistant, AssistantResult, Config, parser::or_na};

const RULE_WIDTH: usize = 50;
const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-assistant", version, about = "Conversational weather assistant")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys in the config file.
    Configure,

    /// Start an interactive chat session (the default).
    Chat,

    /// Ask a single question and exit.
    Ask {
        /// City name or free-text question; unquoted words are joined.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        message: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Chat) {
            Command::Configure => configure(),
            Command::Chat => {
                let assistant = Assistant::from_config(&Config::load()?)?;
                chat_loop(&assistant).await
            }
            Command::Ask { message } => {
                let message = message.join(" ");
                if message.trim().is_empty() {
                    anyhow::bail!("Message cannot be empty");
                }
                let assistant = Assistant::from_config(&Config::load()?)?;
                let result = assistant.handle(&message).await?;
                println!("{}", render(&result));
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let weather_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read OpenWeatherMap API key")?;
    let gemini_key = Password::new("Gemini API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read Gemini API key")?;

    cfg.weather_api_key = Some(weather_key.trim().to_string());
    cfg.gemini_api_key = Some(gemini_key.trim().to_string());
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn chat_loop(assistant: &Assistant) -> anyhow::Result<()> {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("   Welcome to the Weather Assistant");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Type a city name to get the weather, or ask me anything.");
    println!("Type 'quit' or 'exit' to stop.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            println!("  Please enter a city name or a question.\n");
            continue;
        }
        if is_quit(input) {
            println!("\nGoodbye! Stay weather-aware!");
            break;
        }

        println!("{}", "-".repeat(RULE_WIDTH));
        match assistant.handle(input).await {
            Ok(result) => println!("{}", render(&result)),
            Err(e) => println!("  Unexpected error: {e}"),
        }
        println!("{}\n", "-".repeat(RULE_WIDTH));
    }

    Ok(())
}

fn is_quit(input: &str) -> bool {
    QUIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Render a turn's result as labelled lines.
pub fn render(result: &AssistantResult) -> String {
    match result {
        AssistantResult::Weather {
            record,
            recommendation,
            insights,
        } => {
            let mut out = format!(
                "  City        : {}, {}\n\
                 \x20 Temperature : {}°C (feels like {}°C)\n\
                 \x20 Description : {}\n\
                 \x20 Humidity    : {}%\n\
                 \x20 Wind Speed  : {} m/s\n",
                or_na(&record.city),
                or_na(&record.country),
                or_na(&record.temperature),
                or_na(&record.feels_like),
                or_na(&record.description),
                or_na(&record.humidity),
                or_na(&record.wind_speed),
            );
            if !recommendation.is_empty() {
                out.push_str(&format!("\n  Recommendation:\n     {recommendation}\n"));
            }
            if !insights.is_empty() {
                out.push_str(&format!("\n  Insights:\n     {insights}\n"));
            }
            out
        }
        AssistantResult::Chat { reply } => format!("  {reply}"),
        AssistantResult::Error {
            city_or_message,
            error,
        } => format!("  Error for '{city_or_message}': {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_assistant_core::WeatherRecord;

    #[test]
    fn quit_words_are_case_insensitive() {
        assert!(is_quit("QUIT"));
        assert!(is_quit("Exit"));
        assert!(is_quit("q"));
        assert!(!is_quit("quito"));
    }

    #[test]
    fn weather_result_renders_labels_and_placeholders() {
        let result = AssistantResult::Weather {
            record: WeatherRecord {
                city: Some("Paris".into()),
                temperature: Some(21.5),
                ..WeatherRecord::default()
            },
            recommendation: "Wear sunscreen.".into(),
            insights: String::new(),
        };

        let out = render(&result);
        assert!(out.contains("  City        : Paris, N/A\n"));
        assert!(out.contains("  Temperature : 21.5°C (feels like N/A°C)\n"));
        assert!(out.contains("Recommendation:\n     Wear sunscreen."));
        assert!(!out.contains("Insights:"));
    }

    #[test]
    fn error_result_renders_message() {
        let result = AssistantResult::Error {
            city_or_message: "Atlantis".into(),
            error: "City 'Atlantis' not found (404). Please check the city name.".into(),
        };
        assert_eq!(
            render(&result),
            "  Error for 'Atlantis': City 'Atlantis' not found (404). Please check the city name."
        );
    }

    #[test]
    fn parses_ask_subcommand() {
        let cli = Cli::try_parse_from(["weather-assistant", "ask", "Berlin"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Ask { message }) if message == ["Berlin"]));
    }

    #[test]
    fn ask_collects_unquoted_words() {
        let cli =
            Cli::try_parse_from(["weather-assistant", "ask", "what", "is", "humidity"]).unwrap();
        match cli.command {
            Some(Command::Ask { message }) => assert_eq!(message.join(" "), "what is humidity"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["weather-assistant", "ask"]).is_err());
    }

    #[test]
    fn no_subcommand_defaults_to_chat() {
        let cli = Cli::try_parse_from(["weather-assistant", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
