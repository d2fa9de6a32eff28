use anyhow::Result;
use clap::{Parser, Subcommand};
use sbr_odds::{LineType, Scoreboard, Sport};

#[derive(Parser)]
#[command(about = "Scrape sportsbookreview.com betting odds for one sport and date")]
struct Cli {
    /// League to scrape
    #[arg(long, value_enum, default_value = "nba")]
    sport: Sport,

    /// Date in YYYY-MM-DD form (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Read opening lines instead of current lines
    #[arg(long)]
    opening: bool,

    /// Emit JSON instead of a text summary
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// One representative total per game
    Totals {
        home: Option<String>,
        away: Option<String>,
    },
    /// First-listed moneyline pair per game
    Moneylines {
        home: Option<String>,
        away: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let line_type = if cli.opening {
        LineType::Opening
    } else {
        LineType::Current
    };

    let board = Scoreboard::new(cli.sport, cli.date.as_deref(), line_type);
    if board.games.is_empty() {
        eprintln!("No games found for {} on the requested date", cli.sport);
    }

    match cli.command {
        Some(Command::Totals { home, away }) => {
            let totals = board.get_totals(home.as_deref(), away.as_deref());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                for (matchup, total) in &totals {
                    match total {
                        Some(total) => println!("{matchup}: {total}"),
                        None => println!("{matchup}: no total posted"),
                    }
                }
            }
        }
        Some(Command::Moneylines { home, away }) => {
            let moneylines = board.get_ml(home.as_deref(), away.as_deref());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&moneylines)?);
            } else {
                for (matchup, ml) in &moneylines {
                    match ml {
                        Some(ml) => println!(
                            "{matchup}: home {} / away {}",
                            format_odds(ml.home),
                            format_odds(ml.away)
                        ),
                        None => println!("{matchup}: no moneyline posted"),
                    }
                }
            }
        }
        None => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                for game in &board.games {
                    println!(
                        "[{}] {} @ {} ({}-{}), {} sportsbooks with spreads",
                        game.status,
                        game.away_team.full_name,
                        game.home_team.full_name,
                        game.away_score,
                        game.home_score,
                        game.home_spread.len()
                    );
                }
            }
        }
    }

    Ok(())
}

fn format_odds(odds: Option<i32>) -> String {
    match odds {
        Some(odds) if odds > 0 => format!("+{odds}"),
        Some(odds) => odds.to_string(),
        None => "-".to_string(),
    }
}
