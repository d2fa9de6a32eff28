use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::sbr_api::{GameRow, TeamView};

/// Per-sportsbook odds values in upstream listing order.
///
/// A key that is absent means the sportsbook offered no line at all; a key
/// holding `None` means the sportsbook was listed but the field was null.
/// The query layer's "first value" rules walk these in insertion order.
pub type OddsMap<T> = IndexMap<String, Option<T>>;

/// Leagues covered by the upstream betting-odds pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Sport {
    Nba,
    Nfl,
    Nhl,
    Mlb,
    Ncaab,
    Epl,
    Ucl,
}

impl Sport {
    /// URL path segment used by the upstream site for this league
    pub fn path_segment(self) -> &'static str {
        match self {
            Sport::Nba => "nba-basketball",
            Sport::Nfl => "nfl-football",
            Sport::Nhl => "nhl-hockey",
            Sport::Mlb => "mlb-baseball",
            Sport::Ncaab => "ncaa-basketball",
            Sport::Epl => "english-premier-league",
            Sport::Ucl => "champions-league",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Nhl => "NHL",
            Sport::Mlb => "MLB",
            Sport::Ncaab => "NCAAB",
            Sport::Epl => "EPL",
            Sport::Ucl => "UCL",
        };
        f.write_str(code)
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NBA" => Ok(Sport::Nba),
            "NFL" => Ok(Sport::Nfl),
            "NHL" => Ok(Sport::Nhl),
            "MLB" => Ok(Sport::Mlb),
            "NCAAB" => Ok(Sport::Ncaab),
            "EPL" => Ok(Sport::Epl),
            "UCL" => Ok(Sport::Ucl),
            other => Err(format!("unknown sport code: {other}")),
        }
    }
}

/// Which posted line to read from each sportsbook entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    /// The latest posted line
    Current,
    /// The first line the sportsbook posted
    Opening,
}

/// One team as listed by the upstream site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Canonical name, unique per league; the query layer matches on it
    pub full_name: String,
    pub display_name: String,
    pub short_name: String,
    /// Poll rank, only present for ranked college teams
    pub rank: Option<u32>,
}

impl From<&TeamView> for Team {
    fn from(view: &TeamView) -> Self {
        Team {
            full_name: view.full_name.clone(),
            display_name: view.display_name.clone(),
            short_name: view.short_name.clone(),
            rank: view.rank,
        }
    }
}

/// First-listed moneyline pair for one game, American odds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moneyline {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

/// One game with its metadata and per-sportsbook odds.
///
/// Metadata is always populated; the odds maps may be empty but are never
/// absent. `date` is the upstream ISO-ish string, passed through unparsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub date: String,
    /// Free-form status text, e.g. "Final" or "7:00 PM ET"
    pub status: String,
    pub home_team: Team,
    pub away_team: Team,
    /// Zero until the game starts
    pub home_score: i32,
    pub away_score: i32,
    pub home_spread: OddsMap<f64>,
    pub home_spread_odds: OddsMap<i32>,
    pub away_spread: OddsMap<f64>,
    pub away_spread_odds: OddsMap<i32>,
    pub under_odds: OddsMap<i32>,
    pub over_odds: OddsMap<i32>,
    pub total: OddsMap<f64>,
    pub home_ml: OddsMap<i32>,
    pub away_ml: OddsMap<i32>,
}

impl Game {
    /// Build one game from its three joined payload rows.
    ///
    /// All metadata comes from the spreads row; each payload contributes the
    /// odds maps its line fields carry. Sportsbooks with a null entry or no
    /// line of the selected type are skipped entirely, so for a given
    /// payload a sportsbook key is either present in all of that payload's
    /// maps or in none of them.
    pub fn from_rows(
        spreads: &GameRow,
        moneylines: &GameRow,
        totals: &GameRow,
        line_type: LineType,
    ) -> Self {
        let view = &spreads.game_view;

        let mut game = Game {
            date: view.start_date.clone(),
            status: view.game_status_text.clone(),
            home_team: Team::from(&view.home_team),
            away_team: Team::from(&view.away_team),
            home_score: view.home_team_score.unwrap_or(0),
            away_score: view.away_team_score.unwrap_or(0),
            home_spread: OddsMap::new(),
            home_spread_odds: OddsMap::new(),
            away_spread: OddsMap::new(),
            away_spread_odds: OddsMap::new(),
            under_odds: OddsMap::new(),
            over_odds: OddsMap::new(),
            total: OddsMap::new(),
            home_ml: OddsMap::new(),
            away_ml: OddsMap::new(),
        };

        for (book, line) in spreads.lines(line_type) {
            game.home_spread.insert(book.to_string(), line.home_spread);
            game.home_spread_odds.insert(book.to_string(), line.home_odds);
            game.away_spread.insert(book.to_string(), line.away_spread);
            game.away_spread_odds.insert(book.to_string(), line.away_odds);
        }

        for (book, line) in totals.lines(line_type) {
            game.under_odds.insert(book.to_string(), line.under_odds);
            game.over_odds.insert(book.to_string(), line.over_odds);
            game.total.insert(book.to_string(), line.total);
        }

        for (book, line) in moneylines.lines(line_type) {
            game.home_ml.insert(book.to_string(), line.home_odds);
            game.away_ml.insert(book.to_string(), line.away_odds);
        }

        game
    }
}
