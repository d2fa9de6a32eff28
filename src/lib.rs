//! Betting-odds scoreboard for sportsbookreview.com.
//!
//! Scrapes the site's Next.js data endpoints for spreads, totals and
//! moneylines on one sport+date, and flattens the three payloads into
//! per-game [`Game`] records with per-sportsbook odds maps. The entry point
//! is [`Scoreboard`], which scrapes eagerly on construction and exposes
//! team-pair lookups for totals and moneylines.
//!
//! ```no_run
//! use sbr_odds::{LineType, Scoreboard, Sport};
//!
//! let board = Scoreboard::new(Sport::Nba, Some("2026-03-01"), LineType::Current);
//! for (matchup, total) in board.get_totals(None, None) {
//!     println!("{matchup}: {total:?}");
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod scoreboard;
pub mod scrapers;

pub use error::ScrapeError;
pub use models::{Game, LineType, Moneyline, OddsMap, Sport, Team};
pub use scoreboard::Scoreboard;
