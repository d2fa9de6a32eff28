use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::sbr_api::{moneyline_url, spreads_url, totals_url, GameRow, SbrApiClient};
use crate::error::ScrapeError;
use crate::models::{Game, LineType, Moneyline, OddsMap, Sport};
use crate::scrapers::build_id::{BuildIdResolver, ResolveBuildId};

/// All games, with odds, for one sport and date.
///
/// The scrape happens eagerly and synchronously in the constructor and the
/// collection never changes afterwards; build a new `Scoreboard` to re-poll.
/// Instances share nothing, so independent constructions are safe to run on
/// separate threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub games: Vec<Game>,
}

impl Scoreboard {
    /// Scrape `sport` on `date` (defaults to today's local date), reading
    /// lines of the given type.
    ///
    /// Fail-soft: any scrape error is logged and yields an empty game list,
    /// so callers should check `games.is_empty()` rather than catch errors.
    /// Use [`Scoreboard::try_new`] to see the error instead.
    pub fn new(sport: Sport, date: Option<&str>, line_type: LineType) -> Self {
        Self::new_with(&BuildIdResolver::new(), sport, date, line_type)
    }

    /// Like [`Scoreboard::new`] but propagates the scrape error.
    pub fn try_new(
        sport: Sport,
        date: Option<&str>,
        line_type: LineType,
    ) -> Result<Self, ScrapeError> {
        Self::try_new_with(&BuildIdResolver::new(), sport, date, line_type)
    }

    fn new_with(
        resolver: &dyn ResolveBuildId,
        sport: Sport,
        date: Option<&str>,
        line_type: LineType,
    ) -> Self {
        Self::try_new_with(resolver, sport, date, line_type).unwrap_or_else(|e| {
            error!(sport = %sport, error = %e, "scrape failed, returning empty scoreboard");
            Scoreboard::default()
        })
    }

    fn try_new_with(
        resolver: &dyn ResolveBuildId,
        sport: Sport,
        date: Option<&str>,
        line_type: LineType,
    ) -> Result<Self, ScrapeError> {
        let date = match date {
            Some(d) => d.to_string(),
            None => Local::now().format("%Y-%m-%d").to_string(),
        };

        let build_id = resolver.resolve(sport, &date)?;

        let client = SbrApiClient::new();
        let spreads = client.fetch_game_rows(&spreads_url(&build_id, sport, &date))?;
        let moneylines = client.fetch_game_rows(&moneyline_url(&build_id, sport, &date))?;
        let totals = client.fetch_game_rows(&totals_url(&build_id, sport, &date))?;

        let games = join_game_rows(&spreads, &moneylines, &totals)?
            .into_iter()
            .map(|(s, m, t)| Game::from_rows(s, m, t, line_type))
            .collect();

        Ok(Scoreboard { games })
    }

    /// One representative total per game, keyed `"{home}vs{away}"`.
    ///
    /// With no teams given, covers every game. With both teams given,
    /// matches the pair in either orientation and returns a single entry
    /// labeled in query order, or nothing if no game matches. Giving only
    /// one team never matches.
    pub fn get_totals(
        &self,
        home_team: Option<&str>,
        away_team: Option<&str>,
    ) -> IndexMap<String, Option<f64>> {
        if home_team.is_none() && away_team.is_none() {
            return self
                .games
                .iter()
                .map(|game| (matchup_label(game), process_total(&game.total)))
                .collect();
        }

        if let (Some(home), Some(away)) = (home_team, away_team) {
            for game in &self.games {
                let stored_home = game.home_team.full_name.as_str();
                let stored_away = game.away_team.full_name.as_str();
                if (stored_home == home && stored_away == away)
                    || (stored_home == away && stored_away == home)
                {
                    return IndexMap::from([(
                        format!("{home}vs{away}"),
                        process_total(&game.total),
                    )]);
                }
            }
        }

        IndexMap::new()
    }

    /// First-listed moneyline pair per game, keyed `"{home}vs{away}"`.
    ///
    /// `None` for a game means one of its moneyline maps was empty. For a
    /// reversed-order query the home/away slots are filled from the opposite
    /// maps, a convention inherited from the upstream source and preserved
    /// as-is; see DESIGN.md.
    pub fn get_ml(
        &self,
        home_team: Option<&str>,
        away_team: Option<&str>,
    ) -> IndexMap<String, Option<Moneyline>> {
        if home_team.is_none() && away_team.is_none() {
            return self
                .games
                .iter()
                .map(|game| (matchup_label(game), process_ml(&game.home_ml, &game.away_ml)))
                .collect();
        }

        if let (Some(home), Some(away)) = (home_team, away_team) {
            for game in &self.games {
                let stored_home = game.home_team.full_name.as_str();
                let stored_away = game.away_team.full_name.as_str();
                if stored_home == home && stored_away == away {
                    return IndexMap::from([(
                        format!("{home}vs{away}"),
                        process_ml(&game.home_ml, &game.away_ml),
                    )]);
                }
                if stored_home == away && stored_away == home {
                    // Reversed query: the maps are deliberately swapped
                    return IndexMap::from([(
                        format!("{home}vs{away}"),
                        process_ml(&game.away_ml, &game.home_ml),
                    )]);
                }
            }
        }

        IndexMap::new()
    }
}

fn matchup_label(game: &Game) -> String {
    format!(
        "{}vs{}",
        game.home_team.full_name, game.away_team.full_name
    )
}

/// Inner join on the spreads payload's id set.
///
/// All three fetches describe the same slate, so a spreads id missing from
/// moneylines or totals fails the join rather than producing a partial game.
/// Row order follows the spreads payload.
fn join_game_rows<'a>(
    spreads: &'a IndexMap<i64, GameRow>,
    moneylines: &'a IndexMap<i64, GameRow>,
    totals: &'a IndexMap<i64, GameRow>,
) -> Result<Vec<(&'a GameRow, &'a GameRow, &'a GameRow)>, ScrapeError> {
    spreads
        .iter()
        .map(|(id, spreads_row)| {
            let moneylines_row = moneylines.get(id).ok_or(ScrapeError::MissingGame {
                game_id: *id,
                payload: "moneylines",
            })?;
            let totals_row = totals.get(id).ok_or(ScrapeError::MissingGame {
                game_id: *id,
                payload: "totals",
            })?;
            Ok((spreads_row, moneylines_row, totals_row))
        })
        .collect()
}

/// Pick one representative total from a per-sportsbook map.
///
/// The first half-point line wins; failing that, the first nonzero line
/// rounded to the nearest half point (quarter-point ties round to even,
/// like the upstream source); failing that, nothing.
fn process_total(totals: &OddsMap<f64>) -> Option<f64> {
    let half_point = totals
        .values()
        .flatten()
        .copied()
        .find(|total| *total != 0.0 && total.rem_euclid(1.0) == 0.5);
    if half_point.is_some() {
        return half_point;
    }

    let first_valid = totals.values().flatten().copied().find(|total| *total != 0.0)?;
    Some((first_valid * 2.0).round_ties_even() / 2.0)
}

/// First nonzero odds of each side, or `None` when either map is empty.
fn process_ml(home_ml: &OddsMap<i32>, away_ml: &OddsMap<i32>) -> Option<Moneyline> {
    if home_ml.is_empty() || away_ml.is_empty() {
        return None;
    }
    Some(Moneyline {
        home: home_ml.values().flatten().copied().find(|odds| *odds != 0),
        away: away_ml.values().flatten().copied().find(|odds| *odds != 0),
    })
}
