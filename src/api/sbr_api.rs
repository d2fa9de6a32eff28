use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ScrapeError;
use crate::models::{LineType, Sport};

pub(crate) const SBR_BASE_URL: &str = "https://www.sportsbookreview.com";
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Response from an SBR `_next/data` odds endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsResponse {
    pub page_props: PageProps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub odds_tables: Vec<OddsTable>,
}

/// One odds-table section (usually one per league subdivision)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsTable {
    pub odds_table_model: OddsTableModel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsTableModel {
    pub game_rows: Vec<GameRow>,
}

/// One game's row in an odds table: metadata plus per-sportsbook lines.
///
/// `odds_views` entries can be JSON nulls (a sportsbook with no posted
/// line), and the whole list is omitted for some in-progress or cancelled
/// games; both decode without error here and are skipped downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRow {
    pub game_view: GameView,
    #[serde(default)]
    pub odds_views: Vec<Option<OddsView>>,
}

impl GameRow {
    /// Per-sportsbook lines of the selected type, skipping null entries.
    pub fn lines(&self, line_type: LineType) -> impl Iterator<Item = (&str, &LineView)> {
        self.odds_views.iter().flatten().filter_map(move |view| {
            view.line(line_type)
                .map(|line| (view.sportsbook.as_str(), line))
        })
    }
}

/// Game metadata common to all three payloads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: i64,
    pub start_date: String,
    pub game_status_text: String,
    pub home_team: TeamView,
    pub away_team: TeamView,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub full_name: String,
    pub display_name: String,
    pub short_name: String,
    pub rank: Option<u32>,
}

/// One sportsbook's entry in a row's `oddsViews` list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsView {
    pub sportsbook: String,
    #[serde(default)]
    pub current_line: Option<LineView>,
    #[serde(default)]
    pub opening_line: Option<LineView>,
}

impl OddsView {
    pub fn line(&self, line_type: LineType) -> Option<&LineView> {
        match line_type {
            LineType::Current => self.current_line.as_ref(),
            LineType::Opening => self.opening_line.as_ref(),
        }
    }
}

/// The numeric line fields; which ones are populated depends on the payload
/// kind (spreads, totals or moneyline). Upstream nulls individual fields,
/// so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineView {
    pub home_spread: Option<f64>,
    pub away_spread: Option<f64>,
    pub home_odds: Option<i32>,
    pub away_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub over_odds: Option<i32>,
    pub total: Option<f64>,
}

/// Listing page whose markup embeds the Next.js build id
pub fn listing_url(sport: Sport, date: &str) -> String {
    format!(
        "{SBR_BASE_URL}/betting-odds/{}/?date={date}",
        sport.path_segment()
    )
}

/// Spreads endpoint; also the source of all game metadata
pub fn spreads_url(build_id: &str, sport: Sport, date: &str) -> String {
    let seg = sport.path_segment();
    format!("{SBR_BASE_URL}/_next/data/{build_id}/betting-odds/{seg}.json?league={seg}&date={date}")
}

pub fn moneyline_url(build_id: &str, sport: Sport, date: &str) -> String {
    let seg = sport.path_segment();
    format!(
        "{SBR_BASE_URL}/_next/data/{build_id}/betting-odds/{seg}/money-line/full-game.json?league={seg}&oddsType=money-line&oddsScope=full-game&date={date}"
    )
}

pub fn totals_url(build_id: &str, sport: Sport, date: &str) -> String {
    let seg = sport.path_segment();
    format!(
        "{SBR_BASE_URL}/_next/data/{build_id}/betting-odds/{seg}/totals/full-game.json?league={seg}&oddsType=totals&oddsScope=full-game&date={date}"
    )
}

/// Blocking client for the SBR `_next/data` odds endpoints.
pub struct SbrApiClient {
    client: reqwest::blocking::Client,
}

impl SbrApiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
        }
    }

    /// Fetch one odds endpoint and key its game rows by game id.
    ///
    /// No retries and no timeout override; latency is the network's.
    pub fn fetch_game_rows(&self, url: &str) -> Result<IndexMap<i64, GameRow>, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let payload: OddsResponse = response.json().map_err(|source| ScrapeError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(process_game_rows(payload))
    }
}

impl Default for SbrApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten every odds-table section into one id-keyed row map, preserving
/// upstream row order. A repeated game id keeps the later row.
pub fn process_game_rows(payload: OddsResponse) -> IndexMap<i64, GameRow> {
    payload
        .page_props
        .odds_tables
        .into_iter()
        .flat_map(|table| table.odds_table_model.game_rows)
        .map(|row| (row.game_view.game_id, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_json(game_id: i64, status: &str) -> serde_json::Value {
        json!({
            "gameView": {
                "gameId": game_id,
                "startDate": "2026-03-01T00:10:00+00:00",
                "gameStatusText": status,
                "homeTeam": {
                    "fullName": "Boston Celtics",
                    "displayName": "Celtics",
                    "shortName": "BOS",
                    "rank": null
                },
                "awayTeam": {
                    "fullName": "Miami Heat",
                    "displayName": "Heat",
                    "shortName": "MIA",
                    "rank": null
                },
                "homeTeamScore": 0,
                "awayTeamScore": 0
            },
            "oddsViews": [
                null,
                {
                    "sportsbook": "fanduel",
                    "currentLine": { "homeSpread": -6.5, "homeOdds": -110, "awaySpread": 6.5, "awayOdds": -110 },
                    "openingLine": { "homeSpread": -5.5, "homeOdds": -105, "awaySpread": 5.5, "awayOdds": -115 }
                }
            ]
        })
    }

    fn response_json(rows: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "pageProps": {
                "oddsTables": [
                    { "oddsTableModel": { "gameRows": rows } }
                ]
            }
        })
    }

    #[test]
    fn decodes_and_keys_rows_by_game_id() {
        let payload: OddsResponse =
            serde_json::from_value(response_json(vec![row_json(41, "7:00 PM ET"), row_json(42, "Final")]))
                .unwrap();

        let rows = process_game_rows(payload);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&41].game_view.game_status_text, "7:00 PM ET");
        assert_eq!(rows[&42].game_view.game_status_text, "Final");
        // Upstream row order survives the keying
        assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![41, 42]);
    }

    #[test]
    fn flattens_multiple_odds_tables() {
        let payload: OddsResponse = serde_json::from_value(json!({
            "pageProps": {
                "oddsTables": [
                    { "oddsTableModel": { "gameRows": [row_json(1, "Final")] } },
                    { "oddsTableModel": { "gameRows": [row_json(2, "Final")] } }
                ]
            }
        }))
        .unwrap();

        let rows = process_game_rows(payload);
        assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn duplicate_game_id_keeps_later_row() {
        let payload: OddsResponse = serde_json::from_value(response_json(vec![
            row_json(7, "7:00 PM ET"),
            row_json(7, "Final"),
        ]))
        .unwrap();

        let rows = process_game_rows(payload);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[&7].game_view.game_status_text, "Final");
    }

    #[test]
    fn null_odds_views_entries_are_skipped_by_lines() {
        let payload: OddsResponse =
            serde_json::from_value(response_json(vec![row_json(9, "Final")])).unwrap();
        let rows = process_game_rows(payload);

        let lines: Vec<_> = rows[&9].lines(LineType::Current).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "fanduel");
        assert_eq!(lines[0].1.home_spread, Some(-6.5));
    }

    #[test]
    fn missing_odds_views_list_decodes_as_empty() {
        let mut row = row_json(3, "Postponed");
        row.as_object_mut().unwrap().remove("oddsViews");
        let payload: OddsResponse = serde_json::from_value(response_json(vec![row])).unwrap();

        let rows = process_game_rows(payload);
        assert_eq!(rows[&3].lines(LineType::Current).count(), 0);
    }

    #[test]
    fn line_selection_honors_line_type() {
        let payload: OddsResponse =
            serde_json::from_value(response_json(vec![row_json(5, "Final")])).unwrap();
        let rows = process_game_rows(payload);

        let (_, current) = rows[&5].lines(LineType::Current).next().unwrap();
        let (_, opening) = rows[&5].lines(LineType::Opening).next().unwrap();
        assert_eq!(current.home_spread, Some(-6.5));
        assert_eq!(opening.home_spread, Some(-5.5));
    }

    #[test]
    fn url_templates_match_upstream_shape() {
        assert_eq!(
            spreads_url("abc123", Sport::Nba, "2026-03-01"),
            "https://www.sportsbookreview.com/_next/data/abc123/betting-odds/nba-basketball.json?league=nba-basketball&date=2026-03-01"
        );
        assert_eq!(
            moneyline_url("abc123", Sport::Nhl, "2026-03-01"),
            "https://www.sportsbookreview.com/_next/data/abc123/betting-odds/nhl-hockey/money-line/full-game.json?league=nhl-hockey&oddsType=money-line&oddsScope=full-game&date=2026-03-01"
        );
        assert_eq!(
            totals_url("abc123", Sport::Epl, "2026-03-01"),
            "https://www.sportsbookreview.com/_next/data/abc123/betting-odds/english-premier-league/totals/full-game.json?league=english-premier-league&oddsType=totals&oddsScope=full-game&date=2026-03-01"
        );
        assert_eq!(
            listing_url(Sport::Mlb, "2026-07-04"),
            "https://www.sportsbookreview.com/betting-odds/mlb-baseball/?date=2026-07-04"
        );
    }
}
