use thiserror::Error;

/// Errors raised while scraping one sport+date slate.
///
/// `Scoreboard::new` converts every one of these into an empty game list
/// plus a logged diagnostic; they only surface to callers through
/// `Scoreboard::try_new`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The listing page had no `__NEXT_DATA__` script tag, so the build id
    /// needed for the data endpoints could not be discovered.
    #[error("no __NEXT_DATA__ build id found at {url}")]
    BuildIdNotFound { url: String },

    /// The embedded `__NEXT_DATA__` blob was present but not valid JSON.
    #[error("embedded page data at {url} was not valid JSON: {source}")]
    BuildIdPage {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Network failure on any of the page or endpoint requests.
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected odds-table JSON shape.
    #[error("response from {url} was not the expected JSON shape: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A game id from the spreads payload was absent from another payload
    /// during the join. The three fetches describe the same slate, so a gap
    /// means the scrape as a whole is unusable.
    #[error("game {game_id} present in the spreads payload but missing from {payload}")]
    MissingGame { game_id: i64, payload: &'static str },
}
