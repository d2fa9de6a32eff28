use scraper::{Html, Selector};
use serde::Deserialize;

use crate::api::sbr_api::{listing_url, USER_AGENT};
use crate::error::ScrapeError;
use crate::models::Sport;

const NEXT_DATA_SELECTOR: &str = r#"script[id="__NEXT_DATA__"][type="application/json"]"#;

/// The slice of the `__NEXT_DATA__` blob we care about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextData {
    build_id: String,
}

/// Build-id discovery seam.
///
/// The HTML scrape is the fragile step of the pipeline, so construction
/// takes it through this trait and tests can substitute a stub without any
/// network access.
pub trait ResolveBuildId {
    fn resolve(&self, sport: Sport, date: &str) -> Result<String, ScrapeError>;
}

/// Discovers the Next.js build id that the data-endpoint URLs require.
///
/// The id is embedded in the listing page's markup and rotates whenever the
/// site redeploys, so it has to be re-scraped per query. This is the fragile
/// part of the pipeline; it lives behind this narrow type so the rest of the
/// scrape never touches HTML.
pub struct BuildIdResolver {
    client: reqwest::blocking::Client,
}

impl BuildIdResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
        }
    }

    /// Fetch the listing page for `sport` on `date` and extract its build id.
    pub fn resolve(&self, sport: Sport, date: &str) -> Result<String, ScrapeError> {
        let url = listing_url(sport, date);
        let html = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.text())
            .map_err(|source| ScrapeError::Fetch {
                url: url.clone(),
                source,
            })?;

        extract_build_id(&html, &url)
    }
}

impl Default for BuildIdResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveBuildId for BuildIdResolver {
    fn resolve(&self, sport: Sport, date: &str) -> Result<String, ScrapeError> {
        BuildIdResolver::resolve(self, sport, date)
    }
}

/// Pull `buildId` out of the embedded `__NEXT_DATA__` script tag.
fn extract_build_id(html: &str, url: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(NEXT_DATA_SELECTOR).unwrap();

    let tag = document
        .select(&selector)
        .next()
        .ok_or_else(|| ScrapeError::BuildIdNotFound {
            url: url.to_string(),
        })?;

    let blob = tag.text().collect::<String>();
    let data: NextData = serde_json::from_str(&blob).map_err(|source| ScrapeError::BuildIdPage {
        url: url.to_string(),
        source,
    })?;

    Ok(data.build_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.sportsbookreview.com/betting-odds/nba-basketball/?date=2026-03-01";

    #[test]
    fn extracts_build_id_from_page_markup() {
        let html = r#"
            <html><head><title>NBA Odds</title></head><body>
            <div id="__next">odds tables here</div>
            <script id="__NEXT_DATA__" type="application/json">
                {"props": {}, "buildId": "x1Yz9AbCdEf", "page": "/betting-odds/[league]"}
            </script>
            </body></html>
        "#;

        assert_eq!(extract_build_id(html, URL).unwrap(), "x1Yz9AbCdEf");
    }

    #[test]
    fn missing_script_tag_is_a_resolution_failure() {
        let html = "<html><body><p>maintenance page</p></body></html>";

        match extract_build_id(html, URL) {
            Err(ScrapeError::BuildIdNotFound { url }) => assert_eq!(url, URL),
            other => panic!("expected BuildIdNotFound, got {other:?}"),
        }
    }

    #[test]
    fn plain_script_tags_do_not_match() {
        // Only the tag with the full id+type signature counts
        let html = r#"<script>{"buildId": "decoy"}</script>"#;
        assert!(matches!(
            extract_build_id(html, URL),
            Err(ScrapeError::BuildIdNotFound { .. })
        ));
    }

    #[test]
    fn malformed_blob_is_a_parse_failure() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">not json</script>"#;
        assert!(matches!(
            extract_build_id(html, URL),
            Err(ScrapeError::BuildIdPage { .. })
        ));
    }

    #[test]
    fn blob_without_build_id_is_a_parse_failure() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{"props": {}}</script>"#;
        assert!(matches!(
            extract_build_id(html, URL),
            Err(ScrapeError::BuildIdPage { .. })
        ));
    }
}
