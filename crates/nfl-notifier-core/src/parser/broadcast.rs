//! Broadcast schedule parser for ran.de
//!
//! Parses HTML from the NFL live schedule page to extract season, gameday,
//! date and the list of broadcast games. The walk over the content area is
//! best-effort per element; only a missing content root is a hard error.

use scraper::{ElementRef, Html, Selector};

use crate::error::{NotifierError, Result};
use crate::types::{BroadcastSchedule, Game};

use crate::client::RAN_BASE_URL;

/// Marker word in the season heading, e.g. "NFL Saison 2023"
const SEASON_MARKER: &str = "Saison";

/// Marker word in the gameday paragraph, e.g. "1. Spieltag: Donnerstag, ..."
const GAMEDAY_MARKER: &str = "Spieltag";

/// Marker substring in game paragraphs, e.g. "20:15 Uhr: ..."
const TIME_MARKER: &str = "Uhr:";

/// Sponsor hashtag that also contains the time marker but is never a game
const SPONSOR_TAG: &str = "#ranNFLsüchtig";

/// Parse the broadcast schedule from the schedule page HTML.
///
/// Walks all elements under the content root in document order. Season and
/// gameday/date take first-match-wins semantics; games accumulate without
/// deduplication. Elements failing a rule's format expectations contribute
/// nothing.
///
/// # Arguments
/// * `html` - Raw HTML content of the schedule page
///
/// # Returns
/// * `Ok(BroadcastSchedule)` with whatever the page yielded
/// * `Err(NotifierError::StructureNotFound)` if the content root is missing
pub fn parse_broadcast_page(html: &str) -> Result<BroadcastSchedule> {
    let document = Html::parse_document(html);
    let content_root = locate_content_root(&document)?;

    let mut schedule = BroadcastSchedule::default();

    for node in content_root.descendants().skip(1) {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if schedule.season.is_none() {
            schedule.season = find_season(&element);
        }

        if schedule.gameday.is_none() && schedule.date.is_none() {
            if let Some((gameday, date)) = find_gameday_and_date(&element) {
                schedule.gameday = Some(gameday);
                schedule.date = Some(date);
            }
        }

        if let Some(game) = find_game(&element) {
            schedule.games.push(game);
        }
    }

    Ok(schedule)
}

/// Locate the content root holding all schedule information.
///
/// The root is the div with the exact class attribute
/// `"content-area left-container"`, followed by the nearest
/// `div.formatted-text` (descendant first, then following siblings).
fn locate_content_root(document: &Html) -> Result<ElementRef<'_>> {
    let content_area_selector = Selector::parse(r#"div[class="content-area left-container"]"#)
        .map_err(|e| NotifierError::Parse(format!("invalid selector: {:?}", e)))?;
    let formatted_selector = Selector::parse("div.formatted-text")
        .map_err(|e| NotifierError::Parse(format!("invalid selector: {:?}", e)))?;

    let content_area = document.select(&content_area_selector).next().ok_or_else(|| {
        NotifierError::StructureNotFound("div.content-area.left-container".to_string())
    })?;

    content_area
        .select(&formatted_selector)
        .next()
        .or_else(|| {
            // The schedule markup has moved before; fall back to the nodes
            // following the content area in document order, descendants
            // included.
            content_area
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find_map(|sibling| {
                    if formatted_selector.matches(&sibling) {
                        Some(sibling)
                    } else {
                        sibling.select(&formatted_selector).next()
                    }
                })
        })
        .ok_or_else(|| NotifierError::StructureNotFound("div.formatted-text".to_string()))
}

/// Extract the season from a heading element.
///
/// Matches an `<h3>` with no attributes at all whose text contains the
/// season marker; the season is the trimmed text after the marker. A heading
/// with nothing after the marker does not match, so it cannot fill the slot
/// ahead of a later heading that carries a value.
fn find_season(element: &ElementRef) -> Option<String> {
    if element.value().name() != "h3" {
        return None;
    }
    if element.value().attrs().next().is_some() {
        return None;
    }

    let text = element.text().collect::<String>();
    let (_, season) = text.split_once(SEASON_MARKER)?;

    let season = season.trim();
    if season.is_empty() {
        return None;
    }

    Some(season.to_string())
}

/// Extract the gameday label and date from a paragraph element.
///
/// The paragraph reads like "1. Spieltag: Donnerstag, 7. September". The
/// label is the text before the colon; the date is the text after the comma,
/// dropping the weekday. An empty payload after the colon or a missing comma
/// means the rule does not match.
fn find_gameday_and_date(element: &ElementRef) -> Option<(String, String)> {
    if element.value().name() != "p" {
        return None;
    }

    let text = element.text().collect::<String>();
    if !text.contains(GAMEDAY_MARKER) {
        return None;
    }

    let (label, payload) = text.split_once(':')?;
    if payload.trim().is_empty() {
        return None;
    }

    let (_, date) = payload.split_once(',')?;

    Some((label.trim().to_string(), date.trim().to_string()))
}

/// Extract a game from a paragraph element.
///
/// The paragraph reads like "20:15 Uhr: Team A @ Team B live on Sender"
/// with the broadcaster in a nested link. Paragraphs carrying the sponsor
/// hashtag are never games. Any missing piece skips the element.
fn find_game(element: &ElementRef) -> Option<Game> {
    if element.value().name() != "p" {
        return None;
    }

    let text = element.text().collect::<String>();
    if !text.contains(TIME_MARKER) || text.contains(SPONSOR_TAG) {
        return None;
    }

    let link_selector = Selector::parse("a").ok()?;
    let link = element.select(&link_selector).next()?;

    // The page pads times with non-breaking spaces
    let text = text.replace('\u{a0}', " ");

    let (time_part, remainder) = text.split_once(": ")?;
    let title = remainder.split("live").next().unwrap_or("").trim();
    let kickoff = time_part.split_whitespace().next()?;

    let broadcaster = link.text().collect::<String>().trim().to_string();
    let href = link.value().attr("href")?;

    if title.is_empty() || broadcaster.is_empty() {
        return None;
    }

    Some(Game {
        kickoff: kickoff.to_string(),
        title: title.to_string(),
        broadcaster,
        url: format!("{}{}", RAN_BASE_URL, href),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Wrap schedule body markup in the page structure the parser expects.
    fn page(body: &str) -> String {
        format!(
            r#"<html><body>
            <div class="header">ran NFL</div>
            <div class="content-area left-container">
              <div class="teaser">ignored</div>
              <div class="formatted-text">{}</div>
            </div>
            </body></html>"#,
            body
        )
    }

    const FULL_BODY: &str = r#"
        <h3>Alle NFL-Spiele der Saison 2023</h3>
        <p>1. Spieltag: Donnerstag, 7. September</p>
        <p>20:15 Uhr: Team A @ Team B live on <a href="/stream/x">Sender</a></p>
        <p>22:05 Uhr: Team C @ Team D live im Stream auf <a href="/stream/y">ran.de</a></p>
    "#;

    #[test]
    fn test_parse_full_page() {
        let schedule = parse_broadcast_page(&page(FULL_BODY)).unwrap();

        assert_eq!(schedule.season.as_deref(), Some("2023"));
        assert_eq!(schedule.gameday.as_deref(), Some("1. Spieltag"));
        assert_eq!(schedule.date.as_deref(), Some("7. September"));
        assert_eq!(schedule.games.len(), 2);

        let game = &schedule.games[0];
        assert_eq!(game.kickoff, "20:15");
        assert_eq!(game.title, "Team A @ Team B");
        assert_eq!(game.broadcaster, "Sender");
        assert_eq!(game.url, "https://www.ran.de/stream/x");
    }

    #[test]
    fn test_missing_content_area_is_fatal() {
        let html = "<html><body><div class='other'>nothing</div></body></html>";
        let result = parse_broadcast_page(html);
        assert!(matches!(result, Err(NotifierError::StructureNotFound(_))));
    }

    #[test]
    fn test_missing_formatted_text_is_fatal() {
        let html = r#"<html><body>
            <div class="content-area left-container"><div class="teaser">x</div></div>
            </body></html>"#;
        let result = parse_broadcast_page(html);
        match result {
            Err(NotifierError::StructureNotFound(marker)) => {
                assert!(marker.contains("formatted-text"));
            }
            other => panic!("expected StructureNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_formatted_text_as_sibling_of_content_area() {
        let html = r#"<html><body>
            <div class="content-area left-container"><div class="teaser">x</div></div>
            <div class="formatted-text"><h3>Saison 2024</h3></div>
            </body></html>"#;
        let schedule = parse_broadcast_page(html).unwrap();
        assert_eq!(schedule.season.as_deref(), Some("2024"));
    }

    #[test]
    fn test_formatted_text_nested_in_later_sibling() {
        let html = r#"<html><body>
            <div class="content-area left-container"><div class="teaser">x</div></div>
            <div class="wrapper">
              <div class="inner">
                <div class="formatted-text"><h3>Saison 2024</h3></div>
              </div>
            </div>
            </body></html>"#;
        let schedule = parse_broadcast_page(html).unwrap();
        assert_eq!(schedule.season.as_deref(), Some("2024"));
    }

    #[test]
    fn test_content_area_class_must_match_exactly() {
        // extra class on the marker div means the structure changed
        let html = r#"<html><body>
            <div class="content-area left-container wide">
              <div class="formatted-text"><h3>Saison 2023</h3></div>
            </div></body></html>"#;
        assert!(matches!(
            parse_broadcast_page(html),
            Err(NotifierError::StructureNotFound(_))
        ));
    }

    #[test]
    fn test_first_season_wins() {
        let body = r#"
            <h3>Saison 2023</h3>
            <h3>Saison 2024</h3>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.season.as_deref(), Some("2023"));
    }

    #[test]
    fn test_valueless_season_heading_does_not_fill_slot() {
        // a bare marker heading must keep the slot open for the real one
        let body = r#"
            <h3>NFL Saison</h3>
            <h3>Saison 2023</h3>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.season.as_deref(), Some("2023"));
    }

    #[test]
    fn test_valueless_season_heading_alone_yields_no_season() {
        let schedule = parse_broadcast_page(&page("<h3>NFL Saison</h3>")).unwrap();
        assert!(schedule.season.is_none());
    }

    #[test]
    fn test_season_heading_with_attributes_is_ignored() {
        let body = r#"
            <h3 class="headline">Saison 2022</h3>
            <h3>Saison 2023</h3>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.season.as_deref(), Some("2023"));
    }

    #[test]
    fn test_gameday_with_empty_payload_is_skipped() {
        let body = r#"
            <p>1. Spieltag: </p>
            <p>2. Spieltag: Sonntag, 10. September</p>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.gameday.as_deref(), Some("2. Spieltag"));
        assert_eq!(schedule.date.as_deref(), Some("10. September"));
    }

    #[test]
    fn test_gameday_without_comma_is_skipped() {
        let body = "<p>1. Spieltag: 7. September</p>";
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert!(schedule.gameday.is_none());
        assert!(schedule.date.is_none());
    }

    #[test]
    fn test_first_gameday_wins() {
        let body = r#"
            <p>1. Spieltag: Donnerstag, 7. September</p>
            <p>2. Spieltag: Sonntag, 10. September</p>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.gameday.as_deref(), Some("1. Spieltag"));
        assert_eq!(schedule.date.as_deref(), Some("7. September"));
    }

    #[test]
    fn test_sponsor_hashtag_is_never_a_game() {
        let body = r#"
            <p>20:15 Uhr: gemeinsam #ranNFLsüchtig sein mit <a href="/sponsor">ran</a></p>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert!(schedule.games.is_empty());
    }

    #[test]
    fn test_game_without_link_is_skipped() {
        let body = "<p>20:15 Uhr: Team A @ Team B live on Sender</p>";
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert!(schedule.games.is_empty());
    }

    #[test]
    fn test_game_with_nbsp_padding() {
        // U+00A0 between time and "Uhr" as served by the live page
        let body =
            "<p>20:15\u{a0}Uhr: Team A @ Team B live on <a href=\"/stream/x\">Sender</a></p>";
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.games.len(), 1);
        assert_eq!(schedule.games[0].kickoff, "20:15");
    }

    #[test]
    fn test_game_title_stops_before_live_suffix() {
        let body = r#"<p>18:30 Uhr: Eagles @ Patriots live im Free-TV auf <a href="/tv">ProSieben</a></p>"#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.games[0].title, "Eagles @ Patriots");
        assert_eq!(schedule.games[0].broadcaster, "ProSieben");
        assert_eq!(schedule.games[0].url, "https://www.ran.de/tv");
    }

    #[test]
    fn test_malformed_game_paragraph_is_skipped() {
        // contains "Uhr:" but no ": " split point after NBSP normalization
        let body = r#"<p>Uhr:<a href="/x">S</a></p>"#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert!(schedule.games.is_empty());
    }

    #[test]
    fn test_games_accumulate_without_dedup() {
        let body = r#"
            <p>20:15 Uhr: Team A @ Team B live on <a href="/stream/x">Sender</a></p>
            <p>20:15 Uhr: Team A @ Team B live on <a href="/stream/x">Sender</a></p>
        "#;
        let schedule = parse_broadcast_page(&page(body)).unwrap();
        assert_eq!(schedule.games.len(), 2);
        assert_eq!(schedule.games[0], schedule.games[1]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = page(FULL_BODY);
        let first = parse_broadcast_page(&html).unwrap();
        let second = parse_broadcast_page(&html).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        /// Later season headings never override the first one, regardless of
        /// how many well-formed headings follow it.
        #[test]
        fn prop_first_season_always_wins(extra in proptest::collection::vec("[0-9]{4}", 1..5)) {
            let mut body = String::from("<h3>Saison 2023</h3>");
            for year in &extra {
                body.push_str(&format!("<h3>Saison {}</h3>", year));
            }

            let schedule = parse_broadcast_page(&page(&body)).unwrap();
            prop_assert_eq!(schedule.season.as_deref(), Some("2023"));
        }

        /// Parsing the same document twice yields identical schedules.
        #[test]
        fn prop_idempotent(team_a in "[A-Za-z ]{1,20}", team_b in "[A-Za-z ]{1,20}") {
            let body = format!(
                "<h3>Saison 2023</h3>\
                 <p>1. Spieltag: Donnerstag, 7. September</p>\
                 <p>20:15 Uhr: {} @ {} live on <a href=\"/s\">Sender</a></p>",
                team_a.trim(), team_b.trim()
            );
            let html = page(&body);
            let first = parse_broadcast_page(&html).unwrap();
            let second = parse_broadcast_page(&html).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
