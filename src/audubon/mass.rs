use crate::audubon::model::EventRecord;
use crate::browser::HeadlessBrowser;
use crate::geocoding::model::Coordinates;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const BASE_URL: &str = "https://www.massaudubon.org";
// Audience filter narrows the listing to family/children programs
const PROGRAMS_QUERY: &str = "/programs?prg%5Baudiences%5D%5B0%5D=864&prg%5Baudiences%5D%5B1%5D=865&page=";

const CARD_SELECTOR: &str = ".event-card";
const TITLE_SELECTOR: &str = ".event-card__content__title";
const DATE_SELECTOR: &str = ".event-card__content__date";
const AGES_SELECTOR: &str = ".event-card__content__ages";
const PLACE_SELECTOR: &str = ".event-card__content__place";
const PLACE_PART_SELECTOR: &str = ".ezstring-field";
const LINK_SELECTOR: &str = "a";

const RENDER_DELAY: Duration = Duration::from_secs(5);

pub struct MassAudubonAPI;

impl MassAudubonAPI {
    /**
    Scrapes the family program listing, one rendered page at a time.
    Card-level failures are logged and skipped.
    */
    #[tracing::instrument(skip(browser))]
    pub async fn get_events(browser: &HeadlessBrowser, pages: u32) -> Vec<EventRecord> {
        let mut events = Vec::new();

        for page_num in 1..=pages {
            let url = format!("{}{}{}", BASE_URL, PROGRAMS_QUERY, page_num);

            info!("Navigating to {}", url);

            let html = match browser.render(&url, RENDER_DELAY).await {
                Ok(html) => html,
                Err(err) => {
                    warn!("Failed to render Mass Audubon page {}: {}", page_num, err);
                    continue;
                }
            };

            match parse_events(&html) {
                Ok(mut page_events) => {
                    info!(
                        "Found {} Mass Audubon events on page {}",
                        page_events.len(),
                        page_num
                    );
                    events.append(&mut page_events);
                }
                Err(err) => {
                    warn!("Failed to parse Mass Audubon page {}: {}", page_num, err);
                }
            }
        }

        events
    }
}

/// Pure HTML-to-records step, kept separate so it can run against fixtures.
pub fn parse_events(html: &str) -> Result<Vec<EventRecord>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR)?;

    let mut events = Vec::new();

    for (index, card) in document.select(&card_selector).enumerate() {
        match parse_card(&card) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!("Error parsing Mass Audubon card {}: {}", index + 1, err);
            }
        }
    }

    Ok(events)
}

fn parse_card(card: &ElementRef) -> Result<EventRecord, Box<dyn Error>> {
    let title = select_text(card, TITLE_SELECTOR)?.ok_or("Card has no title")?;
    let date = select_text(card, DATE_SELECTOR)?.ok_or("Card has no date")?;
    let ages = select_text(card, AGES_SELECTOR)?.ok_or("Card has no age range")?;

    let place_selector = Selector::parse(PLACE_SELECTOR)?;
    let place_part_selector = Selector::parse(PLACE_PART_SELECTOR)?;

    let place_element = card.select(&place_selector).next();
    let coordinates = place_element.and_then(|place| {
        match (place.attr("data-latitude"), place.attr("data-longitude")) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    });
    let location = place_element
        .map(|place| {
            place
                .select(&place_part_selector)
                .map(element_text)
                .filter(|part| !part.is_empty())
                .join(", ")
        })
        .unwrap_or_default();

    let link_selector = Selector::parse(LINK_SELECTOR)?;
    let url = match card
        .select(&link_selector)
        .next()
        .and_then(|link| link.attr("href"))
    {
        Some(href) => Url::parse(BASE_URL)?.join(href)?.to_string(),
        None => String::new(),
    };

    Ok(EventRecord::new(title, date, ages, location, coordinates, url))
}

fn select_text(card: &ElementRef, selector: &'static str) -> Result<Option<String>, Box<dyn Error>> {
    let selector = Selector::parse(selector)?;
    Ok(card.select(&selector).next().map(element_text))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_FIXTURE: &str = r##"
        <html><body>
          <div class="event-card">
            <div class="event-card__content__title"> Owl Prowl </div>
            <div class="event-card__content__date">Fri, Aug 15, 2025</div>
            <div class="event-card__content__ages">Ages 3-6</div>
            <div class="event-card__content__place" data-latitude="42.3601" data-longitude="-71.0589">
              <span class="ezstring-field">Boston Nature Center</span>
              <span class="ezstring-field"> Mattapan </span>
              <span class="ezstring-field">  </span>
            </div>
            <a href="/program/owl-prowl">Details</a>
          </div>
          <div class="event-card">
            <div class="event-card__content__date">Sat, Aug 16, 2025</div>
            <div class="event-card__content__ages">All</div>
          </div>
        </body></html>
    "##;

    #[test_log::test]
    fn should_parse_a_full_card_and_skip_a_broken_one() {
        let events = parse_events(LISTING_FIXTURE).unwrap();

        assert_eq!(events.len(), 1);

        let event = &events[0];

        assert_eq!(event.title, "Owl Prowl");
        assert_eq!(event.date, "Fri, Aug 15, 2025");
        assert_eq!(event.ages, "Ages 3-6");
        assert_eq!(event.location, "Boston Nature Center, Mattapan");
        assert_eq!(event.latitude.as_deref(), Some("42.3601"));
        assert_eq!(event.longitude.as_deref(), Some("-71.0589"));
        assert_eq!(event.url, "https://www.massaudubon.org/program/owl-prowl");
    }

    #[test_log::test]
    fn should_parse_a_card_without_place_data() {
        let events = parse_events(
            r##"
            <div class="event-card">
              <div class="event-card__content__title">Stroller Walk</div>
              <div class="event-card__content__date">Sun, Aug 17, 2025</div>
              <div class="event-card__content__ages">Ages 0-1</div>
            </div>
            "##,
        )
        .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].location, "");
        assert_eq!(events[0].latitude, None);
        assert_eq!(events[0].longitude, None);
        assert_eq!(events[0].url, "");
    }

    #[test_log::test]
    fn should_parse_an_empty_listing() {
        let events = parse_events("<html><body></body></html>").unwrap();

        assert!(events.is_empty());
    }
}
