use crate::audubon::model::EventRecord;
use crate::browser::HeadlessBrowser;
use crate::geocoding::api::GeocodingAPI;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const BASE_URL: &str = "https://www.audubon.org";
const EVENTS_QUERY: &str = "/events?view_type=row&page=";

const CARD_SELECTOR: &str = ".event-card-item";
const LINK_SELECTOR: &str = "a.card-link";
const TIME_SELECTOR: &str = ".event-card-item-header__time--time";
const MONTH_SELECTOR: &str = ".event-card-item-header__month span";
const DAY_SELECTOR: &str = ".event-card-item-header__date span";
const LOCATION_SELECTOR: &str = ".event-card-item-location";

// The national listing gives no per-card audience information
const DEFAULT_AGES: &str = "All ages";

const RENDER_DELAY: Duration = Duration::from_secs(4);

pub struct NationalAudubonAPI;

impl NationalAudubonAPI {
    /**
    Scrapes the national events listing. The cards carry no coordinates,
    so each location goes through the geocoding chain unless the caller
    opted out of it.
    */
    #[tracing::instrument(skip(browser, geocoder))]
    pub async fn get_events(
        browser: &HeadlessBrowser,
        pages: u32,
        geocoder: Option<&GeocodingAPI>,
    ) -> Vec<EventRecord> {
        let mut events = Vec::new();

        for page_num in 1..=pages {
            let url = format!("{}{}{}", BASE_URL, EVENTS_QUERY, page_num);

            info!("Navigating to {}", url);

            let html = match browser.render(&url, RENDER_DELAY).await {
                Ok(html) => html,
                Err(err) => {
                    warn!(
                        "Failed to render National Audubon page {}: {}",
                        page_num, err
                    );
                    continue;
                }
            };

            match parse_events(&html) {
                Ok(mut page_events) => {
                    info!(
                        "Found {} National Audubon events on page {}",
                        page_events.len(),
                        page_num
                    );
                    events.append(&mut page_events);
                }
                Err(err) => {
                    warn!("Failed to parse National Audubon page {}: {}", page_num, err);
                }
            }
        }

        if let Some(geocoder) = geocoder {
            for event in events.iter_mut() {
                if let Some(coordinates) = geocoder.resolve(&event.location).await {
                    event.latitude = Some(coordinates.latitude);
                    event.longitude = Some(coordinates.longitude);
                }
            }
        }

        events
    }
}

/// Pure HTML-to-records step; coordinates stay unresolved here.
pub fn parse_events(html: &str) -> Result<Vec<EventRecord>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR)?;

    let mut events = Vec::new();

    for (index, card) in document.select(&card_selector).enumerate() {
        match parse_card(&card) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!("Error parsing National Audubon card {}: {}", index + 1, err);
            }
        }
    }

    Ok(events)
}

fn parse_card(card: &ElementRef) -> Result<EventRecord, Box<dyn Error>> {
    let link_selector = Selector::parse(LINK_SELECTOR)?;
    let link = card
        .select(&link_selector)
        .next()
        .ok_or("Card has no link")?;

    let title = element_text(link);
    let href = link.attr("href").ok_or("Card link has no href")?;
    let url = Url::parse(BASE_URL)?.join(href)?.to_string();

    let time_selector = Selector::parse(TIME_SELECTOR)?;
    let time_text = card
        .select(&time_selector)
        .next()
        .map(element_text)
        .ok_or("Card has no time")?;

    let month_selector = Selector::parse(MONTH_SELECTOR)?;
    let month = card
        .select(&month_selector)
        .map(element_text)
        .filter(|month| !month.is_empty())
        .last()
        .ok_or("Card has no month")?;

    let day_selector = Selector::parse(DAY_SELECTOR)?;
    let day = card
        .select(&day_selector)
        .next()
        .map(element_text)
        .ok_or("Card has no day")?;

    let location_selector = Selector::parse(LOCATION_SELECTOR)?;
    let location = card
        .select(&location_selector)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Ok(EventRecord::new(
        title,
        format!("{} {} - {}", month, day, time_text),
        DEFAULT_AGES.to_string(),
        location,
        None,
        url,
    ))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_FIXTURE: &str = r##"
        <html><body>
          <div class="event-card-item">
            <a class="card-link" href="/events/morning-bird-walk">Morning Bird Walk</a>
            <div class="event-card-item-header__month"><span> </span><span>Aug</span></div>
            <div class="event-card-item-header__date"><span>15</span><span>16</span></div>
            <span class="event-card-item-header__time--time">8:00 am</span>
            <div class="event-card-item-location">Greenwich Audubon Center, Greenwich, CT</div>
          </div>
          <div class="event-card-item">
            <div class="event-card-item-header__month"><span>Sep</span></div>
          </div>
        </body></html>
    "##;

    #[test_log::test]
    fn should_parse_a_full_card_and_skip_a_linkless_one() {
        let events = parse_events(LISTING_FIXTURE).unwrap();

        assert_eq!(events.len(), 1);

        let event = &events[0];

        assert_eq!(event.title, "Morning Bird Walk");
        assert_eq!(event.date, "Aug 15 - 8:00 am");
        assert_eq!(event.ages, "All ages");
        assert_eq!(event.location, "Greenwich Audubon Center, Greenwich, CT");
        assert_eq!(event.latitude, None);
        assert_eq!(event.longitude, None);
        assert_eq!(event.url, "https://www.audubon.org/events/morning-bird-walk");
    }

    #[test_log::test]
    fn should_take_the_last_non_empty_month_span() {
        let events = parse_events(
            r##"
            <div class="event-card-item">
              <a class="card-link" href="https://act.audubon.org/owl-night">Owl Night</a>
              <div class="event-card-item-header__month"><span>Aug</span><span>Sep</span><span> </span></div>
              <div class="event-card-item-header__date"><span>2</span></div>
              <span class="event-card-item-header__time--time">7:30 pm</span>
              <div class="event-card-item-location">Savannah, NY</div>
            </div>
            "##,
        )
        .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "Sep 2 - 7:30 pm");
        // Absolute hrefs survive the join untouched
        assert_eq!(events[0].url, "https://act.audubon.org/owl-night");
    }
}
