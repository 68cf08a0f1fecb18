use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    push_separator, scalar_text, DataList, Fetched, NestedList, TravelClient, TravelError,
    LOCATION_NOT_FOUND, NO_HOTELS,
};

const SEARCH_LOCATION: &str = "/api/v1/hotels/searchLocation";
const SEARCH_HOTELS: &str = "/api/v1/hotels/searchHotels";
const STAY_NIGHTS: i64 = 2;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelLocation {
    #[serde(default)]
    geo_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hotel {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    primary_info: Option<String>,
    #[serde(default)]
    secondary_info: Option<String>,
    #[serde(default)]
    bubble_rating: Option<BubbleRating>,
}

#[derive(Debug, Deserialize)]
struct BubbleRating {
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    count: Value,
}

impl TravelClient {
    pub async fn get_hotels(&self, name: &str) -> Result<String, TravelError> {
        self.get_hotels_from(name, Local::now().date_naive()).await
    }

    #[instrument(skip(self))]
    pub async fn get_hotels_from(
        &self,
        name: &str,
        check_in: NaiveDate,
    ) -> Result<String, TravelError> {
        let locations = match self
            .fetch::<DataList<HotelLocation>>(SEARCH_LOCATION, &[("query", name.to_string())])
            .await?
        {
            Fetched::Data(list) => list.into_items(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve the location with name: {name}. Response text: {body}"
                ))
            }
        };

        let Some(geo_id) = locations
            .first()
            .and_then(|location| scalar_text(&location.geo_id))
        else {
            return Ok(LOCATION_NOT_FOUND.to_string());
        };

        let check_out = check_in + Duration::days(STAY_NIGHTS);
        let query = [
            ("geoId", geo_id.clone()),
            ("checkIn", check_in.format("%Y-%m-%d").to_string()),
            ("checkOut", check_out.format("%Y-%m-%d").to_string()),
        ];

        let hotels = match self.fetch::<NestedList<Hotel>>(SEARCH_HOTELS, &query).await? {
            Fetched::Data(list) => list.into_items(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve the hotels at location: {name}. Response text: {body}"
                ))
            }
        };

        if hotels.is_empty() {
            return Ok(NO_HOTELS.to_string());
        }

        debug!(geo_id = %geo_id, records = hotels.len(), "hotels retrieved");
        Ok(format_hotels(&hotels))
    }
}

fn format_hotels(hotels: &[Hotel]) -> String {
    let mut output = String::new();

    for hotel in hotels {
        output.push_str(&format!(
            "Hotel Name: {}\n",
            hotel.title.as_deref().unwrap_or("Unknown")
        ));
        for info in [&hotel.primary_info, &hotel.secondary_info]
            .into_iter()
            .flatten()
        {
            output.push_str(info);
            output.push('\n');
        }
        if let Some(bubble) = &hotel.bubble_rating {
            output.push_str(&format!(
                "Rated {} by {} users\n",
                scalar_text(&bubble.rating).unwrap_or_else(|| "n/a".to_string()),
                scalar_text(&bubble.count).unwrap_or_else(|| "0".to_string())
            ));
        }
        push_separator(&mut output);
    }

    output
}
