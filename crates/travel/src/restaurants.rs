use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    push_separator, scalar_text, DataList, Fetched, NestedList, TravelClient, TravelError,
    LOCATION_NOT_FOUND, NO_RESTAURANTS,
};

const SEARCH_LOCATION: &str = "/api/v1/restaurant/searchLocation";
const SEARCH_RESTAURANTS: &str = "/api/v1/restaurant/searchRestaurants";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantLocation {
    #[serde(default)]
    location_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Restaurant {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    establishment_type_and_cuisine_tags: Option<Vec<String>>,
    #[serde(default)]
    average_rating: Value,
    #[serde(default)]
    has_menu: Option<bool>,
    #[serde(default)]
    menu_url: Option<String>,
    #[serde(default)]
    current_open_status_text: Option<String>,
}

impl TravelClient {
    #[instrument(skip(self))]
    pub async fn get_restaurants(&self, name: &str) -> Result<String, TravelError> {
        let locations = match self
            .fetch::<DataList<RestaurantLocation>>(SEARCH_LOCATION, &[("query", name.to_string())])
            .await?
        {
            Fetched::Data(list) => list.into_items(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve the location with name: {name}. Response text: {body}"
                ))
            }
        };

        let Some(location_id) = locations
            .first()
            .and_then(|location| scalar_text(&location.location_id))
        else {
            return Ok(LOCATION_NOT_FOUND.to_string());
        };

        let restaurants = match self
            .fetch::<NestedList<Restaurant>>(
                SEARCH_RESTAURANTS,
                &[("locationId", location_id.clone())],
            )
            .await?
        {
            Fetched::Data(list) => list.into_items(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve the location with ID: {location_id}. Response text: {body}"
                ))
            }
        };

        if restaurants.is_empty() {
            return Ok(NO_RESTAURANTS.to_string());
        }

        let output = format_restaurants(&restaurants);
        debug!(location_id = %location_id, records = restaurants.len(), "restaurants retrieved");
        Ok(output)
    }
}

fn format_restaurants(restaurants: &[Restaurant]) -> String {
    let mut output = String::new();

    for restaurant in restaurants {
        output.push_str(&format!(
            "Restaurant Name: {}\n",
            restaurant.name.as_deref().unwrap_or("Unknown")
        ));

        if let Some(tags) = restaurant
            .establishment_type_and_cuisine_tags
            .as_ref()
            .filter(|tags| !tags.is_empty())
        {
            output.push_str(&format!("Cuisine Types: {}\n", tags.join(",")));
        }

        output.push_str(&format!(
            "Average Rating: {}\n",
            scalar_text(&restaurant.average_rating).unwrap_or_else(|| "n/a".to_string())
        ));

        if restaurant.has_menu.unwrap_or(false) {
            if let Some(menu_url) = restaurant.menu_url.as_deref() {
                output.push_str(&format!("Menu URL: {menu_url}\n"));
            }
        }

        if let Some(status) = restaurant.current_open_status_text.as_deref() {
            output.push_str(status);
            output.push('\n');
        }

        push_separator(&mut output);
    }

    output
}
