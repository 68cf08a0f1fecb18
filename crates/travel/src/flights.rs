use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    push_separator, scalar_text, Fetched, TravelClient, TravelError, NO_FLIGHTS,
    ROUND_TRIP_NEEDS_RETURN,
};

const SEARCH_FLIGHTS: &str = "/api/v1/flights/searchFlights";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceClass {
    #[default]
    #[serde(alias = "ECONOMY")]
    Economy,
    #[serde(alias = "PREMIUM_ECONOMY")]
    PremiumEconomy,
    #[serde(alias = "BUSINESS")]
    Business,
    #[serde(alias = "FIRST")]
    First,
}

impl ServiceClass {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "economy" => Some(Self::Economy),
            "premium_economy" => Some(Self::PremiumEconomy),
            "business" => Some(Self::Business),
            "first" => Some(Self::First),
            _ => None,
        }
    }

    fn as_api_code(self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    #[serde(rename = "sourceAirport")]
    pub source_airport: String,
    #[serde(rename = "destAirport")]
    pub dest_airport: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub round_trip: bool,
    #[serde(default)]
    pub return_year: Option<i32>,
    #[serde(default)]
    pub return_month: Option<u32>,
    #[serde(default)]
    pub return_day: Option<u32>,
    #[serde(default = "default_adults")]
    pub num_adults: u32,
    #[serde(default)]
    pub num_seniors: u32,
    #[serde(default)]
    pub service_class: ServiceClass,
}

fn default_adults() -> u32 {
    1
}

impl FlightQuery {
    fn departure(&self) -> Result<NaiveDate, TravelError> {
        calendar_date(self.year, self.month, self.day)
    }

    fn return_date(&self) -> Result<Option<NaiveDate>, TravelError> {
        match (self.return_year, self.return_month, self.return_day) {
            (Some(year), Some(month), Some(day)) => calendar_date(year, month, day).map(Some),
            _ => Ok(None),
        }
    }
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, TravelError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(TravelError::InvalidDate {
        tool: "get_flights",
        year,
        month,
        day,
    })
}

#[derive(Debug, Deserialize)]
struct FlightSearch {
    #[serde(default)]
    data: Option<FlightData>,
}

#[derive(Debug, Deserialize)]
struct FlightData {
    #[serde(default)]
    flights: Option<Vec<Itinerary>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Itinerary {
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    purchase_links: Vec<PurchaseLink>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Leg {
    #[serde(default)]
    origin_station_code: String,
    #[serde(default)]
    destination_station_code: String,
    #[serde(default)]
    departure_date_time: String,
    #[serde(default)]
    arrival_date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseLink {
    #[serde(default)]
    total_price: Value,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    url: String,
}

impl TravelClient {
    #[instrument(skip(self), fields(from = %query.source_airport, to = %query.dest_airport))]
    pub async fn get_flights(&self, query: &FlightQuery) -> Result<String, TravelError> {
        let departure = query.departure()?;
        let return_date = query.return_date()?;

        let mut params = vec![
            ("sourceAirportCode", query.source_airport.trim().to_uppercase()),
            ("destinationAirportCode", query.dest_airport.trim().to_uppercase()),
            ("date", departure.format("%Y-%m-%d").to_string()),
            ("sortOrder", "ML_BEST_VALUE".to_string()),
            ("numAdults", query.num_adults.to_string()),
            ("numSeniors", query.num_seniors.to_string()),
            ("classOfService", query.service_class.as_api_code().to_string()),
            ("currencyCode", "USD".to_string()),
        ];

        if query.round_trip {
            let Some(return_date) = return_date else {
                return Ok(ROUND_TRIP_NEEDS_RETURN.to_string());
            };
            params.push(("itineraryType", "ROUND_TRIP".to_string()));
            params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
        } else {
            params.push(("itineraryType", "ONE_WAY".to_string()));
        }

        let itineraries = match self.fetch::<FlightSearch>(SEARCH_FLIGHTS, &params).await? {
            Fetched::Data(search) => search
                .data
                .and_then(|data| data.flights)
                .unwrap_or_default(),
            Fetched::Rejected(body) => {
                return Ok(format!(
                    "Not able to retrieve flights from {} to {}. Response text: {body}",
                    query.source_airport, query.dest_airport
                ))
            }
        };

        if itineraries.is_empty() {
            return Ok(NO_FLIGHTS.to_string());
        }

        debug!(records = itineraries.len(), "flights retrieved");
        Ok(format_itineraries(&itineraries))
    }
}

fn format_itineraries(itineraries: &[Itinerary]) -> String {
    let mut output = String::new();

    for (index, itinerary) in itineraries.iter().enumerate() {
        output.push_str(&format!("Flight {}:\n", index + 1));
        for leg in itinerary.segments.iter().flat_map(|segment| &segment.legs) {
            output.push_str(&format!(
                "{} -> {} departs {} arrives {}\n",
                leg.origin_station_code,
                leg.destination_station_code,
                leg.departure_date_time,
                leg.arrival_date_time
            ));
        }
        for link in &itinerary.purchase_links {
            output.push_str(&format!(
                "Price: {} {} URL: {}\n",
                scalar_text(&link.total_price).unwrap_or_else(|| "n/a".to_string()),
                link.currency,
                link.url
            ));
        }
        push_separator(&mut output);
    }

    output
}
