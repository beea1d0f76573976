use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::weather::Location;

pub const GEOIP_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Best-effort location from the public IP. Any failure yields `None`.
pub async fn detect_location(url: &str) -> Option<Location> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .ok()?;
    let response: IpApiResponse = client
        .get(url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;
    let latitude = response.latitude?;
    let longitude = response.longitude?;
    let location = match response.city.filter(|c| !c.is_empty()) {
        Some(name) => Location {
            name,
            latitude,
            longitude,
        },
        None => Location::from_coords(latitude, longitude),
    };
    Some(location)
}
