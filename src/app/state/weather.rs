use super::*;
use crate::data::{geoip::detect_location, weather::WeatherError};

impl AppState {
    /// Without an API key no request can succeed, so the weather path stays
    /// idle and the panel names the cause.
    pub(crate) fn weather_configured(&mut self) -> bool {
        if self.weather_client.has_api_key() {
            return true;
        }
        if self.refresh_meta.last_error.is_none() {
            tracing::warn!("no OpenWeatherMap API key; live weather disabled");
            self.refresh_meta.last_error = Some(WeatherError::MissingApiKey.to_string());
        }
        false
    }

    pub(crate) fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>, cli: &Cli) {
        if self.fetch_in_flight || !self.weather_configured() {
            return;
        }
        self.fetch_in_flight = true;
        self.refresh_meta.mark_attempt(chrono::Utc::now());

        if let Some(location) = self.location.clone() {
            self.fetch_weather(tx, location);
            return;
        }
        if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
            let location = Location::from_coords(lat, lon);
            self.location = Some(location.clone());
            self.fetch_weather(tx, location);
            return;
        }
        let tx2 = tx.clone();
        let url = cli.geoip_url.clone();
        tokio::spawn(async move {
            let location = detect_location(&url).await;
            let _ = tx2.send(AppEvent::LocationResolved(location)).await;
        });
    }

    pub(crate) fn fetch_failed(&mut self, tx: &mpsc::Sender<AppEvent>, err: String) {
        tracing::warn!(error = %err, "weather fetch failed");
        self.fetch_in_flight = false;
        self.refresh_meta.mark_failure(err);
        schedule_retry(tx.clone(), self.backoff.next_delay());
    }

    pub(crate) fn fetch_weather(&mut self, tx: &mpsc::Sender<AppEvent>, location: Location) {
        let client = self.weather_client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            match client.fetch(&location).await {
                Ok(report) => {
                    let _ = tx2.send(AppEvent::WeatherFetched(report)).await;
                }
                Err(err) => {
                    let _ = tx2.send(AppEvent::WeatherFailed(format!("{err:#}"))).await;
                }
            }
        });
    }
}
