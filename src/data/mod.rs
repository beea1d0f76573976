pub mod geoip;
pub mod images;
pub mod weather;
