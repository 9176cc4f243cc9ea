pub mod fetch;
pub mod scrape;
