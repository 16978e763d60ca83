pub mod cartodb;
pub mod geostore;

#[cfg(test)]
pub(crate) mod fake_http;
