//! Seams to the two remote dependencies: the CartoDB SQL API and the
//! geostore microservice.

pub mod geostore_api;
pub mod sql_api;
