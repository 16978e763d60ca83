//! Alert statistics by country, province, land-use polygon, protected area
//! or arbitrary geostore polygon.

mod service;
mod types;
mod use_table;
pub mod validate;

pub use service::AlertsService;
pub use types::{AlertResult, LatestDate, QueryOptions};
pub use use_table::UseTable;
