mod client;

pub use client::CartoDbClient;
