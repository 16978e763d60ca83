mod client;

pub use client::GeostoreClient;
