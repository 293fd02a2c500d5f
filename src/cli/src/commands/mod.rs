pub mod config;
pub mod forums;
pub mod health;
pub mod launches;
pub mod platform;
pub mod products;
pub mod search;
