pub mod dto;
pub mod prompts;
pub mod service;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod provider;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod front;
