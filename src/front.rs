pub mod actions;
pub mod audio;
pub mod camera;
pub mod rich_text;
pub mod session;

#[cfg(feature = "frontend")]
pub mod components;

#[cfg(feature = "frontend")]
pub use components::App;
