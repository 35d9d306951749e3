mod audio_player;
mod camera_view;
mod layout;
mod search;

pub use audio_player::AudioPlayer;
pub use camera_view::CameraView;
pub use layout::{API_BASE_URL, App};
pub use search::SearchInterface;
