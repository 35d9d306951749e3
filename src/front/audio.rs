use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;

/// Narrated answer received from the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Bytes,
}

impl AudioClip {
    pub const MIME: &'static str = "audio/mpeg";

    /// `None` for an empty payload, which has nothing to play.
    pub fn new(bytes: Bytes) -> Option<Self> {
        (!bytes.is_empty()).then_some(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Source usable directly by an `<audio>` element.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", Self::MIME, STANDARD.encode(&self.bytes))
    }
}

/// Play/pause state of the player. Starts paused; no autoplay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Playback {
    playing: bool,
}

impl Playback {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flips the state and returns the new one.
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn ended(&mut self) {
        self.playing = false;
    }

    pub fn failed(&mut self) {
        self.playing = false;
    }
}
