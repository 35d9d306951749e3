use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;

use crate::front::audio::{AudioClip, Playback};

const AUDIO_ID: &str = "arty-narration";

const PLAY_JS: &str = r#"
const audio = document.getElementById("arty-narration");
try {
    await audio.play();
    dioxus.send(true);
} catch (error) {
    console.warn(error);
    dioxus.send(false);
}
"#;

const PAUSE_JS: &str = r#"
const audio = document.getElementById("arty-narration");
if (audio) audio.pause();
dioxus.send(true);
"#;

#[component]
pub fn AudioPlayer(clip: AudioClip) -> Element {
    let b = classnames::classname("audio-player");
    let mut playback = use_signal(Playback::default);

    // A new answer starts paused.
    use_effect(use_reactive!(|clip| {
        debug!("Narration ready ({} bytes)", clip.len());
        playback.set(Playback::default());
    }));

    let toggle = move |_| {
        let playing = playback.write().toggle();
        spawn(async move {
            let mut eval = document::eval(if playing { PLAY_JS } else { PAUSE_JS });
            match eval.recv::<bool>().await {
                Ok(true) => {}
                Ok(false) => {
                    warn!("Narration could not start");
                    playback.write().failed();
                }
                Err(error) => {
                    warn!("Narration control failed: {:?}", error);
                    playback.write().failed();
                }
            }
        });
    };

    let playing = playback.read().is_playing();
    let src = clip.data_url();

    rsx! {
        div { class: b.to_string(),
            audio {
                id: AUDIO_ID,
                src: "{src}",
                preload: "auto",
                onended: move |_| playback.write().ended(),
            }
            button {
                class: b.el("toggle").maybe_attr("playing", playing).to_string(),
                onclick: toggle,
                if playing { "⏸ Pause" } else { "▶ Listen" }
            }
        }
    }
}
