use dioxus::logger::tracing::{error, warn};
use dioxus::prelude::*;
use serde::Deserialize;

use crate::front::camera::{CameraAttempt, CameraFlow, CameraPhase, CameraStream};

const VIDEO_ID: &str = "arty-camera";

fn open_script(id: u64) -> String {
    format!(
        r#"
window.__artyCameras = window.__artyCameras || {{}};
window.__artyClosedCameras = window.__artyClosedCameras || {{}};
try {{
    const stream = await navigator.mediaDevices.getUserMedia({{ video: {{ facingMode: "environment" }} }});
    const video = document.getElementById("{VIDEO_ID}");
    if (window.__artyClosedCameras[{id}] || !video) {{
        stream.getTracks().forEach((track) => track.stop());
        dioxus.send({{ granted: false, reason: "closed" }});
    }} else {{
        window.__artyCameras[{id}] = stream;
        video.srcObject = stream;
        dioxus.send({{ granted: true, reason: null }});
    }}
}} catch (error) {{
    dioxus.send({{ granted: false, reason: String((error && error.name) || error) }});
}}
"#
    )
}

/// Stops the stream of attempt `id` and marks the attempt closed, so a
/// permission grant that lands afterwards is stopped on arrival.
fn stop_script(id: u64) -> String {
    format!(
        r#"
window.__artyClosedCameras = window.__artyClosedCameras || {{}};
window.__artyClosedCameras[{id}] = true;
const cameras = window.__artyCameras || {{}};
const stream = cameras[{id}];
if (stream) {{
    stream.getTracks().forEach((track) => track.stop());
    delete cameras[{id}];
}}
const video = document.getElementById("{VIDEO_ID}");
if (video && stream && video.srcObject === stream) video.srcObject = null;
"#
    )
}

const CAPTURE_JS: &str = r#"
const video = document.getElementById("arty-camera");
if (!video || !video.videoWidth) {
    dioxus.send(null);
} else {
    const canvas = document.createElement("canvas");
    canvas.width = video.videoWidth;
    canvas.height = video.videoHeight;
    canvas.getContext("2d").drawImage(video, 0, 0, canvas.width, canvas.height);
    dioxus.send(canvas.toDataURL("image/jpeg", 0.85));
}
"#;

#[derive(Debug, Deserialize)]
struct Grant {
    granted: bool,
    reason: Option<String>,
}

/// Stream held by the page, addressed by the permission attempt that opened it.
#[derive(Debug)]
pub struct BrowserCamera {
    id: u64,
}

impl CameraStream for BrowserCamera {
    fn stop(&mut self) {
        document::eval(&stop_script(self.id));
    }

    fn abandon(attempt: CameraAttempt) {
        document::eval(&stop_script(attempt.id()));
    }
}

/// Live preview with a capture button. The captured frame is handed to
/// `on_capture`; the parent owns the question it starts.
#[component]
pub fn CameraView(busy: bool, on_close: EventHandler<()>, on_capture: EventHandler<String>) -> Element {
    let b = classnames::classname("camera");
    let mut flow = use_signal(CameraFlow::<BrowserCamera>::default);

    use_effect(move || {
        let Some(attempt) = flow.write().open() else {
            return;
        };
        spawn(async move {
            let mut eval = document::eval(&open_script(attempt.id()));
            match eval.recv::<Grant>().await {
                Ok(Grant { granted: true, .. }) => {
                    flow.write().granted(attempt, BrowserCamera { id: attempt.id() });
                }
                Ok(Grant { reason, .. }) => flow.write().denied(attempt, reason),
                Err(failure) => flow.write().denied(attempt, Some(format!("{failure:?}"))),
            }
        });
    });

    use_drop(move || {
        if let Ok(mut flow) = flow.try_write() {
            flow.close();
        }
    });

    let close = move |_| {
        flow.write().close();
        on_close.call(());
    };

    let capture = move |_| {
        if busy || !flow.write().begin_capture() {
            return;
        }
        spawn(async move {
            let mut eval = document::eval(CAPTURE_JS);
            let frame = eval.recv::<Option<String>>().await;
            flow.write().finish_capture(false);
            match frame {
                Ok(Some(image)) => on_capture.call(image),
                Ok(None) => warn!("No camera frame available yet"),
                Err(failure) => error!("Frame capture failed: {:?}", failure),
            }
        });
    };

    let phase = flow.read().phase().clone();
    let capturing = busy || flow.read().is_capturing();

    rsx! {
        div { class: b.to_string(),
            div { class: b.el("header").to_string(),
                h2 { class: b.el("title").to_string(), "Show me an exhibit" }
                button { class: b.el("close").to_string(), title: "Close camera", onclick: close, "✕" }
            }
            match &phase {
                CameraPhase::Denied(message) => rsx! {
                    div { class: b.el("error").to_string(),
                        p { "{message}" }
                        button { class: b.el("dismiss").to_string(), onclick: close, "OK" }
                    }
                },
                _ => rsx! {
                    video {
                        id: VIDEO_ID,
                        class: b.el("preview").to_string(),
                        autoplay: true,
                        muted: true,
                        "playsinline": "true",
                    }
                    if phase == CameraPhase::Streaming {
                        button {
                            class: b.el("capture").maybe_attr("busy", capturing).to_string(),
                            disabled: capturing,
                            onclick: capture,
                            if capturing { "Looking closely..." } else { "📸 What is this?" }
                        }
                    } else {
                        p { class: b.el("status").to_string(), "Waking up the camera..." }
                    }
                },
            }
        }
    }
}
