use dioxus::logger::tracing::{error, warn};
use dioxus::prelude::*;

use super::{AudioPlayer, CameraView};
use crate::{
    client::ApiClient,
    front::{
        actions::{ask_guide, describe_photo},
        rich_text,
        session::{QuerySession, Ticket},
    },
    prompts::SUGGESTIONS,
};

#[component]
pub fn SearchInterface() -> Element {
    let b = classnames::classname("search");
    let client = use_context::<ApiClient>();
    let mut session = use_signal(QuerySession::default);

    let ask = use_callback({
        let client = client.clone();
        move |(ticket, question): (Ticket, String)| {
            let client = client.clone();
            spawn(async move {
                match ask_guide(&client, &question).await {
                    Ok(answer) => {
                        session.write().succeed(ticket, answer);
                    }
                    Err(failure) => {
                        error!("Question failed: {}", failure);
                        session.write().fail(ticket, Some(failure.to_string()));
                    }
                }
            });
        }
    });

    // Owned here rather than by the camera view, so closing the camera
    // never strands the request.
    let ask_photo = use_callback(move |image: String| {
        let Some(ticket) = session.write().begin_photo() else {
            warn!("Photo ignored while another question is in flight");
            return;
        };
        let client = client.clone();
        spawn(async move {
            match describe_photo(&client, image).await {
                Ok(answer) => {
                    session.write().succeed_photo(ticket, answer);
                }
                Err(failure) => {
                    error!("Photo question failed: {}", failure);
                    session.write().fail(ticket, Some(failure.to_string()));
                }
            }
        });
    });

    let mut handle_submit = move || {
        if let Some(request) = session.write().submit() {
            ask.call(request);
        }
    };

    let handle_keypress = move |evt: KeyboardEvent| {
        if evt.key() == Key::Enter {
            evt.prevent_default();
            handle_submit();
        }
    };

    let handle_reset = move |_| session.write().reset();

    let state = session.read().clone();
    let loading = state.is_loading();
    let rendered = state.response().map(rich_text::render);

    rsx! {
        div { class: b.to_string(),
            div { class: b.el("input").to_string(),
                input {
                    class: b.el("input-field").to_string(),
                    r#type: "text",
                    placeholder: "What would you like to know?",
                    value: "{state.query}",
                    oninput: move |evt| session.write().query = evt.value(),
                    onkeydown: handle_keypress,
                }
                button {
                    class: b.el("ask").to_string(),
                    disabled: loading || state.query.trim().is_empty(),
                    onclick: move |_| handle_submit(),
                    "Ask"
                }
                button {
                    class: b.el("camera").to_string(),
                    disabled: loading || state.camera_open(),
                    title: "Take a photo of an exhibit",
                    onclick: move |_| session.write().open_camera(),
                    "📷"
                }
            }

            if state.camera_open() {
                CameraView {
                    busy: loading,
                    on_close: move |_| session.write().close_camera(),
                    on_capture: move |image: String| ask_photo.call(image),
                }
            }

            if state.show_suggestions() {
                div { class: b.el("suggestions").to_string(),
                    for suggestion in SUGGESTIONS {
                        button {
                            key: "{suggestion.text}",
                            class: b.el("suggestion").to_string(),
                            onclick: move |_| {
                                if let Some(request) = session.write().choose_suggestion(&suggestion) {
                                    ask.call(request);
                                }
                            },
                            span { class: b.el("suggestion-text").to_string(), "{suggestion.text}" }
                            span { class: b.el("suggestion-description").to_string(), "{suggestion.description}" }
                        }
                    }
                }
            }

            if loading {
                div { class: b.el("loading").to_string(),
                    div { class: b.el("spinner").to_string() }
                    p { "Let me think about that..." }
                }
            }

            if let Some(error) = state.error() {
                div { class: b.el("error").to_string(),
                    p { "{error}" }
                }
            }

            if let Some(html) = rendered {
                div { class: b.el("response").to_string(),
                    if let Some(clip) = state.audio().cloned() {
                        AudioPlayer { clip }
                    }
                    div {
                        class: b.el("response-text").to_string(),
                        dangerous_inner_html: html,
                    }
                }
            }

            if state.can_reset() {
                button {
                    class: b.el("reset").to_string(),
                    onclick: handle_reset,
                    "Ask something else"
                }
            }
        }
    }
}
