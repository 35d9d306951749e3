use dioxus::logger::tracing::{error, info};
use dioxus::prelude::*;

use super::SearchInterface;
use crate::client::ApiClient;

pub static CSS: Asset = asset!("/assets/main.css");

/// Proxy address baked in at build time.
pub const API_BASE_URL: &str = match option_env!("ARTY_API_URL") {
    Some(url) => url,
    None => "http://localhost:3001",
};

#[component]
pub fn App() -> Element {
    let b = classnames::classname("app");
    let client = use_context_provider(|| ApiClient::new(API_BASE_URL));

    // Connectivity check; the page stays usable either way.
    use_future(move || {
        let client = client.clone();
        async move {
            match client.health().await {
                Ok(health) => info!("Proxy at {} says: {}", client.base_url(), health.message),
                Err(error) => error!("Proxy at {} is unreachable: {}", client.base_url(), error),
            }
        }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: CSS }
        div { class: b.to_string(),
            header { class: b.el("header").to_string(),
                h1 { class: b.el("title").to_string(), "Arty" }
                p { class: b.el("subtitle").to_string(), "Your guide to the Neues Museum" }
            }
            main { class: b.el("main").to_string(),
                SearchInterface {}
            }
            footer { class: b.el("footer").to_string(),
                "Ask about mummies, pharaohs and everything in between."
            }
        }
    }
}
