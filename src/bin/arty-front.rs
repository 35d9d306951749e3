use dioxus::logger::tracing::Level;

use arty::front::App;

fn main() {
    dioxus::logger::init(Level::INFO).expect("logger initialised twice");
    dioxus::launch(App);
}
