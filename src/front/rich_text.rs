/// Renders an answer written in GitHub-flavoured markdown to HTML.
///
/// Raw HTML inside the answer is escaped, so the result is safe to inject
/// into the page.
pub fn render(text: &str) -> String {
    match ::markdown::to_html_with_options(text, &::markdown::Options::gfm()) {
        Ok(rendered) => rendered,
        Err(_) => ::markdown::to_html(text),
    }
}
