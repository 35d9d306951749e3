use super::audio::AudioClip;
use crate::prompts::{CAMERA_PROMPT, Suggestion};

pub const GENERIC_ERROR: &str = "Sorry, I had trouble answering that. Can you try asking in a different way?";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one outbound request sequence. Results carrying an outdated
/// ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub audio: Option<AudioClip>,
}

impl Answer {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), audio: None }
    }

    pub fn narrated(text: impl Into<String>, audio: Option<AudioClip>) -> Self {
        Self { text: text.into(), audio }
    }
}

/// In-memory state of the guide page, one per page load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySession {
    pub query: String,
    phase: Phase,
    response: Option<String>,
    error: Option<String>,
    audio: Option<AudioClip>,
    camera_open: bool,
    generation: u64,
}

impl QuerySession {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn audio(&self) -> Option<&AudioClip> {
        self.audio.as_ref()
    }

    pub fn camera_open(&self) -> bool {
        self.camera_open
    }

    /// Suggestions are offered only on a blank page.
    pub fn show_suggestions(&self) -> bool {
        self.phase == Phase::Idle && !self.camera_open
    }

    pub fn can_reset(&self) -> bool {
        matches!(self.phase, Phase::Success | Phase::Error)
    }

    /// Starts a request for `question`. Returns `None` while another request
    /// is in flight or when there is nothing to ask.
    pub fn begin(&mut self, question: &str) -> Option<Ticket> {
        if self.is_loading() || question.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.audio = None;
        Some(Ticket(self.generation))
    }

    /// Starts a request for the typed query.
    pub fn submit(&mut self) -> Option<(Ticket, String)> {
        let question = self.query.trim().to_owned();
        self.begin(&question).map(|ticket| (ticket, question))
    }

    pub fn choose_suggestion(&mut self, suggestion: &Suggestion) -> Option<(Ticket, String)> {
        if self.is_loading() {
            return None;
        }
        self.query = suggestion.text.to_owned();
        self.submit()
    }

    /// Starts the request for a captured photo. It outlives the camera view:
    /// closing the camera does not settle it.
    pub fn begin_photo(&mut self) -> Option<Ticket> {
        self.begin(CAMERA_PROMPT)
    }

    /// A photo answer also closes the camera.
    pub fn succeed_photo(&mut self, ticket: Ticket, answer: Answer) -> bool {
        let stored = self.succeed(ticket, answer);
        if stored {
            self.camera_open = false;
        }
        stored
    }

    /// Stores the answer. Text and audio are revealed together.
    pub fn succeed(&mut self, ticket: Ticket, answer: Answer) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Success;
        self.response = Some(answer.text);
        self.audio = answer.audio;
        true
    }

    pub fn fail(&mut self, ticket: Ticket, message: Option<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Error;
        self.response = None;
        self.error = Some(
            message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ERROR.to_owned()),
        );
        true
    }

    /// Back to a blank page. Anything still in flight is ignored when it lands.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.query.clear();
        self.response = None;
        self.error = None;
        self.audio = None;
    }

    pub fn open_camera(&mut self) {
        self.camera_open = true;
    }

    pub fn close_camera(&mut self) {
        self.camera_open = false;
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.is_loading() && ticket.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::prompts::SUGGESTIONS;

    fn clip() -> AudioClip {
        AudioClip::new(Bytes::from_static(b"ID3")).unwrap()
    }

    #[test]
    fn submit_moves_to_loading_and_clears_previous_failure() {
        let mut session = QuerySession::default();
        session.query = "Tell me about mummies".into();
        let (ticket, _) = session.submit().unwrap();
        session.fail(ticket, Some("Quota exceeded".into()));
        assert_eq!(session.error(), Some("Quota exceeded"));

        let (_, question) = session.submit().unwrap();
        assert_eq!(question, "Tell me about mummies");
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.error(), None);
        assert_eq!(session.audio(), None);
    }

    #[test]
    fn blank_query_is_not_submitted() {
        let mut session = QuerySession::default();
        session.query = "   ".into();
        assert_eq!(session.submit(), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn second_submit_while_loading_is_ignored() {
        let mut session = QuerySession::default();
        session.query = "Who was Nefertiti?".into();
        assert!(session.submit().is_some());
        assert_eq!(session.submit(), None);
        assert_eq!(session.choose_suggestion(&SUGGESTIONS[0]), None);
        assert_eq!(session.query, "Who was Nefertiti?");
    }

    #[test]
    fn suggestion_fills_query_and_submits() {
        let mut session = QuerySession::default();
        let (_, question) = session.choose_suggestion(&SUGGESTIONS[1]).unwrap();
        assert_eq!(question, SUGGESTIONS[1].text);
        assert_eq!(session.query, SUGGESTIONS[1].text);
        assert!(session.is_loading());
        assert!(!session.show_suggestions());
    }

    #[test]
    fn success_reveals_text_and_audio_together() {
        let mut session = QuerySession::default();
        let ticket = session.begin("Tell me about mummies").unwrap();
        assert_eq!(session.response(), None);
        assert_eq!(session.audio(), None);

        assert!(session.succeed(ticket, Answer::narrated("Mummies are...", Some(clip()))));
        assert_eq!(session.phase(), Phase::Success);
        assert_eq!(session.response(), Some("Mummies are..."));
        assert_eq!(session.audio(), Some(&clip()));
        assert!(session.can_reset());
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let mut session = QuerySession::default();
        let ticket = session.begin("Why?").unwrap();
        assert!(session.fail(ticket, None));
        assert_eq!(session.phase(), Phase::Error);
        assert_eq!(session.error(), Some(GENERIC_ERROR));

        let ticket = session.begin("Why?").unwrap();
        session.fail(ticket, Some(" ".into()));
        assert_eq!(session.error(), Some(GENERIC_ERROR));
    }

    #[test]
    fn reset_clears_everything_and_drops_in_flight_results() {
        let mut session = QuerySession::default();
        session.query = "Tell me about mummies".into();
        let (ticket, _) = session.submit().unwrap();
        session.reset();

        assert!(!session.succeed(ticket, Answer::text("late")));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.query, "");
        assert_eq!(session.response(), None);
        assert!(session.show_suggestions());
    }

    #[test]
    fn reset_is_offered_only_after_a_request_settles() {
        let mut session = QuerySession::default();
        assert!(!session.can_reset());
        let ticket = session.begin("Who built the pyramids?").unwrap();
        assert!(!session.can_reset());
        session.succeed(ticket, Answer::text("Skilled workers"));
        assert!(session.can_reset());
    }

    #[test]
    fn superseded_ticket_is_ignored() {
        let mut session = QuerySession::default();
        let first = session.begin("first").unwrap();
        session.fail(first, None);
        let second = session.begin("second").unwrap();

        assert!(!session.succeed(first, Answer::text("stale")));
        assert!(session.succeed(second, Answer::text("fresh")));
        assert!(!session.fail(second, None));
        assert_eq!(session.response(), Some("fresh"));
    }

    #[test]
    fn photo_answer_closes_camera() {
        let mut session = QuerySession::default();
        session.open_camera();
        let ticket = session.begin_photo().unwrap();
        assert!(session.succeed_photo(ticket, Answer::text("A golden mask!")));
        assert!(!session.camera_open());
        assert_eq!(session.response(), Some("A golden mask!"));
    }

    #[test]
    fn photo_request_settles_after_camera_closed_mid_flight() {
        let mut session = QuerySession::default();
        session.open_camera();
        let ticket = session.begin_photo().unwrap();
        session.close_camera();
        assert!(session.is_loading());

        assert!(session.fail(ticket, Some("Could not reach the museum guide.".into())));
        assert!(session.can_reset());
        session.reset();
        assert!(session.show_suggestions());
        session.query = "Who was Nefertiti?".into();
        assert!(session.submit().is_some());
    }

    #[test]
    fn camera_hides_suggestions() {
        let mut session = QuerySession::default();
        session.open_camera();
        assert!(session.camera_open());
        assert!(!session.show_suggestions());
        session.close_camera();
        assert!(session.show_suggestions());
    }
}
