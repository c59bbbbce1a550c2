// Styling workflow: owns all UI state and sequences suggestions -> selection -> image

use crate::gateway::{
    decode_suggestions, GatewayError, PreviewRequest, StylingGateway, SuggestionRequest,
};
use crate::types::{ColorSuggestion, DressCombination, EventType, GeneratedImage, Role};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

pub const SUGGESTING_MESSAGE: &str = "Finding perfect color matches...";
pub const IMAGING_MESSAGE: &str = "Creating your wedding preview...";
pub const SUGGESTIONS_FAILED: &str = "Could not generate color suggestions. Please try again.";
pub const IMAGE_FAILED: &str = "Could not generate the image. The model might be unavailable.";

/// Rejections detected before any request is issued
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a color for either the bride or the groom.")]
    NoColor,
    #[error("Please select a suggested color first.")]
    NoSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Suggesting,
    Suggested,
    Imaging,
    Imaged,
}

/// Result of a gateway call, tagged with the sequence number it was issued under
#[derive(Debug, Clone)]
pub enum Completion {
    Suggestions {
        seq: u64,
        result: Result<String, GatewayError>,
    },
    Preview {
        seq: u64,
        result: Result<String, GatewayError>,
    },
}

/// Single owner of the stylist state.
///
/// Requests are returned as self-contained futures; the caller runs them and
/// feeds the resulting [`Completion`] back through [`Stylist::apply`]. Only
/// the completion of the most recently issued request is applied.
pub struct Stylist<G> {
    gateway: Arc<G>,
    event_type: EventType,
    bride_color: String,
    groom_color: String,
    suggestions: Vec<ColorSuggestion>,
    selected: Option<usize>,
    image: Option<GeneratedImage>,
    phase: Phase,
    resume_phase: Phase,
    error: Option<String>,
    latest_seq: u64,
}

impl<G: StylingGateway> Stylist<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            event_type: EventType::default(),
            bride_color: String::new(),
            groom_color: String::new(),
            suggestions: Vec::new(),
            selected: None,
            image: None,
            phase: Phase::Idle,
            resume_phase: Phase::Idle,
            error: None,
            latest_seq: 0,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn dress_code(&self) -> DressCombination {
        self.event_type.dress_code()
    }

    pub fn bride_color(&self) -> &str {
        &self.bride_color
    }

    pub fn groom_color(&self) -> &str {
        &self.groom_color
    }

    pub fn suggestions(&self) -> &[ColorSuggestion] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_suggestion(&self) -> Option<&ColorSuggestion> {
        self.selected.and_then(|i| self.suggestions.get(i))
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Suggesting | Phase::Imaging)
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Suggesting => Some(SUGGESTING_MESSAGE),
            Phase::Imaging => Some(IMAGING_MESSAGE),
            _ => None,
        }
    }

    fn has_bride_color(&self) -> bool {
        !self.bride_color.trim().is_empty()
    }

    fn has_groom_color(&self) -> bool {
        !self.groom_color.trim().is_empty()
    }

    // The two color fields are mutually exclusive
    pub fn bride_input_enabled(&self) -> bool {
        !self.has_groom_color()
    }

    pub fn groom_input_enabled(&self) -> bool {
        !self.has_bride_color()
    }

    pub fn can_request_suggestions(&self) -> bool {
        self.has_bride_color() || self.has_groom_color()
    }

    pub fn select_event(&mut self, event_type: EventType) {
        self.event_type = event_type;
    }

    /// Returns false when the field is disabled and the edit was dropped
    pub fn set_bride_color(&mut self, value: String) -> bool {
        if !self.bride_input_enabled() {
            return false;
        }
        self.bride_color = value;
        true
    }

    pub fn set_groom_color(&mut self, value: String) -> bool {
        if !self.groom_input_enabled() {
            return false;
        }
        self.groom_color = value;
        true
    }

    pub fn select_suggestion(&mut self, index: usize) -> bool {
        if index >= self.suggestions.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    fn reject(&mut self, error: InputError) -> InputError {
        tracing::debug!(%error, "request rejected before dispatch");
        self.error = Some(error.to_string());
        error
    }

    // Validates and moves into Suggesting; clears the previous round
    fn begin_suggestions(&mut self) -> Result<(u64, SuggestionRequest), InputError> {
        let (input_color, person_wearing_color) = if self.has_bride_color() {
            (self.bride_color.trim(), Role::Bride)
        } else if self.has_groom_color() {
            (self.groom_color.trim(), Role::Groom)
        } else {
            return Err(self.reject(InputError::NoColor));
        };

        let request = SuggestionRequest {
            input_color: input_color.to_string(),
            person_wearing_color,
            event_type: self.event_type,
        };

        self.error = None;
        self.suggestions.clear();
        self.selected = None;
        self.image = None;
        self.phase = Phase::Suggesting;
        self.resume_phase = Phase::Idle;

        let seq = self.next_seq();
        tracing::info!(
            seq,
            event = %request.event_type,
            role = %request.person_wearing_color,
            color = %request.input_color,
            "requesting color suggestions"
        );
        Ok((seq, request))
    }

    // Validates and moves into Imaging; the current image stays visible
    fn begin_preview(&mut self) -> Result<(u64, PreviewRequest), InputError> {
        let Some(selected) = self.selected_suggestion() else {
            return Err(self.reject(InputError::NoSelection));
        };

        let bride_color = if self.has_bride_color() {
            self.bride_color.trim().to_string()
        } else {
            selected.name.clone()
        };
        let groom_color = if self.has_groom_color() {
            self.groom_color.trim().to_string()
        } else {
            selected.name.clone()
        };

        let request = PreviewRequest {
            bride_color,
            groom_color,
            event_type: self.event_type,
            dress_code: self.event_type.dress_code(),
        };

        self.error = None;
        self.resume_phase = if self.image.is_some() {
            Phase::Imaged
        } else {
            Phase::Suggested
        };
        self.phase = Phase::Imaging;

        let seq = self.next_seq();
        tracing::info!(
            seq,
            event = %request.event_type,
            bride = %request.bride_color,
            groom = %request.groom_color,
            "requesting preview image"
        );
        Ok((seq, request))
    }

    /// Starts a suggestion round; None when validation failed (error is set)
    pub fn request_suggestions(
        &mut self,
    ) -> Option<impl Future<Output = Completion> + Send + 'static> {
        let (seq, request) = self.begin_suggestions().ok()?;
        let gateway = Arc::clone(&self.gateway);
        Some(async move {
            let result = gateway.suggest_colors(request).await;
            Completion::Suggestions { seq, result }
        })
    }

    /// Starts an image request; None when no suggestion is selected (error is set)
    pub fn request_preview(&mut self) -> Option<impl Future<Output = Completion> + Send + 'static> {
        let (seq, request) = self.begin_preview().ok()?;
        let gateway = Arc::clone(&self.gateway);
        Some(async move {
            let result = gateway.render_preview(request).await;
            Completion::Preview { seq, result }
        })
    }

    /// Applies a finished request. Returns false for superseded completions.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let seq = match &completion {
            Completion::Suggestions { seq, .. } | Completion::Preview { seq, .. } => *seq,
        };
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale completion");
            return false;
        }

        match completion {
            Completion::Suggestions { result, .. } => {
                match result.and_then(|raw| decode_suggestions(&raw)) {
                    Ok(suggestions) => {
                        tracing::info!(seq, count = suggestions.len(), "color suggestions received");
                        self.suggestions = suggestions;
                        self.selected = None;
                        self.phase = Phase::Suggested;
                    }
                    Err(e) => {
                        tracing::error!(seq, error = %e, "color suggestion request failed");
                        self.suggestions.clear();
                        self.error = Some(SUGGESTIONS_FAILED.to_string());
                        self.phase = self.resume_phase;
                    }
                }
            }
            Completion::Preview { result, .. } => {
                let decoded = result.and_then(|payload| {
                    GeneratedImage::from_base64(payload)
                        .map_err(|e| GatewayError::Decode(e.to_string()))
                });
                match decoded {
                    Ok(image) => {
                        tracing::info!(seq, bytes = image.bytes().len(), "preview image received");
                        self.image = Some(image);
                        self.phase = Phase::Imaged;
                    }
                    Err(e) => {
                        tracing::error!(seq, error = %e, "preview image request failed");
                        self.error = Some(IMAGE_FAILED.to_string());
                        self.phase = self.resume_phase;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // Canned responses are handed out in call order
    #[derive(Default)]
    struct StubGateway {
        suggestion_responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        preview_responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        suggestion_calls: Mutex<Vec<SuggestionRequest>>,
        preview_calls: Mutex<Vec<PreviewRequest>>,
    }

    impl StubGateway {
        fn with_suggestions(self, raw: &str) -> Self {
            self.suggestion_responses
                .lock()
                .unwrap()
                .push_back(Ok(raw.to_string()));
            self
        }

        fn with_suggestion_error(self, error: GatewayError) -> Self {
            self.suggestion_responses.lock().unwrap().push_back(Err(error));
            self
        }

        fn with_preview(self, result: Result<String, GatewayError>) -> Self {
            self.preview_responses.lock().unwrap().push_back(result);
            self
        }

        fn suggestion_calls(&self) -> Vec<SuggestionRequest> {
            self.suggestion_calls.lock().unwrap().clone()
        }

        fn preview_calls(&self) -> Vec<PreviewRequest> {
            self.preview_calls.lock().unwrap().clone()
        }
    }

    impl StylingGateway for StubGateway {
        async fn suggest_colors(&self, request: SuggestionRequest) -> Result<String, GatewayError> {
            self.suggestion_calls.lock().unwrap().push(request);
            self.suggestion_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GatewayError::Network("no canned response".into())))
        }

        async fn render_preview(&self, request: PreviewRequest) -> Result<String, GatewayError> {
            self.preview_calls.lock().unwrap().push(request);
            self.preview_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GatewayError::Network("no canned response".into())))
        }
    }

    const FIVE: &str = r##"[
        {"name":"Gold","hex":"#FFD700"},
        {"name":"Ivory","hex":"#FFFFF0"},
        {"name":"Dusty Rose","hex":"#DCAE96"},
        {"name":"Champagne","hex":"#F7E7CE"},
        {"name":"Maroon","hex":"#800000"}
    ]"##;

    // "/9j/4A==" decodes to a JPEG start-of-image marker
    const JPEG_B64: &str = "/9j/4A==";

    fn stylist(gateway: StubGateway) -> (Stylist<StubGateway>, Arc<StubGateway>) {
        let gateway = Arc::new(gateway);
        (Stylist::new(Arc::clone(&gateway)), gateway)
    }

    async fn run_suggestions(stylist: &mut Stylist<StubGateway>) -> bool {
        let future = stylist.request_suggestions().expect("request should be issued");
        let completion = future.await;
        stylist.apply(completion)
    }

    async fn run_preview(stylist: &mut Stylist<StubGateway>) -> bool {
        let future = stylist.request_preview().expect("request should be issued");
        let completion = future.await;
        stylist.apply(completion)
    }

    #[test]
    fn starts_idle_on_baraat() {
        let (s, _) = stylist(StubGateway::default());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.event_type(), EventType::Baraat);
        assert_eq!(s.dress_code().groom, "Sherwani with Turban");
        assert!(s.suggestions().is_empty());
        assert!(s.image().is_none());
        assert!(!s.can_request_suggestions());
    }

    #[test]
    fn dress_code_follows_event() {
        let (mut s, _) = stylist(StubGateway::default());
        for event in EventType::ALL {
            s.select_event(event);
            assert_eq!(s.dress_code(), event.dress_code());
        }
        s.select_event(EventType::Nikkah);
        assert_eq!(s.dress_code().bride, "Gharara or Sharara");
    }

    #[test]
    fn color_fields_are_mutually_exclusive() {
        let (mut s, _) = stylist(StubGateway::default());
        assert!(s.bride_input_enabled() && s.groom_input_enabled());

        assert!(s.set_bride_color("Red".into()));
        assert!(s.bride_input_enabled());
        assert!(!s.groom_input_enabled());
        assert!(!s.set_groom_color("Blue".into()));
        assert_eq!(s.groom_color(), "");

        assert!(s.set_bride_color(String::new()));
        assert!(s.groom_input_enabled());
        assert!(s.set_groom_color("Blue".into()));
        assert!(!s.bride_input_enabled());

        // Whitespace alone does not lock the other field
        assert!(s.set_groom_color("   ".into()));
        assert!(s.bride_input_enabled());
        assert!(!s.can_request_suggestions());
    }

    #[tokio::test]
    async fn blank_colors_make_no_request() {
        let (mut s, gateway) = stylist(StubGateway::default().with_suggestions(FIVE));
        s.set_bride_color("  ".into());

        assert!(s.request_suggestions().is_none());
        assert_eq!(s.error(), Some(InputError::NoColor.to_string().as_str()));
        assert!(s.suggestions().is_empty());
        assert_eq!(s.phase(), Phase::Idle);
        assert!(gateway.suggestion_calls().is_empty());
    }

    #[tokio::test]
    async fn five_suggestions_keep_order_and_select_third() {
        let (mut s, gateway) = stylist(StubGateway::default().with_suggestions(FIVE));
        s.set_groom_color("Navy".into());

        assert!(run_suggestions(&mut s).await);
        assert_eq!(s.phase(), Phase::Suggested);
        let names: Vec<&str> = s.suggestions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Gold", "Ivory", "Dusty Rose", "Champagne", "Maroon"]);

        let call = &gateway.suggestion_calls()[0];
        assert_eq!(call.input_color, "Navy");
        assert_eq!(call.person_wearing_color, Role::Groom);

        assert!(s.select_suggestion(2));
        let selected = s.selected_suggestion().unwrap();
        assert_eq!(selected.name, "Dusty Rose");
        assert_eq!(selected.hex, "#DCAE96");

        assert!(!s.select_suggestion(5));
        assert_eq!(s.selected_index(), Some(2));
    }

    #[tokio::test]
    async fn loading_state_tracks_request() {
        let (mut s, _) = stylist(StubGateway::default().with_suggestions(FIVE));
        s.set_bride_color("Red".into());

        let future = s.request_suggestions().unwrap();
        assert!(s.is_loading());
        assert_eq!(s.loading_message(), Some(SUGGESTING_MESSAGE));
        s.apply(future.await);
        assert!(!s.is_loading());
        assert_eq!(s.loading_message(), None);
    }

    #[tokio::test]
    async fn preview_without_selection_is_rejected() {
        let (mut s, gateway) = stylist(StubGateway::default().with_suggestions(FIVE));
        s.set_bride_color("Red".into());
        run_suggestions(&mut s).await;

        assert!(s.request_preview().is_none());
        assert!(s.image().is_none());
        assert_eq!(s.error(), Some("Please select a suggested color first."));
        assert_eq!(s.phase(), Phase::Suggested);
        assert!(gateway.preview_calls().is_empty());
    }

    #[tokio::test]
    async fn baraat_end_to_end() {
        let gateway = StubGateway::default()
            .with_suggestions(r##"[{"name":"Gold","hex":"#FFD700"}]"##)
            .with_preview(Ok(JPEG_B64.to_string()));
        let (mut s, gateway) = stylist(gateway);
        s.select_event(EventType::Baraat);
        s.set_bride_color("Emerald Green".into());
        s.set_groom_color(String::new());

        run_suggestions(&mut s).await;
        assert_eq!(
            gateway.suggestion_calls(),
            vec![SuggestionRequest {
                input_color: "Emerald Green".into(),
                person_wearing_color: Role::Bride,
                event_type: EventType::Baraat,
            }]
        );
        assert_eq!(s.suggestions().len(), 1);
        assert_eq!(s.suggestions()[0].name, "Gold");

        assert!(s.select_suggestion(0));
        assert!(run_preview(&mut s).await);
        assert_eq!(
            gateway.preview_calls(),
            vec![PreviewRequest {
                bride_color: "Emerald Green".into(),
                groom_color: "Gold".into(),
                event_type: EventType::Baraat,
                dress_code: DressCombination {
                    bride: "Lehenga, Gharara or Sharara",
                    groom: "Sherwani with Turban",
                },
            }]
        );
        assert_eq!(s.phase(), Phase::Imaged);
        assert_eq!(s.image().unwrap().bytes(), &[0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(s.error(), None);
    }

    #[tokio::test]
    async fn repeated_round_replaces_list_and_clears_selection_and_image() {
        let gateway = StubGateway::default()
            .with_suggestions(FIVE)
            .with_preview(Ok(JPEG_B64.to_string()))
            .with_suggestions(r##"[{"name":"Teal","hex":"#008080"},{"name":"Gold","hex":"#FFD700"}]"##);
        let (mut s, _) = stylist(gateway);
        s.set_bride_color("Red".into());

        run_suggestions(&mut s).await;
        s.select_suggestion(1);
        run_preview(&mut s).await;
        assert!(s.image().is_some());

        let future = s.request_suggestions().unwrap();
        assert!(s.suggestions().is_empty());
        assert_eq!(s.selected_index(), None);
        assert!(s.image().is_none());
        s.apply(future.await);

        let names: Vec<&str> = s.suggestions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Teal", "Gold"]);
        assert_eq!(s.selected_index(), None);
    }

    #[tokio::test]
    async fn gateway_failure_sets_generic_message() {
        let gateway = StubGateway::default()
            .with_suggestion_error(GatewayError::Api {
                status: 503,
                body: "overloaded".into(),
            })
            .with_suggestions("I'm sorry, I can't do that");
        let (mut s, _) = stylist(gateway);
        s.set_groom_color("Black".into());

        assert!(run_suggestions(&mut s).await);
        assert_eq!(s.error(), Some(SUGGESTIONS_FAILED));
        assert!(s.suggestions().is_empty());
        assert_eq!(s.phase(), Phase::Idle);

        // Malformed JSON is a failure too
        run_suggestions(&mut s).await;
        assert_eq!(s.error(), Some(SUGGESTIONS_FAILED));
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn image_failure_keeps_selection_and_returns_to_suggested() {
        let gateway = StubGateway::default()
            .with_suggestions(FIVE)
            .with_preview(Err(GatewayError::Network("timeout".into())))
            .with_preview(Ok("***".into()));
        let (mut s, _) = stylist(gateway);
        s.set_bride_color("Red".into());
        run_suggestions(&mut s).await;
        s.select_suggestion(0);

        run_preview(&mut s).await;
        assert_eq!(s.error(), Some(IMAGE_FAILED));
        assert_eq!(s.phase(), Phase::Suggested);
        assert_eq!(s.selected_index(), Some(0));

        // Undecodable payload
        run_preview(&mut s).await;
        assert_eq!(s.error(), Some(IMAGE_FAILED));
        assert!(s.image().is_none());
    }

    #[tokio::test]
    async fn stale_image_stays_visible_during_second_request() {
        let gateway = StubGateway::default()
            .with_suggestions(FIVE)
            .with_preview(Ok(JPEG_B64.to_string()))
            .with_preview(Err(GatewayError::Network("reset".into())));
        let (mut s, _) = stylist(gateway);
        s.set_bride_color("Red".into());
        run_suggestions(&mut s).await;
        s.select_suggestion(0);
        run_preview(&mut s).await;

        s.select_suggestion(3);
        let future = s.request_preview().unwrap();
        assert_eq!(s.phase(), Phase::Imaging);
        assert!(s.image().is_some());

        s.apply(future.await);
        assert_eq!(s.phase(), Phase::Imaged);
        assert!(s.image().is_some());
        assert_eq!(s.error(), Some(IMAGE_FAILED));
    }

    #[tokio::test]
    async fn superseded_completion_is_discarded() {
        let gateway = StubGateway::default()
            .with_suggestions(r##"[{"name":"Latest","hex":"#000001"}]"##)
            .with_suggestions(r##"[{"name":"Stale","hex":"#000002"}]"##);
        let (mut s, _) = stylist(gateway);
        s.set_bride_color("Red".into());

        let first = s.request_suggestions().unwrap();
        let second = s.request_suggestions().unwrap();

        assert!(s.apply(second.await));
        assert!(!s.apply(first.await));
        assert_eq!(s.suggestions().len(), 1);
        assert_eq!(s.suggestions()[0].name, "Latest");
        assert_eq!(s.phase(), Phase::Suggested);
    }

    #[tokio::test]
    async fn new_round_discards_in_flight_image() {
        let gateway = StubGateway::default()
            .with_suggestions(FIVE)
            .with_preview(Ok(JPEG_B64.to_string()))
            .with_suggestions(FIVE);
        let (mut s, _) = stylist(gateway);
        s.set_bride_color("Red".into());
        run_suggestions(&mut s).await;
        s.select_suggestion(0);

        let image = s.request_preview().unwrap();
        let round = s.request_suggestions().unwrap();
        assert!(!s.apply(image.await));
        assert!(s.image().is_none());
        assert!(s.apply(round.await));
        assert_eq!(s.phase(), Phase::Suggested);
    }
}
