//! The Presenter: per-page UI state around one explanation at a time.
//!
//! Owns the selection tracker, the current [`StreamSession`] and the overlay
//! surface. Every surface write happens under the state lock, and every
//! asynchronous path (typing ticks, reveal ticks, pushed chunks, the final
//! reply) re-checks the session generation under that lock before writing.
//! A dismissed or superseded session therefore never changes the surface.

pub mod reveal;
pub mod selection;
pub mod typing;

pub use reveal::CharacterReveal;
pub use selection::{
    AffordanceChange, SelectionRect, SelectionSnapshot, SelectionTracker, affordance_position,
};
pub use typing::TypingSimulation;

use crate::render::{error_panel, format_markdown, result_panel, streaming_panel};
use crate::surface::OverlaySurface;
use explainer_application::Dispatcher;
use explainer_domain::util::truncate_str;
use explainer_domain::{ExplanationRequest, PageContext, PushMessage, RelayRequest, StreamSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Timing and delivery options.
#[derive(Debug, Clone)]
pub struct PresenterSettings {
    pub typing_interval: Duration,
    /// Reveal a non-streamed reply character by character.
    pub reveal: bool,
    pub reveal_chars_per_tick: usize,
    pub reveal_tick: Duration,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            typing_interval: Duration::from_millis(400),
            reveal: false,
            reveal_chars_per_tick: 3,
            reveal_tick: Duration::from_millis(20),
        }
    }
}

/// How one explanation request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterOutcome {
    Explained {
        selected_text: String,
        explanation: String,
        html: String,
    },
    Failed(String),
    /// Dismissed or superseded; the surface was left alone.
    Cancelled,
    /// Nothing to explain.
    NothingSelected,
}

struct PresenterState {
    surface: Box<dyn OverlaySurface>,
    selection: SelectionTracker,
    context: PageContext,
    session: Option<StreamSession>,
    generation: u64,
    typing: bool,
    cancel: Option<CancellationToken>,
}

impl PresenterState {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.id() == generation && s.is_active())
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.deactivate();
        }
        self.typing = false;
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

/// Presenter handle; clones share state.
#[derive(Clone)]
pub struct Presenter {
    dispatcher: Dispatcher,
    settings: PresenterSettings,
    state: Arc<Mutex<PresenterState>>,
}

impl Presenter {
    pub fn new(
        dispatcher: Dispatcher,
        surface: Box<dyn OverlaySurface>,
        settings: PresenterSettings,
    ) -> Self {
        Self {
            dispatcher,
            settings,
            state: Arc::new(Mutex::new(PresenterState {
                surface,
                selection: SelectionTracker::new(),
                context: PageContext::default(),
                session: None,
                generation: 0,
                typing: false,
                cancel: None,
            })),
        }
    }

    /// Title and URL attached to subsequent requests.
    pub async fn set_page_context(&self, context: PageContext) {
        self.state.lock().await.context = context;
    }

    pub async fn on_pointer_up(&self, selection: Option<SelectionSnapshot>) {
        let mut state = self.state.lock().await;
        let change = state.selection.pointer_up(selection.as_ref());
        apply_affordance(state.surface.as_mut(), change);
    }

    pub async fn on_pointer_down(&self) {
        let mut state = self.state.lock().await;
        let change = state.selection.pointer_down();
        apply_affordance(state.surface.as_mut(), change);
    }

    /// Keyboard input; only Escape is handled.
    pub async fn on_key(&self, key: &str) {
        if key == "Escape" {
            self.dismiss().await;
        }
    }

    /// Hide the affordance and the overlay and drop the current session.
    ///
    /// The Relay keeps serving the request; its chunks and reply are ignored.
    pub async fn dismiss(&self) {
        let mut state = self.state.lock().await;
        if state.session.as_ref().is_some_and(|s| s.is_active()) {
            debug!(generation = state.generation, "Dismissing active session");
        }
        state.end_session();
        state.surface.hide_affordance();
        state.surface.hide_overlay();
    }

    /// Whether a session is waiting for content.
    pub async fn is_active(&self) -> bool {
        let state = self.state.lock().await;
        state.session.as_ref().is_some_and(|s| s.is_active())
    }

    /// Click on the affordance: explain the remembered selection.
    pub async fn activate_affordance(&self) -> PresenterOutcome {
        let text = self
            .state
            .lock()
            .await
            .selection
            .remembered()
            .map(str::to_string);
        match text {
            Some(text) => self.explain(&text).await,
            None => PresenterOutcome::NothingSelected,
        }
    }

    /// A request delivered by the host (context menu or direct).
    pub async fn handle_host_message(&self, message: RelayRequest) -> PresenterOutcome {
        match message {
            RelayRequest::ExplainFromContextMenu { text } => self.explain(&text).await,
            RelayRequest::ExplainText { text, context } => {
                self.set_page_context(context).await;
                self.explain(&text).await
            }
        }
    }

    /// A chunk pushed by the Relay for `session`.
    pub async fn on_push(&self, session: u64, message: PushMessage) {
        let PushMessage::StreamingChunk { chunk } = message;
        let mut state = self.state.lock().await;

        if session != state.generation {
            trace!(session, current = state.generation, "Dropping chunk for superseded session");
            return;
        }

        let Some(current) = state.session.as_mut() else {
            return;
        };
        if !current.append(&chunk) {
            trace!(session, "Dropping chunk for inactive session");
            return;
        }
        let html = streaming_panel(&format_markdown(current.text()));

        state.typing = false;
        state.surface.set_content(&html);
    }

    /// Explain `text` with the current page context.
    ///
    /// Starting a request supersedes any request still in flight.
    pub async fn explain(&self, text: &str) -> PresenterOutcome {
        let context = self.state.lock().await.context.clone();
        let Some(request) = ExplanationRequest::try_new(text, context) else {
            return PresenterOutcome::NothingSelected;
        };

        let (generation, cancel) = self.begin(&request).await;
        self.spawn_typing(generation);

        let result = self
            .dispatcher
            .dispatch(generation, RelayRequest::explain(&request), &cancel)
            .await;

        let explanation = match result {
            Ok(response) => match response.into_result() {
                Ok(explanation) => explanation,
                Err(message) => return self.fail(generation, message).await,
            },
            Err(e) if e.is_cancelled() => {
                debug!(generation, "Request cancelled");
                return PresenterOutcome::Cancelled;
            }
            Err(e) => {
                if e.is_timeout() {
                    warn!(generation, "Relay did not reply before the dispatch timeout");
                }
                return self.fail(generation, e.user_message()).await;
            }
        };

        if self.settings.reveal && !self.has_streamed(generation).await {
            self.reveal(generation, &explanation).await;
        }

        self.succeed(generation, &request, explanation).await
    }

    async fn begin(&self, request: &ExplanationRequest) -> (u64, CancellationToken) {
        let mut state = self.state.lock().await;
        state.end_session();

        state.generation += 1;
        let generation = state.generation;
        let cancel = CancellationToken::new();
        state.session = Some(StreamSession::new(generation));
        state.cancel = Some(cancel.clone());
        state.typing = true;

        info!(
            generation,
            "Explaining selection: {}",
            truncate_str(request.selected_text(), 60)
        );
        state.surface.hide_affordance();
        state.surface.show_overlay(&TypingSimulation::new().frame());

        (generation, cancel)
    }

    fn spawn_typing(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let period = self.settings.typing_interval;

        tokio::spawn(async move {
            let mut typing = TypingSimulation::new();
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let mut guard = state.lock().await;
                if !guard.typing || !guard.is_current(generation) {
                    break;
                }
                let frame = typing.advance();
                guard.surface.set_content(&frame);
            }
        });
    }

    async fn has_streamed(&self, generation: u64) -> bool {
        let state = self.state.lock().await;
        state.generation == generation
            && state.session.as_ref().is_some_and(|s| s.chunk_count() > 0)
    }

    async fn reveal(&self, generation: u64, explanation: &str) {
        let mut reveal = CharacterReveal::new(explanation, self.settings.reveal_chars_per_tick);
        let period = self.settings.reveal_tick;
        let mut ticker = interval_at(Instant::now(), period);

        loop {
            ticker.tick().await;
            let mut state = self.state.lock().await;
            if !state.is_current(generation) {
                return;
            }
            state.typing = false;
            let Some(shown) = reveal.next_frame() else {
                return;
            };
            let html = streaming_panel(&format_markdown(shown));
            state.surface.set_content(&html);
        }
    }

    async fn succeed(
        &self,
        generation: u64,
        request: &ExplanationRequest,
        explanation: String,
    ) -> PresenterOutcome {
        let mut state = self.state.lock().await;
        if !state.is_current(generation) {
            debug!(generation, "Ignoring reply for a closed session");
            return PresenterOutcome::Cancelled;
        }

        let html = result_panel(request.selected_text(), &format_markdown(&explanation));
        let mut elapsed_ms = 0;
        if let Some(session) = state.session.as_mut() {
            session.finish(explanation.clone());
            elapsed_ms = session.elapsed().num_milliseconds();
        }
        state.typing = false;
        state.cancel = None;
        state.surface.set_content(&html);
        info!(
            generation,
            elapsed_ms,
            "Explanation shown ({} bytes)",
            explanation.len()
        );

        PresenterOutcome::Explained {
            selected_text: request.selected_text().to_string(),
            explanation,
            html,
        }
    }

    async fn fail(&self, generation: u64, message: String) -> PresenterOutcome {
        let mut state = self.state.lock().await;
        if !state.is_current(generation) {
            debug!(generation, "Ignoring failure for a closed session");
            return PresenterOutcome::Cancelled;
        }

        warn!(generation, "Explanation failed: {}", message);
        if let Some(session) = state.session.as_mut() {
            session.deactivate();
        }
        state.typing = false;
        state.cancel = None;
        state.surface.set_content(&error_panel(&message));

        PresenterOutcome::Failed(message)
    }
}

fn apply_affordance(surface: &mut dyn OverlaySurface, change: AffordanceChange) {
    match change {
        AffordanceChange::Show(position) => surface.show_affordance(position),
        AffordanceChange::Hide => surface.hide_affordance(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::overlay::PanelKind;
    use crate::surface::{Position, RecordingSurface, SurfaceOp};
    use async_trait::async_trait;
    use explainer_application::RelayChannel;
    use explainer_domain::{ExplainError, RelayResponse};
    use std::sync::OnceLock;

    /// Pushes scripted chunks through the Presenter, then replies.
    struct ScriptedChannel {
        presenter: OnceLock<Presenter>,
        chunks: Vec<&'static str>,
        delay: Duration,
        reply: RelayResponse,
        sent: std::sync::Mutex<Vec<(u64, RelayRequest)>>,
    }

    impl ScriptedChannel {
        fn replying(reply: RelayResponse) -> Self {
            Self {
                presenter: OnceLock::new(),
                chunks: Vec::new(),
                delay: Duration::ZERO,
                reply,
                sent: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn with_chunks(mut self, chunks: Vec<&'static str>) -> Self {
            self.chunks = chunks;
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl RelayChannel for ScriptedChannel {
        async fn send(
            &self,
            session: u64,
            request: RelayRequest,
        ) -> Result<RelayResponse, ExplainError> {
            self.sent.lock().unwrap().push((session, request));
            if let Some(presenter) = self.presenter.get() {
                for chunk in &self.chunks {
                    presenter
                        .on_push(
                            session,
                            PushMessage::StreamingChunk {
                                chunk: chunk.to_string(),
                            },
                        )
                        .await;
                }
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.reply.clone())
        }
    }

    fn setup(
        channel: ScriptedChannel,
        settings: PresenterSettings,
    ) -> (Presenter, Arc<ScriptedChannel>, RecordingSurface) {
        let channel = Arc::new(channel);
        let surface = RecordingSurface::new();
        let dispatcher = Dispatcher::new(channel.clone()).with_timeout(Duration::from_secs(30));
        let presenter = Presenter::new(dispatcher, Box::new(surface.clone()), settings);
        let _ = channel.presenter.set(presenter.clone());
        (presenter, channel, surface)
    }

    fn contents(surface: &RecordingSurface) -> Vec<String> {
        surface
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                SurfaceOp::SetContent(html) => Some(html),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn success_shows_quoted_selection_and_explanation() {
        let (presenter, channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("**Light** becomes sugar")),
            PresenterSettings::default(),
        );
        presenter
            .set_page_context(PageContext::new("Biology", "https://example.org"))
            .await;

        let outcome = presenter.explain("  light & <energy> ").await;

        let (selected_text, explanation, html) = match outcome {
            PresenterOutcome::Explained {
                selected_text,
                explanation,
                html,
            } => (selected_text, explanation, html),
            other => panic!("expected an explanation, got {:?}", other),
        };
        assert_eq!(selected_text, "light & <energy>");
        assert_eq!(explanation, "**Light** becomes sugar");
        assert!(html.contains(
            "<blockquote class=\"re-quote\">light &amp; &lt;energy&gt;</blockquote>"
        ));
        assert!(html.contains("<strong>Light</strong> becomes sugar"));

        let ops = surface.ops();
        assert_eq!(ops[0], SurfaceOp::HideAffordance);
        assert_eq!(ops[1], SurfaceOp::ShowOverlay(TypingSimulation::new().frame()));
        assert_eq!(surface.last_content(), Some(html));
        assert!(!presenter.is_active().await);

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].1,
            RelayRequest::ExplainText {
                text: "light & <energy>".into(),
                context: PageContext::new("Biology", "https://example.org"),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pushed_chunks_rerender_whole_buffer() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("Some **bold** text"))
                .with_chunks(vec!["Some **bo", "ld** text"]),
            PresenterSettings::default(),
        );

        presenter.explain("term").await;

        let contents = contents(&surface);
        assert_eq!(
            contents,
            vec![
                streaming_panel(&format_markdown("Some **bo")),
                streaming_panel(&format_markdown("Some **bold** text")),
                result_panel("term", &format_markdown("Some **bold** text")),
            ]
        );
        assert!(!contents[0].contains("<strong>"));
        assert!(contents[1].contains("<strong>bold</strong>"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reply_shows_error_panel() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::failure("Authentication failed")),
            PresenterSettings::default(),
        );

        let outcome = presenter.explain("term").await;

        assert_eq!(
            outcome,
            PresenterOutcome::Failed("Authentication failed".into())
        );
        assert_eq!(
            surface.last_content(),
            Some(error_panel("Authentication failed"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_renders_error_after_typing() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("late"))
                .with_delay(Duration::from_secs(60)),
            PresenterSettings::default(),
        );

        let outcome = presenter.explain("term").await;

        let message = ExplainError::Timeout.user_message();
        assert_eq!(outcome, PresenterOutcome::Failed(message.clone()));

        let contents = contents(&surface);
        let typing_frames = contents
            .iter()
            .filter(|html| PanelKind::of(html) == PanelKind::Loading)
            .count();
        assert!(typing_frames > 10);
        assert_eq!(contents.last(), Some(&error_panel(&message)));

        // The late reply changes nothing.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(surface.last_content(), Some(error_panel(&message)));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_frames_stop_at_first_chunk() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x"))
                .with_delay(Duration::from_secs(120)),
            PresenterSettings::default(),
        );

        let task = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.explain("term").await })
        };
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(
            contents(&surface).last().map(|html| PanelKind::of(html)),
            Some(PanelKind::Loading)
        );

        presenter
            .on_push(1, PushMessage::StreamingChunk { chunk: "Hi".into() })
            .await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(
            contents(&surface).last(),
            Some(&streaming_panel(&format_markdown("Hi")))
        );
        presenter.dismiss().await;
        assert_eq!(task.await.unwrap(), PresenterOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_ignores_late_reply() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("late"))
                .with_delay(Duration::from_secs(5)),
            PresenterSettings::default(),
        );

        let task = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.explain("term").await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        presenter.on_key("Escape").await;

        assert_eq!(task.await.unwrap(), PresenterOutcome::Cancelled);
        let ops_after_dismiss = surface.ops().len();
        assert_eq!(surface.ops().last(), Some(&SurfaceOp::HideOverlay));

        tokio::time::sleep(Duration::from_secs(10)).await;
        presenter
            .on_push(1, PushMessage::StreamingChunk { chunk: "x".into() })
            .await;
        assert_eq!(surface.ops().len(), ops_after_dismiss);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_session_chunks_are_dropped() {
        let (presenter, channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x"))
                .with_delay(Duration::from_secs(100)),
            PresenterSettings::default(),
        );

        let first = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.explain("first").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.explain("second").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(first.await.unwrap(), PresenterOutcome::Cancelled);
        let sessions: Vec<u64> = channel.sent.lock().unwrap().iter().map(|(s, _)| *s).collect();
        assert_eq!(sessions, vec![1, 2]);

        let before = surface.ops().len();
        presenter
            .on_push(1, PushMessage::StreamingChunk { chunk: "old".into() })
            .await;
        assert_eq!(surface.ops().len(), before);

        presenter
            .on_push(2, PushMessage::StreamingChunk { chunk: "new".into() })
            .await;
        assert_eq!(
            surface.last_content(),
            Some(streaming_panel(&format_markdown("new")))
        );

        presenter.dismiss().await;
        assert_eq!(second.await.unwrap(), PresenterOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_steps_through_final_text() {
        let settings = PresenterSettings {
            reveal: true,
            ..PresenterSettings::default()
        };
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("abcdefgh")),
            settings,
        );

        presenter.explain("term").await;

        assert_eq!(
            contents(&surface),
            vec![
                streaming_panel(&format_markdown("abc")),
                streaming_panel(&format_markdown("abcdef")),
                streaming_panel(&format_markdown("abcdefgh")),
                result_panel("term", &format_markdown("abcdefgh")),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_is_skipped_when_chunks_streamed() {
        let settings = PresenterSettings {
            reveal: true,
            ..PresenterSettings::default()
        };
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("ab")).with_chunks(vec!["a", "b"]),
            settings,
        );

        presenter.explain("term").await;

        assert_eq!(contents(&surface).len(), 3);
    }

    #[tokio::test]
    async fn pointer_events_drive_affordance() {
        let (presenter, _channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x")),
            PresenterSettings::default(),
        );
        let rect = SelectionRect {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 10.0,
        };

        presenter
            .on_pointer_up(Some(SelectionSnapshot::new("word", rect, 5.0)))
            .await;
        presenter.on_pointer_down().await;
        presenter.on_pointer_up(None).await;

        assert_eq!(
            surface.ops(),
            vec![
                SurfaceOp::ShowAffordance(Position { x: 30.0, y: 45.0 }),
                SurfaceOp::HideAffordance,
                SurfaceOp::HideAffordance,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn affordance_click_uses_remembered_selection() {
        let (presenter, channel, _surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x")),
            PresenterSettings::default(),
        );

        assert_eq!(
            presenter.activate_affordance().await,
            PresenterOutcome::NothingSelected
        );

        presenter
            .on_pointer_up(Some(SelectionSnapshot::new(
                "entropy",
                SelectionRect::default(),
                0.0,
            )))
            .await;
        presenter.on_pointer_down().await;
        let outcome = presenter.activate_affordance().await;

        assert!(matches!(outcome, PresenterOutcome::Explained { .. }));
        let sent = channel.sent.lock().unwrap();
        assert!(matches!(
            &sent[0].1,
            RelayRequest::ExplainText { text, .. } if text == "entropy"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn context_menu_message_is_explained() {
        let (presenter, channel, _surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x")),
            PresenterSettings::default(),
        );
        presenter
            .set_page_context(PageContext::new("Docs", "https://docs.example"))
            .await;

        let outcome = presenter
            .handle_host_message(RelayRequest::ExplainFromContextMenu {
                text: "borrow checker".into(),
            })
            .await;

        assert!(matches!(outcome, PresenterOutcome::Explained { .. }));
        assert_eq!(
            channel.sent.lock().unwrap()[0].1,
            RelayRequest::ExplainText {
                text: "borrow checker".into(),
                context: PageContext::new("Docs", "https://docs.example"),
            }
        );
    }

    #[tokio::test]
    async fn blank_text_does_nothing() {
        let (presenter, channel, surface) = setup(
            ScriptedChannel::replying(RelayResponse::success("x")),
            PresenterSettings::default(),
        );

        assert_eq!(
            presenter.explain(" \n\t ").await,
            PresenterOutcome::NothingSelected
        );
        assert!(surface.ops().is_empty());
        assert!(channel.sent.lock().unwrap().is_empty());
    }
}
