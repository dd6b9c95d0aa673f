use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::catalog::{self, CatalogSource, ProjectRecord};
use crate::config::Config;
use crate::intent::{self, Intent};
use crate::openai::{self, OpenAIClient};

pub const THINKING_TEXT: &str = "Thinking";

pub const GREETING_TEXT: &str =
    "Hi! I'm the portfolio assistant. Ask me about projects, skills, or how to get in touch.";

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Navigation,
    Content,
    ChatInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLevel {
    Category,
    Project,
}

/// One submitted question whose answer has not resolved yet. The placeholder
/// index stays valid because the transcript is append-only.
struct PendingAnswer {
    placeholder: usize,
    task: JoinHandle<String>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Chat widget state
    pub chat_open: bool,
    pub transcript: Vec<ChatMessage>,
    pub chat_input: String,
    pub chat_cursor: usize,
    pub chat_scroll: u16,
    pub chat_height: u16, // Inner chat area size, updated during render
    pub chat_width: u16,
    pub animation_frame: u8, // 0-2 for the thinking ellipsis
    pending: Vec<PendingAnswer>,

    // API key popup state
    pub show_key_input: bool,
    pub key_input: String,
    pub key_cursor: usize,

    // Portfolio navigation state
    pub nav_level: NavLevel,
    pub category_state: ListState,
    pub project_state: ListState,
    pub cached_categories: Vec<String>,
    pub cached_projects: Vec<ProjectRecord>,

    // Content pane state
    pub content_scroll: u16,
    pub content_height: u16,
    pub total_content_lines: u16,

    // Panel areas for mouse hit-testing (updated during render)
    pub nav_area: Option<Rect>,
    pub content_area: Option<Rect>,
    pub chat_pane_area: Option<Rect>,

    // Collaborators and data
    pub assistant: OpenAIClient,
    pub catalog: CatalogSource,
    pub projects: Vec<ProjectRecord>,
}

impl App {
    pub async fn new(config: Config) -> Self {
        let catalog = CatalogSource::new(config.catalog_url.clone());
        let projects = catalog.load().await;

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
        let assistant = OpenAIClient::new(config.resolved_api_key(), model);

        Self::from_parts(assistant, catalog, projects, config.auto_open)
    }

    fn from_parts(
        assistant: OpenAIClient,
        catalog: CatalogSource,
        projects: Vec<ProjectRecord>,
        auto_open: bool,
    ) -> Self {
        let cached_categories = catalog::categories(&projects);

        let mut category_state = ListState::default();
        if !cached_categories.is_empty() {
            category_state.select(Some(0));
        }

        let mut app = Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Navigation,

            chat_open: false,
            transcript: Vec::new(),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            pending: Vec::new(),

            show_key_input: false,
            key_input: String::new(),
            key_cursor: 0,

            nav_level: NavLevel::Category,
            category_state,
            project_state: ListState::default(),
            cached_categories,
            cached_projects: Vec::new(),

            content_scroll: 0,
            content_height: 0,
            total_content_lines: 0,

            nav_area: None,
            content_area: None,
            chat_pane_area: None,

            assistant,
            catalog,
            projects,
        };

        if auto_open {
            app.open_chat_with_introduction();
        }

        app
    }

    // Chat widget open/close

    pub fn toggle_chat(&mut self) {
        if self.chat_open {
            self.close_chat();
        } else {
            self.open_chat();
        }
    }

    pub fn open_chat(&mut self) {
        self.chat_open = true;
        self.focus = FocusPane::ChatInput;
        self.input_mode = InputMode::Editing;
        self.chat_cursor = self.chat_input.chars().count();
    }

    pub fn close_chat(&mut self) {
        // In-flight answers keep running; their placeholders resolve even
        // while the panel is hidden.
        self.chat_open = false;
        self.input_mode = InputMode::Normal;
        if self.focus == FocusPane::ChatInput {
            self.focus = FocusPane::Navigation;
        }
    }

    fn open_chat_with_introduction(&mut self) {
        self.open_chat();
        self.transcript.push(ChatMessage {
            role: ChatRole::Assistant,
            content: GREETING_TEXT.to_string(),
        });
        self.transcript.push(ChatMessage {
            role: ChatRole::Assistant,
            content: intent::projects_answer(&self.projects),
        });
        self.scroll_chat_to_bottom();
    }

    // Submission pipeline

    /// Submit whatever is in the chat input. Whitespace-only input is a
    /// no-op; otherwise the user entry and a thinking placeholder are
    /// appended and one answer task is spawned. Nothing stops a second
    /// submission while the first is still in flight; each owns its own
    /// placeholder.
    pub fn submit_message(&mut self) {
        let message = self.chat_input.trim().to_string();
        self.chat_input.clear();
        self.chat_cursor = 0;
        if message.is_empty() {
            return;
        }

        self.transcript.push(ChatMessage {
            role: ChatRole::User,
            content: message.clone(),
        });
        self.transcript.push(ChatMessage {
            role: ChatRole::Assistant,
            content: THINKING_TEXT.to_string(),
        });
        let placeholder = self.transcript.len() - 1;
        self.scroll_chat_to_bottom();

        let assistant = self.assistant.clone();
        let catalog = self.catalog.clone();
        let task = tokio::spawn(async move { resolve_answer(assistant, catalog, message).await });
        self.pending.push(PendingAnswer { placeholder, task });
    }

    /// Fold finished answer tasks back into the transcript. Called from the
    /// event loop; resolution order follows task completion, not submission.
    pub async fn poll_answers(&mut self) {
        let mut index = 0;
        while index < self.pending.len() {
            if !self.pending[index].task.is_finished() {
                index += 1;
                continue;
            }

            let finished = self.pending.remove(index);
            let content = match finished.task.await {
                Ok(answer) => answer,
                Err(err) => {
                    // A panicked task still must not leave its placeholder
                    // thinking forever.
                    log::error!("answer task failed: {err}");
                    intent::GENERAL_ANSWER.to_string()
                }
            };

            if let Some(entry) = self.transcript.get_mut(finished.placeholder) {
                entry.content = content;
            }
            self.scroll_chat_to_bottom();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Whether the transcript entry at `index` is an unresolved placeholder.
    pub fn is_thinking(&self, index: usize) -> bool {
        self.pending.iter().any(|pending| pending.placeholder == index)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if !self.pending.is_empty() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the chat view so the latest entry is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in &self.transcript {
            total_lines += 1; // Role line ("You:" or "AI:")
            for line in msg.content.lines() {
                // Character count, not byte length, for UTF-8 content
                let char_count = line.chars().count();
                total_lines += if char_count == 0 {
                    1
                } else {
                    (char_count / wrap_width + 1) as u16
                };
            }
            total_lines += 1; // Blank line after message
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Navigation helpers

    pub fn selected_category(&self) -> Option<&String> {
        self.category_state
            .selected()
            .and_then(|i| self.cached_categories.get(i))
    }

    pub fn selected_project(&self) -> Option<&ProjectRecord> {
        match self.nav_level {
            NavLevel::Category => None,
            NavLevel::Project => self
                .project_state
                .selected()
                .and_then(|i| self.cached_projects.get(i)),
        }
    }

    pub fn nav_down(&mut self) {
        match self.nav_level {
            NavLevel::Category => {
                let len = self.cached_categories.len();
                if len > 0 {
                    let i = self.category_state.selected().unwrap_or(0);
                    self.category_state.select(Some((i + 1).min(len - 1)));
                }
            }
            NavLevel::Project => {
                let len = self.cached_projects.len();
                if len > 0 {
                    let i = self.project_state.selected().unwrap_or(0);
                    self.project_state.select(Some((i + 1).min(len - 1)));
                    self.content_scroll = 0;
                }
            }
        }
    }

    pub fn nav_up(&mut self) {
        match self.nav_level {
            NavLevel::Category => {
                let i = self.category_state.selected().unwrap_or(0);
                self.category_state.select(Some(i.saturating_sub(1)));
            }
            NavLevel::Project => {
                let i = self.project_state.selected().unwrap_or(0);
                self.project_state.select(Some(i.saturating_sub(1)));
                self.content_scroll = 0;
            }
        }
    }

    pub fn nav_enter(&mut self) {
        match self.nav_level {
            NavLevel::Category => {
                if let Some(category) = self.selected_category().cloned() {
                    self.cached_projects = catalog::in_category(&self.projects, &category);
                    if !self.cached_projects.is_empty() {
                        self.project_state.select(Some(0));
                        self.nav_level = NavLevel::Project;
                        self.content_scroll = 0;
                    }
                }
            }
            NavLevel::Project => {
                // At project level, Enter focuses the detail pane
                self.focus = FocusPane::Content;
            }
        }
    }

    pub fn nav_back(&mut self) {
        match self.nav_level {
            NavLevel::Category => {
                // Already at top, do nothing
            }
            NavLevel::Project => {
                self.nav_level = NavLevel::Category;
                self.cached_projects.clear();
                self.project_state.select(None);
                self.content_scroll = 0;
            }
        }
    }

    pub fn nav_first(&mut self) {
        match self.nav_level {
            NavLevel::Category => self.category_state.select(Some(0)),
            NavLevel::Project => {
                if !self.cached_projects.is_empty() {
                    self.project_state.select(Some(0));
                    self.content_scroll = 0;
                }
            }
        }
    }

    pub fn nav_last(&mut self) {
        match self.nav_level {
            NavLevel::Category => {
                let len = self.cached_categories.len();
                if len > 0 {
                    self.category_state.select(Some(len - 1));
                }
            }
            NavLevel::Project => {
                let len = self.cached_projects.len();
                if len > 0 {
                    self.project_state.select(Some(len - 1));
                    self.content_scroll = 0;
                }
            }
        }
    }

    // Content scrolling

    pub fn scroll_down(&mut self) {
        if self.content_scroll < self.total_content_lines.saturating_sub(self.content_height) {
            self.content_scroll = self.content_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.content_height / 2;
        let max_scroll = self.total_content_lines.saturating_sub(self.content_height);
        self.content_scroll = (self.content_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.content_height / 2;
        self.content_scroll = self.content_scroll.saturating_sub(half_page);
    }

    // Title helpers

    pub fn current_nav_title(&self) -> String {
        match self.nav_level {
            NavLevel::Category => "Categories".to_string(),
            NavLevel::Project => self.selected_category().cloned().unwrap_or_default(),
        }
    }

    pub fn content_title(&self) -> String {
        match self.selected_project() {
            Some(project) => project.title.clone(),
            None => "Select a project".to_string(),
        }
    }
}

/// Two-tier answer strategy: remote first, local fallback. Always produces
/// text; remote failures are diagnostic only. The catalog is fetched per
/// request and only when the projects intent needs it.
async fn resolve_answer(assistant: OpenAIClient, catalog: CatalogSource, message: String) -> String {
    match assistant.answer(&message).await {
        Ok(answer) => answer,
        Err(err) => {
            log::warn!("remote answer unavailable ({err}); answering locally");
            let records = match intent::classify(&message) {
                Intent::Projects => catalog.load().await,
                _ => Vec::new(),
            };
            intent::respond(&message, &records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_app(auto_open: bool) -> App {
        App::from_parts(
            OpenAIClient::new(None, openai::DEFAULT_MODEL),
            CatalogSource::with_embedded(None, None),
            Vec::new(),
            auto_open,
        )
    }

    async fn drain_pending(app: &mut App) {
        for _ in 0..200 {
            app.poll_answers().await;
            if app.in_flight() == 0 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("answers did not resolve in time");
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        let mut app = offline_app(false);

        app.chat_input = "   ".to_string();
        app.submit_message();

        assert!(app.transcript.is_empty());
        assert_eq!(app.in_flight(), 0);
        assert!(app.chat_input.is_empty());
    }

    #[tokio::test]
    async fn submission_appends_user_entry_and_placeholder() {
        let mut app = offline_app(false);

        app.chat_input = "what projects have you done?".to_string();
        app.submit_message();

        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].role, ChatRole::User);
        assert_eq!(app.transcript[0].content, "what projects have you done?");
        assert_eq!(app.transcript[1].role, ChatRole::Assistant);
        assert_eq!(app.transcript[1].content, THINKING_TEXT);
        assert!(app.is_thinking(1));
        assert!(app.chat_input.is_empty());

        drain_pending(&mut app).await;

        // No credential and no catalog: the local responder answers with the
        // bare projects intro.
        assert_eq!(app.transcript[1].content, intent::PROJECTS_INTRO);
        assert!(!app.is_thinking(1));
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_the_local_answer() {
        let mut app = offline_app(false);

        app.chat_input = "what tools do you use?".to_string();
        app.submit_message();
        drain_pending(&mut app).await;

        assert_eq!(app.transcript[1].content, intent::respond("what tools do you use?", &[]));
    }

    #[tokio::test]
    async fn concurrent_submissions_resolve_independently() {
        let mut app = offline_app(false);

        app.chat_input = "skills?".to_string();
        app.submit_message();
        app.chat_input = "how do I contact you?".to_string();
        app.submit_message();

        assert_eq!(app.transcript.len(), 4);
        assert_eq!(app.transcript[1].content, THINKING_TEXT);
        assert_eq!(app.transcript[3].content, THINKING_TEXT);
        assert_eq!(app.in_flight(), 2);

        drain_pending(&mut app).await;

        assert_eq!(app.transcript[1].content, intent::SKILLS_ANSWER);
        assert_eq!(app.transcript[3].content, intent::CONTACT_ANSWER);
    }

    #[test]
    fn auto_open_posts_the_introduction() {
        let app = offline_app(true);

        assert!(app.chat_open);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].content, GREETING_TEXT);
        assert!(app.transcript[1].content.starts_with(intent::PROJECTS_INTRO));
    }

    #[test]
    fn chat_starts_closed_without_auto_open() {
        let mut app = offline_app(false);
        assert!(!app.chat_open);
        assert!(app.transcript.is_empty());

        app.toggle_chat();
        assert!(app.chat_open);
        assert_eq!(app.focus, FocusPane::ChatInput);
        assert_eq!(app.input_mode, InputMode::Editing);

        app.toggle_chat();
        assert!(!app.chat_open);
        assert_eq!(app.focus, FocusPane::Navigation);
    }
}
