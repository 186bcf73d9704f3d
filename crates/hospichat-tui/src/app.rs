use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use hospichat_core::{Action, ChatClient, ChatState, Effect, ErrorPolicy, EXAMPLE_QUESTIONS};

/// View-side state wrapped around the core `ChatState`.
///
/// Everything about the conversation lives in `state`; this struct only adds
/// what the terminal needs: scrolling, example selection, animation.
pub struct App {
    pub should_quit: bool,
    pub state: ChatState,
    pub client: ChatClient,

    // Chat scroll state
    pub chat_scroll: u16,
    pub max_chat_scroll: u16, // updated during render
    pub follow_bottom: bool,
    pub chat_height: u16,     // inner height of the chat area, for paging

    // Example question picker (only while the conversation is empty)
    pub example_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(client: ChatClient, error_policy: ErrorPolicy) -> Self {
        Self {
            should_quit: false,
            state: ChatState::new(error_policy),
            client,
            chat_scroll: 0,
            max_chat_scroll: 0,
            follow_bottom: true,
            chat_height: 0,
            example_state: ListState::default(),
            animation_frame: 0,
            chat_area: None,
        }
    }

    /// Apply an action to the core state. The chat view jumps back to the
    /// newest message whenever the conversation grows or a request starts.
    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let before = (self.state.conversation().len(), self.state.is_pending());
        let effect = self.state.update(action);
        let after = (self.state.conversation().len(), self.state.is_pending());

        if after.0 > before.0 || (after.1 && !before.1) {
            self.follow_bottom = true;
        }
        if !self.state.shows_examples() {
            self.example_state.select(None);
        }
        effect
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.state.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_chat_scroll);
        if self.chat_scroll >= self.max_chat_scroll {
            self.follow_bottom = true;
        }
    }

    pub fn page_size(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }

    // Example picker navigation
    pub fn example_nav_down(&mut self) {
        let len = EXAMPLE_QUESTIONS.len();
        let i = match self.example_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.example_state.select(Some(i));
    }

    pub fn example_nav_up(&mut self) {
        if let Some(i) = self.example_state.selected() {
            self.example_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn selected_example(&self) -> Option<usize> {
        self.example_state.selected()
    }
}
