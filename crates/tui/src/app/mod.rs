use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};

use api_types::{comment::CommentNew, complaint::ComplaintNew};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    local_state::{CachedSnapshot, LocalState},
    media,
    store::{LocalStore, RemoteStore, Snapshot, Store},
    ui,
};

/// How often the mirror re-polls the server on its own.
const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Detail,
    Submit,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitField {
    Title,
    Description,
    Category,
    Location,
    StudentName,
    Email,
    ImagePaths,
}

impl SubmitField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Location => "Location",
            Self::StudentName => "Name",
            Self::Email => "Email",
            Self::ImagePaths => "Images",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Category,
            Self::Category => Self::Location,
            Self::Location => Self::StudentName,
            Self::StudentName => Self::Email,
            Self::Email => Self::ImagePaths,
            Self::ImagePaths => Self::Title,
        }
    }
}

#[derive(Debug, Default)]
pub struct SubmitForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub student_name: String,
    pub email: String,
    /// Semicolon-separated file paths, encoded at submission time.
    pub image_paths: String,
}

impl SubmitForm {
    fn field_mut(&mut self, field: SubmitField) -> &mut String {
        match field {
            SubmitField::Title => &mut self.title,
            SubmitField::Description => &mut self.description,
            SubmitField::Category => &mut self.category,
            SubmitField::Location => &mut self.location,
            SubmitField::StudentName => &mut self.student_name,
            SubmitField::Email => &mut self.email,
            SubmitField::ImagePaths => &mut self.image_paths,
        }
    }

    pub fn field(&self, field: SubmitField) -> &str {
        match field {
            SubmitField::Title => &self.title,
            SubmitField::Description => &self.description,
            SubmitField::Category => &self.category,
            SubmitField::Location => &self.location,
            SubmitField::StudentName => &self.student_name,
            SubmitField::Email => &self.email,
            SubmitField::ImagePaths => &self.image_paths,
        }
    }
}

#[derive(Debug, Default)]
pub struct CommentForm {
    pub active: bool,
    pub name: String,
    pub text: String,
    pub focus_text: bool,
}

pub struct AppState {
    pub screen: Screen,
    pub snapshot: Snapshot,
    pub selected: usize,
    /// Whether this client currently supports the selected complaint, when
    /// known.
    pub supported: Option<bool>,
    pub last_refresh: Option<DateTime<Utc>>,
    /// Set while the view shows cached data because the last fetch failed.
    pub stale: bool,
    pub offline: bool,
    pub message: Option<String>,
    pub submit: SubmitForm,
    pub submit_focus: SubmitField,
    pub comment: CommentForm,
    pub timezone: Tz,
}

impl AppState {
    pub fn selected_complaint(&self) -> Option<&api_types::complaint::ComplaintView> {
        self.snapshot.complaints.get(self.selected)
    }

    fn editing(&self) -> bool {
        self.screen == Screen::Submit || self.comment.active
    }
}

pub struct App {
    config: AppConfig,
    store: Store,
    local_state: LocalState,
    user_identifier: String,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut local_state = LocalState::load(&config.state_path)?;
        let user_identifier = local_state.ensure_user_identifier();
        local_state.save(&config.state_path)?;

        let store = if config.offline {
            Store::Local(LocalStore::new(local_state.local.clone()))
        } else {
            Store::Remote(RemoteStore::new(Client::new(&config.base_url)?))
        };

        let timezone: Tz = config.timezone.parse().unwrap_or(chrono_tz::UTC);

        let state = AppState {
            screen: Screen::Browse,
            snapshot: Snapshot::default(),
            selected: 0,
            supported: None,
            last_refresh: None,
            stale: false,
            offline: config.offline,
            message: None,
            submit: SubmitForm::default(),
            submit_focus: SubmitField::Title,
            comment: CommentForm::default(),
            timezone,
        };

        Ok(Self {
            config,
            store,
            local_state,
            user_identifier,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        self.refresh().await;
        let mut last_poll = Instant::now();

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            if last_poll.elapsed() >= REFRESH_INTERVAL {
                self.refresh().await;
                last_poll = Instant::now();
            }
        }

        Ok(())
    }

    /// Fetch a fresh snapshot; on failure keep showing what we have.
    ///
    /// A failed fetch never clears the view: the in-memory snapshot stays,
    /// and an empty one is backfilled from the state file's cached copy.
    async fn refresh(&mut self) {
        match self.store.snapshot().await {
            Ok(snapshot) => {
                if self.state.selected >= snapshot.complaints.len() {
                    self.state.selected = snapshot.complaints.len().saturating_sub(1);
                }
                self.state.snapshot = snapshot;
                self.state.last_refresh = Some(Utc::now());
                self.state.stale = false;

                if !self.state.offline {
                    self.cache_snapshot();
                }
            }
            Err(err) => {
                self.state.stale = true;
                self.state.message = Some(err.message());

                if self.state.snapshot.complaints.is_empty() {
                    if let Some(cached) = &self.local_state.cached {
                        self.state.snapshot = Snapshot {
                            complaints: cached.complaints.clone(),
                            categories: cached.categories.clone(),
                            locations: cached.locations.clone(),
                            stats: cached.stats.clone(),
                        };
                        self.state.last_refresh = Some(cached.fetched_at);
                    }
                }
            }
        }
    }

    fn cache_snapshot(&mut self) {
        self.local_state.cached = Some(CachedSnapshot {
            fetched_at: Utc::now(),
            complaints: self.state.snapshot.complaints.clone(),
            categories: self.state.snapshot.categories.clone(),
            locations: self.state.snapshot.locations.clone(),
            stats: self.state.snapshot.stats.clone(),
        });
        if let Err(err) = self.local_state.save(&self.config.state_path) {
            self.state.message = Some(format!("could not save state file: {err}"));
        }
    }

    /// Push offline-mode data back into the state file after a mutation.
    fn persist_local(&mut self) {
        if let Some(data) = self.store.local_data() {
            self.local_state.local = data.clone();
            if let Err(err) = self.local_state.save(&self.config.state_path) {
                self.state.message = Some(format!("could not save state file: {err}"));
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        use crate::ui::keymap::AppAction;

        match crate::ui::keymap::map_key(key, self.state.editing()) {
            AppAction::Quit => {
                self.should_quit = true;
            }
            AppAction::Cancel => self.handle_cancel(),
            AppAction::NextField => self.handle_next_field(),
            AppAction::Submit => self.handle_submit().await,
            AppAction::Backspace => {
                if let Some(field) = self.active_field_mut() {
                    field.pop();
                }
            }
            AppAction::Up => self.select_prev(),
            AppAction::Down => self.select_next(),
            AppAction::Input(ch) => {
                if self.state.editing() {
                    if let Some(field) = self.active_field_mut() {
                        field.push(ch);
                    }
                } else {
                    self.handle_shortcut(ch).await;
                }
            }
            AppAction::None => {}
        }

        Ok(())
    }

    fn handle_cancel(&mut self) {
        if self.state.comment.active {
            self.state.comment = CommentForm::default();
            return;
        }
        match self.state.screen {
            Screen::Submit | Screen::Detail | Screen::Stats => {
                self.state.screen = Screen::Browse;
            }
            Screen::Browse => {}
        }
    }

    fn handle_next_field(&mut self) {
        if self.state.comment.active {
            self.state.comment.focus_text = !self.state.comment.focus_text;
        } else if self.state.screen == Screen::Submit {
            self.state.submit_focus = self.state.submit_focus.next();
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        if self.state.comment.active {
            return Some(if self.state.comment.focus_text {
                &mut self.state.comment.text
            } else {
                &mut self.state.comment.name
            });
        }
        if self.state.screen == Screen::Submit {
            return Some(self.state.submit.field_mut(self.state.submit_focus));
        }
        None
    }

    async fn handle_submit(&mut self) {
        if self.state.comment.active {
            self.submit_comment().await;
            return;
        }
        match self.state.screen {
            Screen::Submit => self.submit_complaint().await,
            Screen::Browse => self.open_detail().await,
            Screen::Detail | Screen::Stats => {}
        }
    }

    async fn handle_shortcut(&mut self, ch: char) {
        match ch {
            'r' | 'R' => {
                self.refresh().await;
            }
            'j' | 'J' => self.select_next(),
            'k' | 'K' => self.select_prev(),
            'n' | 'N' => {
                if self.state.screen == Screen::Browse {
                    self.state.submit = SubmitForm::default();
                    self.state.submit_focus = SubmitField::Title;
                    self.state.screen = Screen::Submit;
                }
            }
            's' | 'S' => {
                self.state.screen = Screen::Stats;
            }
            'b' | 'B' => {
                if self.state.screen != Screen::Browse {
                    self.state.screen = Screen::Browse;
                }
            }
            'u' | 'U' => {
                if self.state.screen == Screen::Detail {
                    self.toggle_support().await;
                }
            }
            'c' | 'C' => {
                if self.state.screen == Screen::Detail {
                    self.state.comment = CommentForm {
                        active: true,
                        focus_text: true,
                        ..Default::default()
                    };
                }
            }
            _ => {}
        }
    }

    fn select_next(&mut self) {
        if self.state.screen != Screen::Browse || self.state.snapshot.complaints.is_empty() {
            return;
        }
        self.state.selected =
            (self.state.selected + 1).min(self.state.snapshot.complaints.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.state.screen != Screen::Browse {
            return;
        }
        self.state.selected = self.state.selected.saturating_sub(1);
    }

    async fn open_detail(&mut self) {
        let Some(complaint) = self.state.selected_complaint() else {
            return;
        };
        let id = complaint.id.clone();

        self.state.supported = self
            .store
            .has_supported(&id, &self.user_identifier)
            .await
            .ok();
        self.state.screen = Screen::Detail;
    }

    async fn toggle_support(&mut self) {
        let Some(complaint) = self.state.selected_complaint() else {
            return;
        };
        let id = complaint.id.clone();

        match self.store.toggle_support(&id, &self.user_identifier).await {
            Ok(state) => {
                self.state.supported = Some(state.supported);
                if let Some(complaint) = self.state.snapshot.complaints.get_mut(self.state.selected)
                {
                    complaint.support_count = state.support_count;
                }
                self.state.message = Some(if state.supported {
                    "Support added.".to_string()
                } else {
                    "Support removed.".to_string()
                });
                self.persist_local();
            }
            Err(err) => {
                self.state.message = Some(err.message());
            }
        }
    }

    async fn submit_comment(&mut self) {
        let Some(complaint) = self.state.selected_complaint() else {
            return;
        };
        let id = complaint.id.clone();

        let payload = CommentNew {
            name: Some(self.state.comment.name.clone()),
            text: self.state.comment.text.clone(),
        };
        match self.store.add_comment(&id, payload).await {
            Ok(_) => {
                self.state.comment = CommentForm::default();
                self.state.message = Some("Comment added.".to_string());
                self.persist_local();
                self.refresh().await;
            }
            Err(err) => {
                self.state.message = Some(err.message());
            }
        }
    }

    async fn submit_complaint(&mut self) {
        let mut images = Vec::new();
        for raw in self.state.submit.image_paths.split(';') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match media::prepare_image(std::path::Path::new(raw)) {
                Ok(encoded) => images.push(encoded),
                Err(err) => {
                    self.state.message = Some(format!("{raw}: {err}"));
                    return;
                }
            }
        }

        let form = &self.state.submit;
        let draft = ComplaintNew {
            student_name: Some(form.student_name.clone()),
            email: Some(form.email.clone()),
            title: form.title.clone(),
            description: form.description.clone(),
            category: form.category.clone(),
            location: if form.location.trim().is_empty() {
                None
            } else {
                Some(form.location.clone())
            },
            images,
        };

        match self.store.submit(draft).await {
            Ok(id) => {
                self.state.message = Some(format!("Complaint submitted: {id}"));
                self.state.screen = Screen::Browse;
                self.state.submit = SubmitForm::default();
                self.persist_local();
                self.refresh().await;
            }
            Err(err) => {
                self.state.message = Some(err.message());
            }
        }
    }
}
