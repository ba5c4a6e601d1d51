//! Interactive terminal session.
//!
//! Reproduces client-side navigation: every route change goes through a
//! [`Session`], fetches race on the runtime, and each applied result is
//! committed to a [`TerminalHead`] that prints the head changes. While the
//! admin view is mounted, keystrokes also feed the [`AdminGate`]; once it
//! opens, the session prompts for credentials.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   Input    ┌──────────────────────────────┐
//! │  Key Thread     │ ─────────▶ │  select! loop (tokio)        │
//! │ (crossterm raw) │   mpsc     │   ├─ key      → Browser::input│
//! └─────────────────┘            │   └─ Completion → commit head │
//!                                └──────────────────────────────┘
//! ```

use crate::{
    admin::{AdminGate, AdminSession, Credentials, IdentityProvider, Key},
    config::cfg,
    head::{HeadSink, TerminalHead, policy::SiteMeta},
    log,
    render::body::display_date,
    resolve::Resolver,
    store::DataSource,
    view::{Applied, DetailPhase, ListingPhase, Route, Session, View, ViewController},
};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType},
};
use std::{
    io::{Write, stdout},
    sync::Arc,
    thread,
    time::Instant,
};
use tokio::{runtime::Runtime, sync::mpsc};

// ============================================================================
// Input
// ============================================================================

/// A keystroke, reduced to what the session cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Enter,
    Backspace,
    Escape,
    /// Any other named key
    Named(String),
    /// Ctrl+C or Ctrl+D
    Interrupt,
}

impl Input {
    fn from_event(event: KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        Some(match event.code {
            KeyCode::Char('c' | 'd') if ctrl => Self::Interrupt,
            KeyCode::Char(ch) => Self::Char(ch),
            KeyCode::Enter => Self::Enter,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Esc => Self::Escape,
            other => Self::Named(format!("{other:?}")),
        })
    }

    /// The key as the admin gate sees it.
    fn gate_key(&self) -> Key {
        match self {
            Self::Char(ch) => Key::Char(*ch),
            Self::Enter => Key::Named("Enter".into()),
            Self::Backspace => Key::Named("Backspace".into()),
            Self::Escape => Key::Named("Escape".into()),
            Self::Named(name) => Key::Named(name.clone()),
            Self::Interrupt => Key::Named("Interrupt".into()),
        }
    }
}

/// Whether the session keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Navigate,
    Email,
    Password { email: String },
}

// ============================================================================
// Browser
// ============================================================================

pub struct Browser<S, I> {
    session: Session<S>,
    identity: I,
    gate_template: AdminGate,
    gate: AdminGate,
    sink: TerminalHead,
    mode: Mode,
    line: String,
    history: Vec<Route>,
    admin: Option<AdminSession>,
    /// Redraw the prompt line after each key
    echo: bool,
}

impl<S, I> Browser<S, I>
where
    S: DataSource + 'static,
    I: IdentityProvider,
{
    pub fn new(session: Session<S>, identity: I, gate: AdminGate, echo: bool) -> Self {
        Self {
            session,
            identity,
            gate: gate.clone(),
            gate_template: gate,
            sink: TerminalHead::new(),
            mode: Mode::Navigate,
            line: String::new(),
            history: Vec::new(),
            admin: None,
            echo,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn admin(&self) -> Option<&AdminSession> {
        self.admin.as_ref()
    }

    /// Navigate to `route`, recording it in the history.
    pub fn open(&mut self, route: Route) -> Result<()> {
        self.history.push(route.clone());
        self.mount(route)
    }

    fn mount(&mut self, route: Route) -> Result<()> {
        if route == Route::Admin {
            self.gate = self.gate_template.clone();
        }
        self.mode = Mode::Navigate;
        self.session.navigate(route);
        self.show()
    }

    /// A fetch finished.
    pub fn on_completion(&mut self, applied: Applied) -> Result<()> {
        match applied {
            Applied::Applied => self.show(),
            Applied::Stale => Ok(()),
        }
    }

    /// Handle one keystroke received at `now`.
    pub async fn input(&mut self, input: Input, now: Instant) -> Result<Flow> {
        if input == Input::Interrupt {
            return Ok(Flow::Quit);
        }

        if self.mode == Mode::Navigate
            && *self.session.controller().view() == View::Admin
            && !self.gate.is_open()
            && self.gate.press(input.gate_key(), now)
        {
            log!("admin"; "sign in");
            self.line.clear();
            self.mode = Mode::Email;
            self.redraw();
            return Ok(Flow::Continue);
        }

        match input {
            Input::Char(ch) => self.line.push(ch),
            Input::Backspace => {
                self.line.pop();
            }
            Input::Escape => {
                self.line.clear();
                if self.mode != Mode::Navigate {
                    log!("admin"; "sign-in cancelled");
                    self.mode = Mode::Navigate;
                }
            }
            Input::Enter => {
                let line = std::mem::take(&mut self.line);
                let flow = self.submit(line.trim()).await?;
                self.redraw();
                return Ok(flow);
            }
            Input::Named(_) | Input::Interrupt => {}
        }

        self.redraw();
        Ok(Flow::Continue)
    }

    async fn submit(&mut self, line: &str) -> Result<Flow> {
        match std::mem::replace(&mut self.mode, Mode::Navigate) {
            Mode::Navigate => self.command(line).await,
            Mode::Email => {
                self.mode = Mode::Password {
                    email: line.to_owned(),
                };
                Ok(Flow::Continue)
            }
            Mode::Password { email } => {
                let credentials = Credentials::new(email, line);
                match self.identity.sign_in(&credentials).await {
                    Ok(session) => {
                        log!("admin"; "signed in as {}", session.email);
                        log!("admin"; "manage posts with `cricket-hub post add|update|delete`");
                        self.admin = Some(session);
                    }
                    Err(err) => {
                        log!("admin"; "{err}");
                        self.mode = Mode::Email;
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }

    async fn command(&mut self, line: &str) -> Result<Flow> {
        match line {
            "" => {}
            "q" | "quit" => return Ok(Flow::Quit),
            "h" | "help" | "?" => print_help(),
            "b" | "back" => {
                if self.history.len() > 1 {
                    self.history.pop();
                    if let Some(previous) = self.history.last().cloned() {
                        self.mount(previous)?;
                    }
                } else {
                    log!("browse"; "no earlier page");
                }
            }
            "logout" => match self.admin.take() {
                Some(session) => {
                    log!("admin"; "signed out {}", session.email);
                    self.identity.sign_out(session).await;
                }
                None => log!("admin"; "not signed in"),
            },
            path if path.starts_with('/') => self.open(Route::parse(path))?,
            number => match number.parse::<usize>() {
                Ok(n) => match self.listed_post(n) {
                    Some(route) => self.open(route)?,
                    None => log!("browse"; "no post #{n} on this page"),
                },
                Err(_) => log!("browse"; "unknown command `{number}`, type `h` for help"),
            },
        }
        Ok(Flow::Continue)
    }

    /// Route of the `n`th (1-based) post on the mounted listing.
    fn listed_post(&self, n: usize) -> Option<Route> {
        match self.session.controller().view() {
            View::Listing(ListingPhase::Ready(posts)) => n
                .checked_sub(1)
                .and_then(|i| posts.get(i))
                .map(|post| Route::Post(post.route_key().to_owned())),
            _ => None,
        }
    }

    /// Commit the head and describe the mounted view.
    fn show(&mut self) -> Result<()> {
        let controller = self.session.controller();
        self.sink.commit(controller.head())?;
        for line in describe(controller.view()) {
            log!("view"; "{line}");
        }
        self.redraw();
        Ok(())
    }

    fn redraw(&self) {
        if !self.echo {
            return;
        }
        let (label, shown) = match &self.mode {
            Mode::Navigate => ("go", self.line.clone()),
            Mode::Email => ("email", self.line.clone()),
            Mode::Password { .. } => ("password", "*".repeat(self.line.chars().count())),
        };
        let mut out = stdout().lock();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
        write!(out, "\r{label}> {shown}").ok();
        out.flush().ok();
    }
}

/// Text summary of a view.
pub fn describe(view: &View) -> Vec<String> {
    match view {
        View::Blank => Vec::new(),
        View::Listing(ListingPhase::Loading) | View::Detail {
            phase: DetailPhase::Loading,
            ..
        } => vec!["loading...".to_owned()],
        View::Listing(ListingPhase::Ready(posts)) if posts.is_empty() => {
            vec!["Latest Articles: none yet".to_owned()]
        }
        View::Listing(ListingPhase::Ready(posts)) => {
            let mut lines = vec!["Latest Articles".to_owned()];
            lines.extend(posts.iter().enumerate().map(|(i, post)| {
                format!(
                    "{:>3}. {} ({}, {})",
                    i + 1,
                    post.title,
                    post.author,
                    display_date(&post.date)
                )
            }));
            lines
        }
        View::Listing(ListingPhase::Failed(err)) | View::Detail {
            phase: DetailPhase::Failed(err),
            ..
        } => vec![format!("Something went wrong: {err}")],
        View::Detail {
            phase: DetailPhase::Displaying(post),
            ..
        } => vec![
            post.title.clone(),
            format!("By {} on {}", post.author, display_date(&post.date)),
            post.excerpt.clone(),
        ],
        View::Detail {
            phase: DetailPhase::NotFound,
            slug,
        } => vec![format!("Post not found: {slug}")],
        View::Static(page) => vec![page.title().to_owned()],
        View::Admin => vec!["Admin Login".to_owned()],
        View::Missing(path) => vec![format!("Page not found: {path}")],
    }
}

fn print_help() {
    log!("browse"; "/path  open a route (/, /post/<slug>, /about, /contact, /privacy, /admin)");
    log!("browse"; "<n>    open the n-th post of the listing");
    log!("browse"; "b      back    logout  sign out    q  quit");
}

// ============================================================================
// Entry Point
// ============================================================================

/// Restores the terminal on drop.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        println!();
    }
}

/// Forward key presses until the receiver goes away.
fn read_keys(tx: mpsc::UnboundedSender<Input>) {
    loop {
        match event::read() {
            Ok(Event::Key(key)) => {
                if let Some(input) = Input::from_event(key)
                    && tx.send(input).is_err()
                {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                log!("error"; "terminal input: {err}");
                let _ = tx.send(Input::Interrupt);
                break;
            }
        }
    }
}

/// Run the interactive session until the user quits.
pub fn browse_site<S, I>(runtime: &Runtime, source: Arc<S>, identity: I) -> Result<()>
where
    S: DataSource + 'static,
    I: IdentityProvider,
{
    let c = cfg();
    let controller = ViewController::new(SiteMeta::from_config(&c));
    let session = Session::new(controller, source, Arc::new(Resolver::default()));
    let mut browser = Browser::new(session, identity, AdminGate::from_config(&c), true);

    let _raw = RawMode::enable()?;
    let (tx, mut keys) = mpsc::unbounded_channel();
    thread::spawn(move || read_keys(tx));

    runtime.block_on(async move {
        print_help();
        browser.open(Route::Home)?;

        loop {
            tokio::select! {
                input = keys.recv() => {
                    let Some(input) = input else { break };
                    if browser.input(input, Instant::now()).await? == Flow::Quit {
                        break;
                    }
                }
                Some(applied) = browser.session.next_completion(), if browser.session.in_flight() > 0 => {
                    browser.on_completion(applied)?;
                }
            }
        }

        browser.session.leave();
        Ok(())
    })
}
