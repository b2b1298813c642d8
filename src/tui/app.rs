//! Main TUI application

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::board::BoardView;
use super::styles::Theme;
use crate::board::TaskStore;
use crate::config::{Config, IdentityConfig};
use crate::identity::{needs_consent, resolve_storage_key, IdentityProvider, IpLookupProvider};
use crate::storage::FileStore;

pub struct App {
    board: BoardView<FileStore>,
    theme: Theme,
    identity: IdentityConfig,
    should_quit: bool,
    identity_rx: Option<oneshot::Receiver<String>>,
}

impl App {
    pub fn new(profile: &str, identity_override: Option<&str>) -> Result<Self> {
        let config = Config::load()?;
        let backend = FileStore::new(profile)?;

        let key = resolve_storage_key(&backend, identity_override);
        let ask_consent =
            identity_override.is_none() && config.identity.enabled && needs_consent(&backend);

        let store = TaskStore::open(backend, key);
        let mut board = BoardView::new(store, config.export.resolve_dir());
        if ask_consent {
            board.ask_consent();
        }

        Ok(Self {
            board,
            theme: Theme::by_name(&config.theme.name),
            identity: config.identity,
            should_quit: false,
            identity_rx: None,
        })
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        terminal.clear()?;
        terminal.draw(|f| self.render(f))?;

        loop {
            // Poll with short timeout for responsive input
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                        terminal.draw(|f| self.render(f))?;
                    }
                    if self.should_quit {
                        break;
                    }
                    continue;
                }
            }

            if self.poll_identity() {
                terminal.draw(|f| self.render(f))?;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        self.board.render(frame, frame.area(), &self.theme);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.board.handle_key(key) {
            Some(Action::Quit) => self.should_quit = true,
            Some(Action::FetchIdentity) => self.start_identity_fetch(),
            None => {}
        }
    }

    fn start_identity_fetch(&mut self) {
        if !self.identity.enabled {
            self.board
                .set_status("Identity lookup is disabled in config");
            return;
        }

        let provider = match IpLookupProvider::from_config(&self.identity) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Failed to build identity client: {}", e);
                self.board.set_status(format!("Identity lookup unavailable: {}", e));
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        self.identity_rx = Some(rx);
        tokio::spawn(async move {
            let _ = tx.send(provider.fetch().await);
        });
        debug!("Spawned identity lookup");
    }

    /// Applies a finished identity lookup. Returns whether anything changed.
    fn poll_identity(&mut self) -> bool {
        let Some(mut rx) = self.identity_rx.take() else {
            return false;
        };
        match rx.try_recv() {
            Ok(identity) => {
                self.board.identity_resolved(&identity);
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                self.identity_rx = Some(rx);
                false
            }
            Err(oneshot::error::TryRecvError::Closed) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    FetchIdentity,
}
