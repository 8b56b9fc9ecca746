//! Session orchestration
//!
//! Owns the simulation, the pre-run countdown and the leaderboard with its
//! store. Input arrives as [`Command`] values and is applied immediately;
//! the frame driver calls [`Session::frame`] once per animation frame.

use crate::error::{Error, Result};
use crate::leaderboard::{Initials, Leaderboard};
use crate::persistence::ScoreStore;
use crate::sim::{GameEvent, GamePhase, Simulation, Snapshot, TickInput, Viewport, tick};
use crate::tuning::Tuning;
use crate::ui::{Countdown, CountdownStatus};

/// Discrete player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Space, mouse press or touch start
    Flap,
    /// Start button on the title screen
    BeginCountdown,
    /// Restart button on the game over screen
    Restart,
    /// Initials typed after a high score
    SubmitInitials(String),
}

/// What a handled command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Command not valid in the current screen
    Ignored,
    Flapped,
    CountdownStarted,
    Restarted,
    /// Score entered at this rank (None if it fell off the board)
    Submitted { rank: Option<usize> },
}

/// Which overlay the UI should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Countdown(&'static str),
    Playing,
    GameOver,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    /// Higher of this score and the stored best
    pub best: u32,
    /// Whether the initials prompt is open
    pub awaiting_initials: bool,
    /// Rank after a successful submission
    pub rank: Option<usize>,
}

pub struct Session<S: ScoreStore> {
    sim: Simulation,
    leaderboard: Leaderboard,
    store: S,
    countdown: Option<Countdown>,
    countdown_label: &'static str,
    summary: Option<GameOverSummary>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64, store: S) -> Self {
        let leaderboard = match store.load() {
            Ok(entries) => {
                log::info!("Loaded {} high scores", entries.len());
                Leaderboard::from_entries(entries)
            }
            Err(e) => {
                log::warn!("Starting with an empty leaderboard: {}", e);
                Leaderboard::new()
            }
        };

        Self {
            sim: Simulation::new(tuning, viewport, seed),
            leaderboard,
            store,
            countdown: None,
            countdown_label: "",
            summary: None,
        }
    }

    /// Apply a command right away. `now` is wall-clock ms.
    pub fn handle(&mut self, command: Command, now: f64) -> Result<Reaction> {
        let reaction = match command {
            Command::Flap => {
                if self.sim.flap() {
                    Reaction::Flapped
                } else {
                    Reaction::Ignored
                }
            }
            Command::BeginCountdown => {
                if self.screen() != Screen::Title {
                    Reaction::Ignored
                } else {
                    let countdown = Countdown::new(now);
                    self.countdown_label = match countdown.poll(now) {
                        CountdownStatus::Showing(label) => label,
                        CountdownStatus::Finished => "",
                    };
                    self.countdown = Some(countdown);
                    Reaction::CountdownStarted
                }
            }
            Command::Restart => {
                if self.sim.phase() != GamePhase::Over {
                    Reaction::Ignored
                } else {
                    log::info!("Restarting game");
                    self.sim.restart();
                    self.summary = None;
                    Reaction::Restarted
                }
            }
            Command::SubmitInitials(input) => {
                let rank = self.submit_initials(&input)?;
                Reaction::Submitted { rank }
            }
        };
        Ok(reaction)
    }

    /// Advance one animation frame
    pub fn frame(&mut self, dt: f32, now: f64) -> Vec<GameEvent> {
        self.frame_with_input(&TickInput::default(), dt, now)
    }

    /// Advance one frame with input sampled for this tick (autopilot, replays)
    pub fn frame_with_input(&mut self, input: &TickInput, dt: f32, now: f64) -> Vec<GameEvent> {
        if let Some(countdown) = self.countdown {
            match countdown.poll(now) {
                CountdownStatus::Showing(label) => self.countdown_label = label,
                CountdownStatus::Finished => {
                    self.countdown = None;
                    self.countdown_label = "";
                    self.sim.start(now);
                }
            }
        }

        let events = tick(&mut self.sim, input, dt, now);
        for event in &events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.finish_run(score);
            }
        }
        events
    }

    fn finish_run(&mut self, score: u32) {
        let awaiting_initials = self.leaderboard.is_high_score(score);
        self.summary = Some(GameOverSummary {
            score,
            best: score.max(self.leaderboard.best_score()),
            awaiting_initials,
            rank: None,
        });
        log::info!(
            "Game over! Score: {} (high score: {})",
            score,
            awaiting_initials
        );
    }

    fn submit_initials(&mut self, input: &str) -> Result<Option<usize>> {
        let summary = match self.summary {
            Some(summary) if summary.awaiting_initials => summary,
            _ => return Err(Error::NoPendingEntry),
        };
        let initials = Initials::parse(input)?;

        let rank = self.leaderboard.submit(&initials, summary.score);
        if let Err(e) = self.store.save(self.leaderboard.entries()) {
            log::error!("Failed to save leaderboard: {}", e);
        }

        self.summary = Some(GameOverSummary {
            best: self.leaderboard.best_score(),
            awaiting_initials: false,
            rank,
            ..summary
        });
        Ok(rank)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.sim.resize(viewport);
    }

    pub fn screen(&self) -> Screen {
        if self.countdown.is_some() {
            return Screen::Countdown(self.countdown_label);
        }
        match self.sim.phase() {
            GamePhase::NotStarted => Screen::Title,
            GamePhase::Running => Screen::Playing,
            GamePhase::Over => Screen::GameOver,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.sim.snapshot()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn summary(&self) -> Option<GameOverSummary> {
        self.summary
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
