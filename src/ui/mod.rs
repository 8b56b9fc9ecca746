//! Presentation helpers that do not need the DOM
//!
//! The wasm entry point owns the actual element updates; this module holds
//! the sequencing and text formatting so it can be tested natively.

pub mod countdown;

pub use countdown::{Countdown, CountdownStatus};

use crate::leaderboard::LeaderboardEntry;
use crate::session::{GameOverSummary, Screen};

/// Which DOM overlays are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub start: bool,
    /// Countdown label, if one is showing
    pub countdown: Option<&'static str>,
    pub game_over: bool,
    pub initials_entry: bool,
}

impl Overlays {
    pub fn for_screen(screen: Screen, summary: Option<GameOverSummary>) -> Self {
        match screen {
            Screen::Title => Self {
                start: true,
                ..Self::default()
            },
            Screen::Countdown(label) => Self {
                countdown: Some(label),
                ..Self::default()
            },
            Screen::Playing => Self::default(),
            Screen::GameOver => Self {
                game_over: true,
                initials_entry: summary.is_some_and(|s| s.awaiting_initials),
                ..Self::default()
            },
        }
    }
}

/// HUD score label
pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

/// One leaderboard list line, e.g. `ABC - 12`
pub fn leaderboard_line(entry: &LeaderboardEntry) -> String {
    format!("{} - {}", entry.initials, entry.score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(score_label(0), "Score: 0");
        let entry = LeaderboardEntry {
            initials: "ABC".to_string(),
            score: 12,
        };
        assert_eq!(leaderboard_line(&entry), "ABC - 12");
    }

    #[test]
    fn test_overlays_per_screen() {
        let title = Overlays::for_screen(Screen::Title, None);
        assert!(title.start && !title.game_over && title.countdown.is_none());

        let countdown = Overlays::for_screen(Screen::Countdown("2"), None);
        assert_eq!(countdown.countdown, Some("2"));
        assert!(!countdown.start);

        assert_eq!(Overlays::for_screen(Screen::Playing, None), Overlays::default());
    }

    #[test]
    fn test_initials_entry_closes_after_submission() {
        use crate::Command;
        use crate::Session;
        use crate::persistence::MemoryStore;
        use crate::sim::Viewport;
        use crate::tuning::Tuning;

        let mut s = Session::new(Tuning::default(), Viewport::default(), 3, MemoryStore::new());
        s.handle(Command::BeginCountdown, 0.0).unwrap();
        let mut now = 0.0;
        while s.screen() != Screen::GameOver {
            now += 16.0;
            s.frame(0.016, now);
        }

        let before = Overlays::for_screen(s.screen(), s.summary());
        assert!(before.game_over && before.initials_entry);

        s.handle(Command::SubmitInitials("abc".to_string()), now)
            .unwrap();
        let after = Overlays::for_screen(s.screen(), s.summary());
        assert!(after.game_over);
        assert!(!after.initials_entry);
        assert_ne!(before, after);
    }
}
