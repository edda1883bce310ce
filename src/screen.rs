//! Screen shell around the simulation
//!
//! Main menu waits for a touch, the game screen drives the world each frame,
//! and the pause screen freezes it.

use serde::{Deserialize, Serialize};

use crate::sim::{FrameEvent, FrameInput, World, advance};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen, touch anywhere to begin
    #[default]
    MainMenu,
    /// Active gameplay
    Playing,
    /// Game frozen, world kept
    Paused,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub drops_gathered: u32,
    pub drops_missed: u32,
    pub elapsed_secs: f64,
}

/// Owns the current screen and, once a game starts, its world
#[derive(Debug, Clone)]
pub struct Shell {
    screen: Screen,
    tuning: Tuning,
    world: Option<World>,
}

impl Shell {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            screen: Screen::MainMenu,
            tuning,
            world: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Run one host frame. `seed` is only used when a touch on the main menu
    /// starts a new game.
    pub fn frame(&mut self, input: &FrameInput, dt: f32, seed: u64) -> Vec<FrameEvent> {
        match self.screen {
            Screen::MainMenu => {
                if input.pointer.is_some() {
                    self.start(seed);
                }
                Vec::new()
            }
            Screen::Playing => match self.world.as_mut() {
                Some(world) => advance(world, input, dt),
                None => Vec::new(),
            },
            Screen::Paused => Vec::new(),
        }
    }

    /// Start a fresh game, replacing any world in progress
    pub fn start(&mut self, seed: u64) {
        self.world = Some(World::with_tuning(seed, self.tuning));
        self.screen = Screen::Playing;
        log::info!("Game started with seed: {}", seed);
    }

    pub fn pause(&mut self) {
        if self.screen == Screen::Playing {
            self.screen = Screen::Paused;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Paused {
            self.screen = Screen::Playing;
            log::info!("Game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.screen {
            Screen::Playing => self.pause(),
            Screen::Paused => self.resume(),
            Screen::MainMenu => {}
        }
    }

    /// End the current run and go back to the main menu
    pub fn quit_to_menu(&mut self) -> Option<RunSummary> {
        self.screen = Screen::MainMenu;
        let world = self.world.take()?;
        let summary = RunSummary {
            seed: world.seed,
            drops_gathered: world.drops_gathered,
            drops_missed: world.drops_missed,
            elapsed_secs: world.elapsed_secs(),
        };
        log::info!(
            "Run ended: {} drops collected, {} missed in {:.1}s",
            summary.drops_gathered,
            summary.drops_missed,
            summary.elapsed_secs
        );
        Some(summary)
    }

    /// HUD line for the current screen
    pub fn hud_text(&self) -> String {
        match (self.screen, &self.world) {
            (Screen::MainMenu, _) => "Welcome to Rain Catcher! Tap anywhere to begin!".to_string(),
            (Screen::Paused, Some(world)) => {
                format!("Paused - Drops Collected: {}", world.drops_gathered)
            }
            (_, Some(world)) => format!("Drops Collected: {}", world.drops_gathered),
            (_, None) => String::new(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_waits_for_touch() {
        let mut shell = Shell::default();
        assert_eq!(shell.screen(), Screen::MainMenu);

        shell.frame(&FrameInput::default(), 0.016, 1);
        assert_eq!(shell.screen(), Screen::MainMenu);
        assert!(shell.world().is_none());

        shell.frame(&FrameInput::touch(10.0, 10.0), 0.016, 1);
        assert_eq!(shell.screen(), Screen::Playing);
        assert_eq!(shell.world().map(|w| w.seed), Some(1));
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut shell = Shell::default();
        shell.start(5);
        shell.frame(&FrameInput::default(), 0.5, 0);
        let clock = shell.world().unwrap().clock_ns;

        shell.toggle_pause();
        assert_eq!(shell.screen(), Screen::Paused);
        shell.frame(&FrameInput::touch(0.0, 0.0), 0.5, 0);
        assert_eq!(shell.world().unwrap().clock_ns, clock);

        shell.toggle_pause();
        assert_eq!(shell.screen(), Screen::Playing);
        shell.frame(&FrameInput::default(), 0.5, 0);
        assert!(shell.world().unwrap().clock_ns > clock);
    }

    #[test]
    fn test_pause_ignored_on_menu() {
        let mut shell = Shell::default();
        shell.pause();
        assert_eq!(shell.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_quit_returns_summary() {
        let mut shell = Shell::default();
        assert!(shell.quit_to_menu().is_none());

        shell.start(9);
        shell.frame(&FrameInput::default(), 0.25, 0);
        let summary = shell.quit_to_menu().unwrap();
        assert_eq!(summary.seed, 9);
        assert_eq!(shell.screen(), Screen::MainMenu);
        assert!(shell.world().is_none());
        assert!((summary.elapsed_secs - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_hud_text() {
        let mut shell = Shell::default();
        assert!(shell.hud_text().contains("Tap anywhere"));
        shell.start(3);
        assert_eq!(shell.hud_text(), "Drops Collected: 0");
        shell.pause();
        assert!(shell.hud_text().starts_with("Paused"));
    }
}
