//! Round flow of the shell game
//!
//! Positioning → Ready → (hide ball, shuffle) → Selecting → (reveal) →
//! Revealed → (cover, shuffle) → Selecting → ...
//!
//! The host feeds taps, selections and animation completions in; the game
//! answers with [`GameEvent`]s and calls into its injected collaborators.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::guess::evaluate_guess;
use super::level::generate_level_for;
use super::permutation::{Permutation, PermutationError};
use super::player::{AnimationPlayer, SwapTicket};
use super::sequencer::{SequencerError, SequencerEvent, ShuffleSequencer};
use crate::audio::{SoundEffect, SoundPlayer};
use crate::consts::*;
use crate::records::RecordStore;
use crate::settings::{ConfigError, GameConfig};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
    #[error(transparent)]
    Permutation(#[from] PermutationError),
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Looking for a surface to put the table on
    Positioning,
    /// Table placed, waiting for the first tap
    Ready,
    /// Cups are moving; input is ignored
    InAction,
    /// Waiting for the player to pick a cup
    Selecting,
    /// Ball shown, waiting for a tap to continue
    Revealed,
}

impl GamePhase {
    /// Prompt shown to the player in this phase
    pub fn message(&self) -> &'static str {
        match self {
            GamePhase::Positioning => "Move device to find a plane",
            GamePhase::Ready => "Tap to start",
            GamePhase::InAction => "",
            GamePhase::Selecting => "Choose a cup",
            GamePhase::Revealed => "Tap to continue",
        }
    }
}

/// What the cups are busy with while `InAction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Raise the ball cup, slide the ball under, lower it again
    HidingBall,
    Shuffling,
    /// Raising the ball cup after a right guess
    Revealing,
    /// Lowering the ball cup before the next level
    Covering,
}

/// Output for the host UI and renderer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    Message(&'static str),
    /// Raise `cup`, move the ball under it, lower it; report with `cup_moved`
    HideBallUnder { cup: usize, height: f32, duration: f32 },
    /// Move `cup` vertically by `dy`; report with `cup_moved`
    MoveCup { cup: usize, dy: f32, duration: f32 },
    ShowBall { cup: usize },
    HideBall,
    StepShuffled { step: usize },
    ScoreChanged(u64),
    RecordChanged(u64),
    GuessResult { cup: usize, correct: bool },
}

/// A running game with its collaborators
pub struct ShellGame<P: AnimationPlayer, S: SoundPlayer, R: RecordStore> {
    config: GameConfig,
    rng: Pcg32,
    sequencer: ShuffleSequencer,
    phase: GamePhase,
    action: Option<Action>,
    /// Original slot of the cup hiding the ball
    ball_cup: usize,
    level_number: u32,
    score: u64,
    record: u64,
    events: Vec<GameEvent>,
    player: P,
    sound: S,
    records: R,
}

impl<P: AnimationPlayer, S: SoundPlayer, R: RecordStore> ShellGame<P, S, R> {
    /// Start a game; the config is validated and must agree with the player
    pub fn new(
        config: GameConfig,
        seed: u64,
        player: P,
        sound: S,
        mut records: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let cups = config.cup_count;
        if let Some(animated) = player.cup_count().filter(|&n| n != cups) {
            return Err(ConfigError::Invalid(format!(
                "player animates {animated} cups but the table has {cups}"
            )));
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let ball_cup = rng.random_range(0..cups);
        let record = records.load();
        log::info!("New game: {cups} cups, seed {seed}, record {record}");

        Ok(Self {
            sequencer: ShuffleSequencer::new(cups, config.cup_spacing),
            config,
            rng,
            phase: GamePhase::Positioning,
            action: None,
            ball_cup,
            level_number: 1,
            score: 0,
            record,
            events: vec![GameEvent::Message(GamePhase::Positioning.message())],
            player,
            sound,
            records,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn record(&self) -> u64 {
        self.record
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn ball_cup(&self) -> usize {
        self.ball_cup
    }

    /// Accumulated arrangement of the cups
    pub fn cups(&self) -> &Permutation {
        self.sequencer.cups()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The host found a surface to place the table on
    pub fn plane_detected(&mut self) {
        if self.phase == GamePhase::Positioning {
            self.events.push(GameEvent::Message(
                "Plane is detected. Tap to position,\nwhere you'd like to put the game.",
            ));
        }
    }

    /// A tap anywhere that is not a cup selection
    pub fn tap(&mut self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Positioning => self.set_phase(GamePhase::Ready),
            GamePhase::Ready => {
                self.set_phase(GamePhase::InAction);
                self.action = Some(Action::HidingBall);
                self.events.push(GameEvent::HideBallUnder {
                    cup: self.ball_cup,
                    height: self.config.lift_height,
                    duration: self.config.lift_duration,
                });
            }
            GamePhase::Revealed => {
                self.set_phase(GamePhase::InAction);
                self.action = Some(Action::Covering);
                self.events.push(GameEvent::MoveCup {
                    cup: self.ball_cup,
                    dy: -self.config.lift_height,
                    duration: self.config.lift_duration,
                });
            }
            phase => log::debug!("Tap ignored in {phase:?}"),
        }
        Ok(())
    }

    /// The player picked `cup`
    pub fn select_cup(&mut self, cup: usize) -> Result<bool, GameError> {
        if self.phase != GamePhase::Selecting {
            log::debug!("Selection of cup {cup} ignored in {:?}", self.phase);
            return Ok(false);
        }
        let correct = evaluate_guess(self.sequencer.cups(), self.ball_cup, cup)?;
        log::info!("Cup {cup} selected, ball under cup {}: {correct}", self.ball_cup);
        self.events.push(GameEvent::GuessResult { cup, correct });
        self.events.push(GameEvent::ShowBall { cup: self.ball_cup });

        if correct {
            self.sound.play(SoundEffect::Success);
            self.set_phase(GamePhase::InAction);
            self.action = Some(Action::Revealing);
            self.events.push(GameEvent::MoveCup {
                cup: self.ball_cup,
                dy: self.config.lift_height,
                duration: self.config.lift_duration,
            });
        } else {
            self.sound.play(SoundEffect::Fail);
            self.set_score(self.score.saturating_sub(WRONG_GUESS_PENALTY));
        }
        Ok(correct)
    }

    /// A swap motion reported completion
    pub fn swap_finished(&mut self, ticket: SwapTicket) -> Result<(), GameError> {
        let events = self.sequencer.complete(ticket, &mut self.player)?;
        self.handle_sequencer(events);
        Ok(())
    }

    /// A `HideBallUnder` or `MoveCup` animation finished
    pub fn cup_moved(&mut self) -> Result<(), GameError> {
        match self.action.take() {
            Some(Action::HidingBall) | Some(Action::Covering) => self.start_level()?,
            Some(Action::Revealing) => {
                self.level_up();
                self.set_phase(GamePhase::Revealed);
            }
            other => {
                log::debug!("Unexpected cup move completion during {other:?}");
                self.action = other;
            }
        }
        Ok(())
    }

    fn start_level(&mut self) -> Result<(), GameError> {
        self.events.push(GameEvent::HideBall);
        let level = generate_level_for(self.config.cup_count, self.level_number, &mut self.rng);
        self.action = Some(Action::Shuffling);
        let events = self.sequencer.run_level(level, &mut self.player)?;
        self.handle_sequencer(events);
        Ok(())
    }

    fn handle_sequencer(&mut self, events: Vec<SequencerEvent>) {
        for event in events {
            match event {
                SequencerEvent::StepCompleted { step, .. } => {
                    self.events.push(GameEvent::StepShuffled { step });
                }
                SequencerEvent::LevelCompleted => {
                    self.action = None;
                    self.set_phase(GamePhase::Selecting);
                }
            }
        }
    }

    fn level_up(&mut self) {
        let previous = self.level_number;
        self.level_number += 1;
        let gained = u64::from(self.level_number - previous) * POINTS_PER_LEVEL;
        self.set_score(self.score + gained);
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
        self.events.push(GameEvent::ScoreChanged(score));
        if score > self.record {
            self.record = score;
            self.events.push(GameEvent::RecordChanged(score));
            if let Err(err) = self.records.save(score) {
                log::warn!("Failed to save record: {err}");
            }
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {phase:?}", self.phase);
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
        self.events.push(GameEvent::Message(phase.message()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MemoryRecordStore;
    use crate::sim::player::HeadlessPlayer;

    type TestGame = ShellGame<HeadlessPlayer, Vec<SoundEffect>, MemoryRecordStore>;

    fn new_game(seed: u64, record: u64) -> TestGame {
        ShellGame::new(
            GameConfig::default(),
            seed,
            HeadlessPlayer::new(CUP_COUNT),
            Vec::new(),
            MemoryRecordStore { record },
        )
        .unwrap()
    }

    /// Finish every swap until the shuffle is over
    fn finish_shuffle(game: &mut TestGame) {
        while !game.player().is_idle() {
            for ticket in game.player_mut().finish_all() {
                game.swap_finished(ticket).unwrap();
            }
        }
    }

    fn play_to_selection(game: &mut TestGame) {
        game.tap().unwrap();
        game.tap().unwrap();
        assert_eq!(game.phase(), GamePhase::InAction);
        game.cup_moved().unwrap();
        finish_shuffle(game);
        assert_eq!(game.phase(), GamePhase::Selecting);
    }

    /// Cup the player should pick to be right
    fn winning_cup(game: &TestGame) -> usize {
        let cups = game.cups();
        let target = cups.apply(game.ball_cup()).unwrap();
        (0..CUP_COUNT)
            .find(|&c| cups.apply(c).unwrap() == target)
            .unwrap()
    }

    #[test]
    fn test_phase_flow() {
        let mut game = new_game(1, 0);
        assert_eq!(game.phase(), GamePhase::Positioning);
        game.plane_detected();
        game.tap().unwrap();
        assert_eq!(game.phase(), GamePhase::Ready);

        game.tap().unwrap();
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::HideBallUnder { .. })));
        // Shuffling only starts once the ball is hidden
        assert!(game.player().is_idle());

        game.cup_moved().unwrap();
        assert_eq!(game.player().pending().len(), CUP_COUNT);
        finish_shuffle(&mut game);
        assert_eq!(game.phase(), GamePhase::Selecting);

        let shuffled = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::StepShuffled { .. }))
            .count();
        assert_eq!(shuffled, 1 + BASE_STEPS_PER_LEVEL);
    }

    #[test]
    fn test_right_guess_levels_up() {
        let mut game = new_game(77, 0);
        play_to_selection(&mut game);

        let cup = winning_cup(&game);
        assert!(game.select_cup(cup).unwrap());
        assert_eq!(game.sound().as_slice(), &[SoundEffect::Success]);
        assert_eq!(game.phase(), GamePhase::InAction);

        game.cup_moved().unwrap();
        assert_eq!(game.phase(), GamePhase::Revealed);
        assert_eq!(game.level_number(), 2);
        assert_eq!(game.score(), POINTS_PER_LEVEL);
        assert_eq!(game.record(), POINTS_PER_LEVEL);

        // Next level shuffles one step more
        game.tap().unwrap();
        game.cup_moved().unwrap();
        game.drain_events();
        finish_shuffle(&mut game);
        let shuffled = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::StepShuffled { .. }))
            .count();
        assert_eq!(shuffled, 2 + BASE_STEPS_PER_LEVEL);
    }

    #[test]
    fn test_wrong_guess_costs_points() {
        let mut game = new_game(3, 50);
        play_to_selection(&mut game);
        game.set_score(12);

        let right = winning_cup(&game);
        let wrong = (right + 1) % CUP_COUNT;
        assert!(!game.select_cup(wrong).unwrap());
        assert_eq!(game.score(), 7);
        assert_eq!(game.phase(), GamePhase::Selecting);
        assert!(!game.select_cup(wrong).unwrap());
        assert!(!game.select_cup(wrong).unwrap());
        assert_eq!(game.score(), 0);
        assert_eq!(game.record(), 50);
        assert_eq!(game.sound().len(), 3);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let empty_table = GameConfig {
            cup_count: 0,
            ..GameConfig::default()
        };
        let game = ShellGame::new(
            empty_table,
            1,
            HeadlessPlayer::new(0),
            Vec::new(),
            MemoryRecordStore::default(),
        );
        assert!(matches!(game, Err(ConfigError::Invalid(_))));

        let game = ShellGame::new(
            GameConfig::default(),
            1,
            HeadlessPlayer::new(5),
            Vec::new(),
            MemoryRecordStore::default(),
        );
        assert!(matches!(game, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_input_ignored_while_shuffling() {
        let mut game = new_game(9, 0);
        game.tap().unwrap();
        game.tap().unwrap();
        game.cup_moved().unwrap();
        assert!(matches!(game.select_cup(0), Ok(false)));
        game.tap().unwrap();
        assert_eq!(game.phase(), GamePhase::InAction);
        assert!(game.sound().is_empty());
    }

    #[test]
    fn test_record_saved_when_beaten() {
        let mut game = new_game(11, 5);
        play_to_selection(&mut game);
        let cup = winning_cup(&game);
        game.select_cup(cup).unwrap();
        game.cup_moved().unwrap();
        assert_eq!(game.records.record, POINTS_PER_LEVEL);
        assert!(game.drain_events().contains(&GameEvent::RecordChanged(POINTS_PER_LEVEL)));
    }
}
