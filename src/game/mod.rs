//! The movie-guessing game.
//!
//! A [`GameSession`] moves through `Named → Menu → Playing ⇄ HintsExhausted`
//! and back to `Menu` after a correct guess. Sessions without a name do not
//! exist; quitting removes the session from the store.

mod catalog;

pub use self::catalog::{Movie, MovieCatalog, HINTS_PER_MOVIE};

use rand::Rng;

use crate::ProtocolError;

/// Points awarded for a correct guess.
pub const POINTS_PER_GUESS: u64 = 10;

const AGE_FIRST: &str = "Enter your age before starting a game.";
const NO_ROUND: &str = "No game in progress. Send play to start one.";

/// Where a session is in the game flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Name given, waiting for the age.
    Named,
    /// Age given; waiting for `play`, `leaderboard` or `quit`.
    Menu,
    /// A round is running and `hint` is the last hint shown.
    Playing {
        /// Catalog index of the secret movie.
        movie: usize,
        /// Index of the last hint shown.
        hint: usize,
    },
    /// A round is running and every hint has been shown.
    HintsExhausted {
        /// Catalog index of the secret movie.
        movie: usize,
    },
}

/// Result of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess matched; carries the new total score.
    Correct {
        /// Score after awarding the points.
        score: u64,
    },
    /// The guess did not match; the round continues.
    Wrong,
}

/// Result of asking for another hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome<'a> {
    /// The next hint.
    Hint(&'a str),
    /// All hints for this movie have been shown.
    Exhausted,
}

/// Per-player game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    name: String,
    age: Option<u64>,
    phase: Phase,
    score: u64,
}

impl GameSession {
    /// Creates a session for a freshly named player.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            phase: Phase::Named,
            score: 0,
        }
    }

    /// The player's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The age the player gave, if any.
    pub fn age(&self) -> Option<u64> {
        self.age
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cumulative score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Title of the movie being guessed, if a round is running.
    pub fn current_title<'c>(&self, catalog: &'c MovieCatalog) -> Option<&'c str> {
        match self.phase {
            Phase::Playing { movie, .. } | Phase::HintsExhausted { movie } => {
                catalog.get(movie).map(|m| m.title.as_str())
            }
            Phase::Named | Phase::Menu => None,
        }
    }

    /// Records the age and moves to the menu, abandoning any running round.
    pub fn set_age(&mut self, age: Option<u64>) {
        if age.is_some() {
            self.age = age;
        }
        self.phase = Phase::Menu;
    }

    /// Starts a round with a random movie and returns its first hint.
    pub fn start_game<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c MovieCatalog,
        rng: &mut R,
    ) -> Result<&'c str, ProtocolError> {
        if self.phase == Phase::Named {
            return Err(ProtocolError::InvalidState(AGE_FIRST));
        }
        let movie = catalog.random_index(rng);
        let first = catalog
            .get(movie)
            .map(|m| m.hints[0].as_str())
            .ok_or(ProtocolError::InvalidState(NO_ROUND))?;
        self.phase = Phase::Playing { movie, hint: 0 };
        Ok(first)
    }

    /// Forfeits the current movie without penalty and starts a new round.
    pub fn skip_round<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c MovieCatalog,
        rng: &mut R,
    ) -> Result<&'c str, ProtocolError> {
        self.start_game(catalog, rng)
    }

    /// Checks a guess against the secret title, ignoring case.
    pub fn process_guess(
        &mut self,
        catalog: &MovieCatalog,
        guess: &str,
    ) -> Result<GuessOutcome, ProtocolError> {
        let title = self
            .current_title(catalog)
            .ok_or(ProtocolError::InvalidState(NO_ROUND))?;

        if guess.to_lowercase() == title.to_lowercase() {
            self.score = self.score.saturating_add(POINTS_PER_GUESS);
            self.phase = Phase::Menu;
            Ok(GuessOutcome::Correct { score: self.score })
        } else {
            Ok(GuessOutcome::Wrong)
        }
    }

    /// Reveals the next hint, or reports that none are left.
    pub fn next_hint<'c>(
        &mut self,
        catalog: &'c MovieCatalog,
    ) -> Result<HintOutcome<'c>, ProtocolError> {
        match self.phase {
            Phase::Playing { movie, hint } if hint + 1 < HINTS_PER_MOVIE => {
                let movie_entry = catalog
                    .get(movie)
                    .ok_or(ProtocolError::InvalidState(NO_ROUND))?;
                self.phase = Phase::Playing {
                    movie,
                    hint: hint + 1,
                };
                Ok(HintOutcome::Hint(&movie_entry.hints[hint + 1]))
            }
            Phase::Playing { movie, .. } => {
                self.phase = Phase::HintsExhausted { movie };
                Ok(HintOutcome::Exhausted)
            }
            Phase::HintsExhausted { .. } => Ok(HintOutcome::Exhausted),
            Phase::Named | Phase::Menu => Err(ProtocolError::InvalidState(NO_ROUND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_movie() -> MovieCatalog {
        MovieCatalog::new(vec![Movie::new(
            "Inception",
            ["Dreams", "Spinning top", "Christopher Nolan", "2010"],
        )])
        .unwrap()
    }

    fn in_menu() -> GameSession {
        let mut session = GameSession::new("ana");
        session.set_age(Some(30));
        session
    }

    #[test]
    fn play_requires_age() {
        let catalog = single_movie();
        let mut session = GameSession::new("ana");
        let err = session
            .start_game(&catalog, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(err.to_string(), AGE_FIRST);
        assert_eq!(session.phase(), Phase::Named);
    }

    #[test]
    fn hints_run_out_after_three_more() {
        let catalog = single_movie();
        let mut session = in_menu();
        let first = session
            .start_game(&catalog, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(first, "Dreams");

        assert_eq!(
            session.next_hint(&catalog).unwrap(),
            HintOutcome::Hint("Spinning top")
        );
        assert_eq!(
            session.next_hint(&catalog).unwrap(),
            HintOutcome::Hint("Christopher Nolan")
        );
        assert_eq!(session.next_hint(&catalog).unwrap(), HintOutcome::Hint("2010"));
        assert_eq!(session.next_hint(&catalog).unwrap(), HintOutcome::Exhausted);
        assert_eq!(session.phase(), Phase::HintsExhausted { movie: 0 });
        assert_eq!(session.next_hint(&catalog).unwrap(), HintOutcome::Exhausted);
    }

    #[test]
    fn correct_guess_ignores_case_and_returns_to_menu() {
        let catalog = single_movie();
        let mut session = in_menu();
        session
            .start_game(&catalog, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(
            session.process_guess(&catalog, "Avatar").unwrap(),
            GuessOutcome::Wrong
        );
        assert_eq!(session.score(), 0);
        assert_eq!(
            session.process_guess(&catalog, "iNcEpTiOn").unwrap(),
            GuessOutcome::Correct { score: 10 }
        );
        assert_eq!(session.phase(), Phase::Menu);
        assert!(session.process_guess(&catalog, "Inception").is_err());
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn guess_still_allowed_once_hints_are_exhausted() {
        let catalog = single_movie();
        let mut session = in_menu();
        session
            .start_game(&catalog, &mut StdRng::seed_from_u64(1))
            .unwrap();
        for _ in 0..4 {
            session.next_hint(&catalog).unwrap();
        }
        assert_eq!(
            session.process_guess(&catalog, "inception").unwrap(),
            GuessOutcome::Correct { score: 10 }
        );
    }

    #[test]
    fn skip_restarts_hints_without_penalty() {
        let catalog = single_movie();
        let mut session = in_menu();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_game(&catalog, &mut rng).unwrap();
        session.next_hint(&catalog).unwrap();
        session.process_guess(&catalog, "nope").unwrap();

        assert_eq!(session.skip_round(&catalog, &mut rng).unwrap(), "Dreams");
        assert_eq!(session.phase(), Phase::Playing { movie: 0, hint: 0 });
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn hint_and_guess_need_a_round() {
        let catalog = single_movie();
        let mut session = in_menu();
        assert_eq!(
            session.next_hint(&catalog).unwrap_err().to_string(),
            NO_ROUND
        );
        assert!(session.process_guess(&catalog, "x").is_err());
    }
}
