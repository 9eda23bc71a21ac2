use rand::Rng;

use crate::{Result, SockError};

/// Number of hints every movie carries.
pub const HINTS_PER_MOVIE: usize = 4;

/// A catalog entry: a title and its hints in the order they are revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// Title the player has to guess.
    pub title: String,
    /// Hints, revealed first to last.
    pub hints: [String; HINTS_PER_MOVIE],
}

impl Movie {
    /// Creates a movie entry.
    pub fn new(title: impl Into<String>, hints: [&str; HINTS_PER_MOVIE]) -> Self {
        Self {
            title: title.into(),
            hints: hints.map(str::to_owned),
        }
    }
}

/// Read-only set of movies the game draws from.
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    movies: Vec<Movie>,
}

impl MovieCatalog {
    /// Builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SockError::EmptyCatalog`] if `movies` is empty.
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        if movies.is_empty() {
            return Err(SockError::EmptyCatalog);
        }
        Ok(Self { movies })
    }

    /// Picks a movie uniformly at random and returns its index.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        // Never empty, so the range is never empty either.
        rng.gen_range(0..self.movies.len())
    }

    /// Returns the movie at `index`.
    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Always false; a catalog cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl Default for MovieCatalog {
    fn default() -> Self {
        Self {
            movies: vec![
                Movie::new("Titanic", ["A ship", "An iceberg", "A love story", "1997"]),
                Movie::new(
                    "Inception",
                    ["Dreams", "Spinning top", "Christopher Nolan", "2010"],
                ),
                Movie::new("Avatar", ["Blue aliens", "Pandora", "James Cameron", "2009"]),
                Movie::new(
                    "The Godfather",
                    ["Mafia", "Don Corleone", "Family", "1972"],
                ),
            ],
        }
    }
}
