use serde_json::{Map, Value};

use crate::game::{GameSession, GuessOutcome, HintOutcome, MovieCatalog};
use crate::registry::ConnectionState;
use crate::request::{Fields, FromFields};
use crate::{ProtocolError, Response};

const MENU_OPTIONS: [&str; 3] = ["leaderboard", "play", "quit"];

/// Runs `f` on the session bound to this connection.
fn with_session<T, F>(conn: &ConnectionState, f: F) -> Result<T, ProtocolError>
where
    F: FnOnce(&mut GameSession, &MovieCatalog) -> Result<T, ProtocolError>,
{
    let name = conn.player().ok_or(ProtocolError::NoSession)?;
    let store = conn.store();
    store
        .sessions()
        .update(name, conn.id(), |session| f(session, store.catalog()))
}

fn round_started(hint: String) -> Response {
    Response::success("game_start")
        .with("hint", hint)
        .with("message", "Guess the movie based on the hint!")
}

pub(crate) fn hello(_: (), _conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    Ok(Response::success("request_name").with("message", "Enter your name:"))
}

pub(crate) struct SetNameRequest {
    name: String,
}

impl FromFields for SetNameRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: fields.require_str("name")?.to_owned(),
        })
    }
}

pub(crate) fn set_name(
    req: SetNameRequest,
    conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    conn.store()
        .sessions()
        .insert(conn.id(), GameSession::new(req.name.as_str()));
    let message = format!("Hello {}! Enter your age:", req.name);

    if let Some(previous) = conn.bind_player(req.name.clone()) {
        if previous != req.name {
            conn.store().sessions().remove(&previous, conn.id());
        }
    }
    Ok(Response::success("request_age").with("message", message))
}

pub(crate) struct SetAgeRequest {
    age: Option<u64>,
}

impl FromFields for SetAgeRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            age: fields.optional_u64("age")?,
        })
    }
}

/// Records the age and shows the menu. A round in progress is forfeited
/// without scoring.
pub(crate) fn set_age(
    req: SetAgeRequest,
    conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    with_session(conn, |session, _| {
        session.set_age(req.age);
        Ok(())
    })?;
    Ok(Response::success("menu")
        .with("options", MENU_OPTIONS.to_vec())
        .with("message", "Choose an option:"))
}

pub(crate) fn leaderboard(_: (), conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let data: Map<String, Value> = conn
        .store()
        .leaderboard()
        .snapshot()
        .into_iter()
        .map(|(name, score)| (name, Value::from(score)))
        .collect();
    Ok(Response::success("leaderboard").with("data", data))
}

pub(crate) fn play(_: (), conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let hint = with_session(conn, |session, catalog| {
        session
            .start_game(catalog, &mut rand::thread_rng())
            .map(str::to_owned)
    })?;
    Ok(round_started(hint))
}

pub(crate) fn skip(_: (), conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let hint = with_session(conn, |session, catalog| {
        session
            .skip_round(catalog, &mut rand::thread_rng())
            .map(str::to_owned)
    })?;
    Ok(round_started(hint))
}

pub(crate) struct GuessRequest {
    guess: String,
}

impl FromFields for GuessRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            guess: fields.require_str("guess")?.to_owned(),
        })
    }
}

pub(crate) fn guess(
    req: GuessRequest,
    conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    let outcome = with_session(conn, |session, catalog| {
        session.process_guess(catalog, &req.guess)
    })?;
    Ok(match outcome {
        GuessOutcome::Correct { score } => Response::success("correct_guess")
            .with("message", "Correct! You earned 10 points.")
            .with("score", score),
        GuessOutcome::Wrong => {
            Response::success("wrong_guess").with("message", "Wrong! Try again.")
        }
    })
}

pub(crate) fn next_hint(_: (), conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let hint = with_session(conn, |session, catalog| {
        Ok(match session.next_hint(catalog)? {
            HintOutcome::Hint(hint) => Some(hint.to_owned()),
            HintOutcome::Exhausted => None,
        })
    })?;
    Ok(match hint {
        Some(hint) => Response::success("next_hint").with("hint", hint),
        None => Response::success("no_more_hints").with("message", "No more hints available!"),
    })
}

pub(crate) fn quit(_: (), conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let message = match conn.take_player() {
        Some(name) => {
            conn.store().sessions().remove(&name, conn.id());
            format!("Goodbye {}!", name)
        }
        None => "Goodbye!".to_owned(),
    };
    Ok(Response::success("quit").with("message", message))
}
