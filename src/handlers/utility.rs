use crate::registry::ConnectionState;
use crate::request::{Fields, FromFields};
use crate::{ProtocolError, Response};

pub(crate) struct EchoRequest {
    data: String,
}

impl FromFields for EchoRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            data: fields.require_str("data")?.to_owned(),
        })
    }
}

pub(crate) fn echo(
    req: EchoRequest,
    _conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    Ok(Response::success("echo").with("echo", format!("Here is your echo: {}", req.data)))
}

pub(crate) struct AddRequest {
    num1: i64,
    num2: i64,
}

impl FromFields for AddRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            num1: fields.require_i64("num1")?,
            num2: fields.require_i64("num2")?,
        })
    }
}

pub(crate) fn add(req: AddRequest, _conn: &mut ConnectionState) -> Result<Response, ProtocolError> {
    let result = req
        .num1
        .checked_add(req.num2)
        .ok_or(ProtocolError::Overflow)?;
    Ok(Response::success("add").with("result", result))
}

pub(crate) struct AddManyRequest {
    nums: Vec<i64>,
}

impl FromFields for AddManyRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(Self {
            nums: fields.require_i64_array("nums")?,
        })
    }
}

pub(crate) fn add_many(
    req: AddManyRequest,
    _conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    let result = req
        .nums
        .iter()
        .try_fold(0i64, |acc, &n| acc.checked_add(n))
        .ok_or(ProtocolError::Overflow)?;
    Ok(Response::success("addmany").with("result", result))
}

/// Counts characters of `count`, or only those equal to `find`.
pub(crate) struct CharCountRequest {
    text: String,
    find: Option<char>,
}

impl FromFields for CharCountRequest {
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
        let text = fields.require_str("count")?.to_owned();
        let find = if fields.optional_bool("findchar")?.unwrap_or(false) {
            Some(single_char(fields.require_str("find").ok())?)
        } else {
            None
        };
        Ok(Self { text, find })
    }
}

fn single_char(find: Option<&str>) -> Result<char, ProtocolError> {
    let mut chars = find.unwrap_or_default().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ProtocolError::FindNotSingleChar),
    }
}

pub(crate) fn char_count(
    req: CharCountRequest,
    _conn: &mut ConnectionState,
) -> Result<Response, ProtocolError> {
    let result = match req.find {
        Some(target) => req.text.chars().filter(|&c| c == target).count(),
        None => req.text.chars().count(),
    };
    Ok(Response::success("charcount").with("result", result))
}
