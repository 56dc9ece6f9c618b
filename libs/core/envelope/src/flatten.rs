use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::empty::EmptyValue;

/// The `data` mapping of an envelope.
pub type Data = Map<String, Value>;

pub const SUCCESS_CODE: i32 = 0;
pub const SUCCESS_MSG: &str = "success";

/// Keys owned by the envelope itself. Never copied into `data`.
pub const RESERVED_KEYS: [&str; 2] = ["code", "msg"];

/// `code`/`msg` pair every response value carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResp {
    pub code: i32,
    pub msg: String,
}

impl BaseResp {
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(SUCCESS_CODE, SUCCESS_MSG)
    }
}

impl Default for BaseResp {
    fn default() -> Self {
        Self::success()
    }
}

/// Explicit field describer for response values.
///
/// Usually derived with `#[derive(Flatten)]`. Implementors push each non-empty
/// field into `data` under its wire name and forward to embedded values, so
/// composed structures end up in a single flat mapping.
pub trait Flatten {
    /// The base envelope carried by this value or one of its embedded parts.
    fn base(&self) -> Option<&BaseResp> {
        None
    }

    fn flatten_into(&self, data: &mut Data) -> Result<(), serde_json::Error>;
}

impl Flatten for BaseResp {
    fn base(&self) -> Option<&BaseResp> {
        Some(self)
    }

    fn flatten_into(&self, _data: &mut Data) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

impl Flatten for () {
    fn flatten_into(&self, _data: &mut Data) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

impl<T: Flatten + ?Sized> Flatten for &T {
    fn base(&self) -> Option<&BaseResp> {
        (**self).base()
    }

    fn flatten_into(&self, data: &mut Data) -> Result<(), serde_json::Error> {
        (**self).flatten_into(data)
    }
}

impl<T: Flatten + ?Sized> Flatten for Box<T> {
    fn base(&self) -> Option<&BaseResp> {
        (**self).base()
    }

    fn flatten_into(&self, data: &mut Data) -> Result<(), serde_json::Error> {
        (**self).flatten_into(data)
    }
}

impl<T: Flatten + ?Sized> Flatten for Arc<T> {
    fn base(&self) -> Option<&BaseResp> {
        (**self).base()
    }

    fn flatten_into(&self, data: &mut Data) -> Result<(), serde_json::Error> {
        (**self).flatten_into(data)
    }
}

/// An absent embedded value contributes nothing.
impl<T: Flatten> Flatten for Option<T> {
    fn base(&self) -> Option<&BaseResp> {
        self.as_ref().and_then(Flatten::base)
    }

    fn flatten_into(&self, data: &mut Data) -> Result<(), serde_json::Error> {
        match self {
            Some(inner) => inner.flatten_into(data),
            None => Ok(()),
        }
    }
}

/// Insert one leaf field into `data`.
///
/// Reserved keys and empty values are dropped. An existing key is
/// overwritten, so when two embedded parts share a wire name the one
/// flattened last wins.
pub fn insert_field<V>(data: &mut Data, key: &str, value: &V) -> Result<(), serde_json::Error>
where
    V: Serialize + EmptyValue + ?Sized,
{
    if RESERVED_KEYS.contains(&key) || value.is_empty_value() {
        return Ok(());
    }

    data.insert(key.to_owned(), serde_json::to_value(value)?);
    Ok(())
}
