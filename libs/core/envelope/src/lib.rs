//! Uniform JSON envelope for HTTP responses.
//!
//! Every endpoint answers with `{"code": int, "msg": string, "data": {...}?}`.
//! A service returns a response value that embeds a [`BaseResp`] plus any
//! number of payload structs; [`build_envelope`] flattens the payloads into a
//! single `data` mapping, dropping empty fields and the reserved `code`/`msg`
//! keys at every nesting level.
//!
//! ```ignore
//! use envelope::{BaseResp, Flatten, build_envelope};
//!
//! #[derive(Flatten)]
//! #[envelope(rename_all = "camelCase")]
//! struct LoginResp {
//!     #[envelope(embed)]
//!     base: BaseResp,
//!     user_id: String,
//!     access_token: String,
//! }
//!
//! let envelope = build_envelope(Some(&resp))?;
//! // {"code":0,"msg":"success","data":{"userId":"..","accessToken":".."}}
//! ```

extern crate self as envelope;

mod empty;
mod flatten;

pub use core_proc_macros::Flatten;
pub use empty::EmptyValue;
pub use flatten::{
    BaseResp, Data, Flatten, RESERVED_KEYS, SUCCESS_CODE, SUCCESS_MSG, insert_field,
};

pub use serde_json;

use serde::{Deserialize, Serialize};

/// Wire form of every successful or business-error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
}

impl Envelope {
    /// `{"code":0,"msg":"success"}` with no data.
    pub fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: SUCCESS_MSG.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Flatten a response value into its envelope.
///
/// `None` yields the empty success body. A value without a base envelope is
/// reported as success. `data` is attached only when at least one field
/// survived zero-value suppression.
pub fn build_envelope<R>(value: Option<&R>) -> Result<Envelope, serde_json::Error>
where
    R: Flatten + ?Sized,
{
    let Some(value) = value else {
        return Ok(Envelope::success());
    };

    let (code, msg) = match value.base() {
        Some(base) => (base.code, base.msg.clone()),
        None => (SUCCESS_CODE, SUCCESS_MSG.to_string()),
    };

    let mut data = Data::new();
    value.flatten_into(&mut data)?;

    Ok(Envelope {
        code,
        msg,
        data: (!data.is_empty()).then_some(data),
    })
}
