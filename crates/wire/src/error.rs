use thiserror::Error;

/// Errors raised while building or parsing callback tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
	#[error("menu id must not be empty")]
	EmptyMenuId,

	/// Menu identifiers are the first token field and cannot contain the delimiter.
	#[error("menu id {id:?} must not contain '{delimiter}'")]
	InvalidMenuId { id: String, delimiter: char },

	/// Application payloads are framed by the delimiter and cannot contain it.
	#[error("payload {payload:?} must not contain '{delimiter}'")]
	PayloadDelimiter { payload: String, delimiter: char },

	/// Encoded token does not fit the callback byte budget.
	#[error("callback data for menu {menu_id:?} needs {len} bytes, at most {max} are available")]
	BudgetExceeded { menu_id: String, len: usize, max: usize },

	/// A coordinate field is present but is not a hex number.
	#[error("invalid {field} coordinate {value:?}")]
	InvalidCoordinate { field: &'static str, value: String },
}
