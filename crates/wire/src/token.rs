use crate::WireError;
use crate::fingerprint::{TAG_MAX_BYTES, Tag};

/// Field separator inside a token.
pub const DELIMITER: char = '/';

/// Upper bound for callback data, in UTF-8 bytes.
pub const MAX_TOKEN_BYTES: usize = 64;

/// Space held back for everything except the menu id and payload when a
/// button is checked at build time: four separators, two three-digit hex
/// coordinates and a worst-case tag.
pub const RESERVED_SUFFIX_BYTES: usize = 4 + 3 + 3 + TAG_MAX_BYTES;

/// Decoded identity of one callback button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	pub menu_id: &'a str,
	pub row: usize,
	pub col: usize,
	pub payload: &'a str,
	pub tag: Tag,
}

/// Rejects empty menu ids and ids that would break token framing.
pub fn validate_menu_id(id: &str) -> Result<(), WireError> {
	if id.is_empty() {
		return Err(WireError::EmptyMenuId);
	}
	if id.contains(DELIMITER) {
		return Err(WireError::InvalidMenuId {
			id: id.to_owned(),
			delimiter: DELIMITER,
		});
	}
	Ok(())
}

/// Rejects payloads that would break token framing.
pub fn validate_payload(payload: &str) -> Result<(), WireError> {
	if payload.contains(DELIMITER) {
		return Err(WireError::PayloadDelimiter {
			payload: payload.to_owned(),
			delimiter: DELIMITER,
		});
	}
	Ok(())
}

/// Build-time budget check for a button owned by `menu_id`.
///
/// Counts bytes, not characters, and keeps [`RESERVED_SUFFIX_BYTES`] free for
/// the coordinates and the tag.
pub fn check_budget(menu_id: &str, payload: &str) -> Result<(), WireError> {
	validate_payload(payload)?;
	let len = menu_id.len() + payload.len() + RESERVED_SUFFIX_BYTES;
	if len > MAX_TOKEN_BYTES {
		return Err(WireError::BudgetExceeded {
			menu_id: menu_id.to_owned(),
			len,
			max: MAX_TOKEN_BYTES,
		});
	}
	Ok(())
}

/// Encodes everything but the tag: `"{menu_id}/{row:x}/{col:x}/{payload}/"`.
pub fn encode_prefix(menu_id: &str, row: usize, col: usize, payload: &str) -> Result<String, WireError> {
	validate_menu_id(menu_id)?;
	validate_payload(payload)?;
	Ok(format!("{menu_id}{DELIMITER}{row:x}{DELIMITER}{col:x}{DELIMITER}{payload}{DELIMITER}"))
}

/// Encodes a complete token and enforces [`MAX_TOKEN_BYTES`].
pub fn encode(menu_id: &str, row: usize, col: usize, payload: &str, tag: &Tag) -> Result<String, WireError> {
	let mut data = encode_prefix(menu_id, row, col, payload)?;
	data.push_str(&tag.to_string());
	if data.len() > MAX_TOKEN_BYTES {
		return Err(WireError::BudgetExceeded {
			menu_id: menu_id.to_owned(),
			len: data.len(),
			max: MAX_TOKEN_BYTES,
		});
	}
	Ok(data)
}

/// Token fields as they appear on the wire, coordinates not yet parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
	pub menu_id: &'a str,
	pub row: &'a str,
	pub col: &'a str,
	pub payload: &'a str,
	pub tag: Tag,
}

impl<'a> RawToken<'a> {
	/// Parses the hex coordinates. Only meaningful once `menu_id` is known to
	/// belong to the receiver; foreign data may carry anything here.
	pub fn resolve(self) -> Result<Token<'a>, WireError> {
		Ok(Token {
			menu_id: self.menu_id,
			row: parse_coordinate("row", self.row)?,
			col: parse_coordinate("column", self.col)?,
			payload: self.payload,
			tag: self.tag,
		})
	}
}

/// Splits incoming callback data into token fields without interpreting the
/// coordinates.
///
/// Data that does not have the token shape (too few fields, empty
/// coordinates, unknown tag) yields `None` since callback data may come from
/// unrelated senders.
pub fn split(data: &str) -> Option<RawToken<'_>> {
	let mut fields = data.splitn(5, DELIMITER);
	let (Some(menu_id), Some(row), Some(col), Some(payload), Some(tag)) =
		(fields.next(), fields.next(), fields.next(), fields.next(), fields.next())
	else {
		return None;
	};
	if menu_id.is_empty() || row.is_empty() || col.is_empty() {
		return None;
	}
	Some(RawToken {
		menu_id,
		row,
		col,
		payload,
		tag: Tag::parse(tag)?,
	})
}

/// Parses incoming callback data in one step: [`split`], then
/// [`RawToken::resolve`]. Coordinates that are present but not hex digits
/// are an error, so receivers serving several menus should split first and
/// resolve only tokens addressed to them.
pub fn decode(data: &str) -> Result<Option<Token<'_>>, WireError> {
	split(data).map(RawToken::resolve).transpose()
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<usize, WireError> {
	let invalid = || WireError::InvalidCoordinate {
		field,
		value: value.to_owned(),
	};
	if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(invalid());
	}
	usize::from_str_radix(value, 16).map_err(|_| invalid())
}
