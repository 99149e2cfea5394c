//! Seams to the host bot: per-update context, transport and outgoing calls.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Attachments;
use crate::markup::InlineKeyboard;

/// Network side of the host. Implementations send calls as-is; menu
/// references have already been rendered by the time they arrive here.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Sends one prepared API call.
	async fn execute(&self, call: PreparedCall) -> anyhow::Result<()>;

	/// Acknowledges the incoming click, optionally with a user-visible notice.
	async fn answer_callback_query(&self, text: Option<String>) -> anyhow::Result<()>;
}

/// Per-update request context supplied by the host dispatcher.
pub trait MenuContext: Send + Sync + 'static {
	/// Raw callback data of the incoming click, if this update is one.
	fn callback_data(&self) -> Option<&str>;

	fn attachments(&self) -> &Attachments;

	fn attachments_mut(&mut self) -> &mut Attachments;

	fn transport(&self) -> &dyn Transport;
}

/// Bot API methods that may carry a reply grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiMethod {
	SendMessage,
	SendPhoto,
	SendVideo,
	SendAnimation,
	SendAudio,
	SendDocument,
	SendVoice,
	SendSticker,
	SendLocation,
	SendVenue,
	SendContact,
	SendPoll,
	SendDice,
	SendGame,
	SendInvoice,
	CopyMessage,
	EditMessageText,
	EditMessageCaption,
	EditMessageMedia,
	EditMessageReplyMarkup,
	EditMessageLiveLocation,
	StopMessageLiveLocation,
	StopPoll,
}

impl ApiMethod {
	/// Edit-style calls that a pending navigation may piggyback on.
	pub const fn is_edit(self) -> bool {
		matches!(
			self,
			Self::EditMessageText
				| Self::EditMessageCaption
				| Self::EditMessageMedia
				| Self::EditMessageReplyMarkup
				| Self::EditMessageLiveLocation
				| Self::StopMessageLiveLocation
		)
	}
}

/// Reply grid as requested by calling code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMarkup {
	/// Reference to a menu by id, rendered right before sending.
	Menu(String),
	/// An already rendered grid, sent untouched.
	Inline(InlineKeyboard),
}

/// Outgoing API call before menu references are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingCall {
	pub method: ApiMethod,
	pub params: Map<String, Value>,
	pub reply_markup: Option<ReplyMarkup>,
}

impl OutgoingCall {
	pub fn new(method: ApiMethod) -> Self {
		Self {
			method,
			params: Map::new(),
			reply_markup: None,
		}
	}

	pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Attaches a menu by id.
	pub fn menu(mut self, id: impl Into<String>) -> Self {
		self.reply_markup = Some(ReplyMarkup::Menu(id.into()));
		self
	}

	pub fn keyboard(mut self, keyboard: InlineKeyboard) -> Self {
		self.reply_markup = Some(ReplyMarkup::Inline(keyboard));
		self
	}
}

/// Outgoing API call with every menu reference rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
	pub method: ApiMethod,
	pub params: Map<String, Value>,
	pub reply_markup: Option<InlineKeyboard>,
}

impl PreparedCall {
	/// Dedicated grid rewrite of the message the click came from.
	pub fn edit_reply_markup(keyboard: InlineKeyboard) -> Self {
		Self {
			method: ApiMethod::EditMessageReplyMarkup,
			params: Map::new(),
			reply_markup: Some(keyboard),
		}
	}

	/// Request body with the grid merged into the parameters.
	pub fn body(&self) -> serde_json::Result<Value> {
		let mut body = self.params.clone();
		if let Some(keyboard) = &self.reply_markup {
			body.insert("reply_markup".into(), serde_json::to_value(keyboard)?);
		}
		Ok(Value::Object(body))
	}
}
