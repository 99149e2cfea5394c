//! Declared buttons, before rendering.

use std::sync::Arc;

use crate::Handler;
use crate::future::{BoxFutureSend, TextFn};
use crate::markup::LoginUrl;

/// A string that is either fixed or produced from the request context.
///
/// Used for labels, payloads and custom fingerprints.
pub enum Text<C> {
	Static(Arc<str>),
	Dynamic(TextFn<C>),
}

impl<C> Clone for Text<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Static(text) => Self::Static(Arc::clone(text)),
			Self::Dynamic(f) => Self::Dynamic(Arc::clone(f)),
		}
	}
}

impl<C> std::fmt::Debug for Text<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Static(text) => write!(f, "{text:?}"),
			Self::Dynamic(_) => f.write_str("<dynamic>"),
		}
	}
}

impl<C> From<&str> for Text<C> {
	fn from(text: &str) -> Self {
		Self::Static(Arc::from(text))
	}
}

impl<C> From<String> for Text<C> {
	fn from(text: String) -> Self {
		Self::Static(Arc::from(text))
	}
}

impl<C: Sync + 'static> Text<C> {
	/// Context-dependent text computed synchronously.
	pub fn from_fn<F>(f: F) -> Self
	where
		F: Fn(&C) -> String + Send + Sync + 'static,
	{
		Self::from_async(move |ctx| Box::pin(std::future::ready(f(ctx))))
	}

	/// Context-dependent text that may suspend, e.g. to look up a translation.
	pub fn from_async<F>(f: F) -> Self
	where
		F: for<'a> Fn(&'a C) -> BoxFutureSend<'a, String> + Send + Sync + 'static,
	{
		Self::Dynamic(Arc::new(f))
	}

	/// The literal value, if this text does not depend on the context.
	pub fn as_static(&self) -> Option<&str> {
		match self {
			Self::Static(text) => Some(text),
			Self::Dynamic(_) => None,
		}
	}

	pub async fn resolve(&self, ctx: &C) -> String {
		match self {
			Self::Static(text) => text.to_string(),
			Self::Dynamic(f) => f(ctx).await,
		}
	}
}

/// Application-invoked button state: handler chain, payload and fingerprint.
pub struct CallbackButton<C> {
	handlers: Vec<Handler<C>>,
	payload: Option<Text<C>>,
	fingerprint: Option<Text<C>>,
}

impl<C> Clone for CallbackButton<C> {
	fn clone(&self) -> Self {
		Self {
			handlers: self.handlers.clone(),
			payload: self.payload.clone(),
			fingerprint: self.fingerprint.clone(),
		}
	}
}

impl<C> std::fmt::Debug for CallbackButton<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CallbackButton")
			.field("handlers", &self.handlers.len())
			.field("payload", &self.payload)
			.field("fingerprint", &self.fingerprint)
			.finish()
	}
}

impl<C> Default for CallbackButton<C> {
	fn default() -> Self {
		Self {
			handlers: Vec::new(),
			payload: None,
			fingerprint: None,
		}
	}
}

impl<C: Sync + 'static> CallbackButton<C> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a step to the handler chain.
	pub fn handler(mut self, handler: Handler<C>) -> Self {
		self.handlers.push(handler);
		self
	}

	/// Application payload embedded in the token.
	pub fn payload(mut self, payload: impl Into<Text<C>>) -> Self {
		self.payload = Some(payload.into());
		self
	}

	/// Button-level custom fingerprint; takes precedence over the menu's.
	pub fn fingerprint(mut self, fingerprint: impl Into<Text<C>>) -> Self {
		self.fingerprint = Some(fingerprint.into());
		self
	}

	pub fn handlers(&self) -> &[Handler<C>] {
		&self.handlers
	}

	pub fn payload_text(&self) -> Option<&Text<C>> {
		self.payload.as_ref()
	}

	pub fn fingerprint_text(&self) -> Option<&Text<C>> {
		self.fingerprint.as_ref()
	}

	/// Payload for this request; buttons without one use the empty string.
	pub async fn resolve_payload(&self, ctx: &C) -> String {
		match &self.payload {
			Some(payload) => payload.resolve(ctx).await,
			None => String::new(),
		}
	}
}

/// Button variants. Only [`ButtonKind::Callback`] is navigable.
pub enum ButtonKind<C> {
	Url(String),
	Login(LoginUrl),
	Callback(CallbackButton<C>),
	SwitchInline(String),
	SwitchInlineCurrent(String),
	WebApp(String),
	Game,
	Pay,
}

impl<C> Clone for ButtonKind<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Url(url) => Self::Url(url.clone()),
			Self::Login(login) => Self::Login(login.clone()),
			Self::Callback(callback) => Self::Callback(callback.clone()),
			Self::SwitchInline(query) => Self::SwitchInline(query.clone()),
			Self::SwitchInlineCurrent(query) => Self::SwitchInlineCurrent(query.clone()),
			Self::WebApp(url) => Self::WebApp(url.clone()),
			Self::Game => Self::Game,
			Self::Pay => Self::Pay,
		}
	}
}

impl<C> std::fmt::Debug for ButtonKind<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
			Self::Login(login) => f.debug_tuple("Login").field(login).finish(),
			Self::Callback(callback) => f.debug_tuple("Callback").field(callback).finish(),
			Self::SwitchInline(query) => f.debug_tuple("SwitchInline").field(query).finish(),
			Self::SwitchInlineCurrent(query) => f.debug_tuple("SwitchInlineCurrent").field(query).finish(),
			Self::WebApp(url) => f.debug_tuple("WebApp").field(url).finish(),
			Self::Game => f.write_str("Game"),
			Self::Pay => f.write_str("Pay"),
		}
	}
}

/// A declared button: label plus variant.
pub struct Button<C> {
	pub label: Text<C>,
	pub kind: ButtonKind<C>,
}

impl<C> Clone for Button<C> {
	fn clone(&self) -> Self {
		Self {
			label: self.label.clone(),
			kind: self.kind.clone(),
		}
	}
}

impl<C> std::fmt::Debug for Button<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Button").field("label", &self.label).field("kind", &self.kind).finish()
	}
}

impl<C: Sync + 'static> Button<C> {
	pub fn new(label: impl Into<Text<C>>, kind: ButtonKind<C>) -> Self {
		Self { label: label.into(), kind }
	}

	pub fn callback(label: impl Into<Text<C>>, callback: CallbackButton<C>) -> Self {
		Self::new(label, ButtonKind::Callback(callback))
	}

	pub fn as_callback(&self) -> Option<&CallbackButton<C>> {
		match &self.kind {
			ButtonKind::Callback(callback) => Some(callback),
			_ => None,
		}
	}

	/// Short description for tracing.
	pub fn describe(&self) -> String {
		let label = self.label.as_static().unwrap_or("<dynamic>");
		match &self.kind {
			ButtonKind::Url(url) => format!("url:{label}->{url}"),
			ButtonKind::Login(login) => format!("login:{label}->{}", login.url),
			ButtonKind::Callback(callback) => format!("callback:{label}x{}", callback.handlers.len()),
			ButtonKind::SwitchInline(query) => format!("switch_inline:{label}({query})"),
			ButtonKind::SwitchInlineCurrent(query) => format!("switch_inline_current:{label}({query})"),
			ButtonKind::WebApp(url) => format!("web_app:{label}->{url}"),
			ButtonKind::Game => format!("game:{label}"),
			ButtonKind::Pay => format!("pay:{label}"),
		}
	}
}
