use thiserror::Error;
use trellis_wire::WireError;

/// Errors surfaced by menu construction, rendering and navigation.
#[derive(Debug, Error)]
pub enum MenuError {
	/// Token framing or byte budget violation.
	#[error(transparent)]
	Wire(#[from] WireError),

	/// Two menus in one tree share an identifier.
	#[error("menu id {id:?} is already registered")]
	DuplicateId { id: String },

	/// Custom fingerprints only make sense while outdated checks run.
	#[error("menu {id:?} sets a custom fingerprint while outdated checks are disabled")]
	FingerprintWithoutOutdatedCheck { id: String },

	#[error("unknown menu {id:?}, known menus: {}", .known.join(", "))]
	UnknownMenu { id: String, known: Vec<String> },

	#[error("menu {id:?} has no parent to go back to, known menus: {}", .known.join(", "))]
	NoParent { id: String, known: Vec<String> },

	/// The control panel was requested outside of a menu handler.
	#[error("no menu control is installed for this update")]
	NoActiveMenu,

	/// An integrator supplied handler or dynamic generator failed.
	#[error("menu handler failed: {0:#}")]
	Handler(anyhow::Error),

	/// The host transport rejected a call.
	#[error("transport call failed: {0:#}")]
	Transport(anyhow::Error),
}

/// Result type for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;
