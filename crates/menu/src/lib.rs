//! Stateless navigable button menus.
//!
//! A [`Menu`] declares a grid of buttons with a chaining builder. Rendering
//! turns the declaration into a concrete [`InlineKeyboard`] whose callback
//! buttons carry self-describing tokens (see [`trellis_wire`]). When a click
//! arrives, [`MenuTree::handle`] re-renders the menu, checks that the token
//! still matches the button at its position and runs that button's handler
//! chain. Nothing about a sent grid is stored anywhere.
//!
//! ```ignore
//! let mut root = Menu::<Ctx>::new("root")?;
//! root.text("Settings", Handler::noop())?.row().submenu("More", "more", None)?;
//! let mut more = Menu::new("more")?;
//! more.back("Back", None)?;
//! root.register(more)?;
//! let tree = root.freeze()?;
//!
//! tree.execute(&ctx, OutgoingCall::new(ApiMethod::SendMessage).param("text", "Hi").menu("root")).await?;
//! match tree.handle(&mut ctx).await? { /* ... */ }
//! ```

mod attachments;
mod button;
mod config;
mod context;
mod error;
mod future;
mod handler;
mod markup;
mod menu;
mod nav;
mod range;
/// Two-pass grid rendering.
pub mod render;
mod tree;

#[cfg(test)]
mod test_fixtures;

pub use attachments::Attachments;
pub use button::{Button, ButtonKind, CallbackButton, Text};
pub use config::{ConfigError, ConfigResult, MenuConfig, OutdatedSetting};
pub use context::{ApiMethod, MenuContext, OutgoingCall, PreparedCall, ReplyMarkup, Transport};
pub use error::{MenuError, Result};
pub use future::BoxFutureSend;
pub use handler::{Flow, Handler};
pub use markup::{CallbackGame, InlineAction, InlineButton, InlineKeyboard, LoginUrl, WebAppInfo};
pub use menu::{DEFAULT_OUTDATED_NOTICE, Menu, MenuOptions, OutdatedPolicy};
pub use nav::{MenuControl, NavTarget};
pub use range::{Operation, Range};
pub use tree::{Dispatch, MenuTree};
pub use trellis_wire;
