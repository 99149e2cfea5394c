use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Attachments, MenuContext, PreparedCall, Transport};

/// Something the recording transport was asked to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
	Call(PreparedCall),
	Answer(Option<String>),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
	log: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingTransport {
	pub fn sent(&self) -> Vec<Sent> {
		self.log.lock().clone()
	}
}

#[async_trait]
impl Transport for RecordingTransport {
	async fn execute(&self, call: PreparedCall) -> anyhow::Result<()> {
		self.log.lock().push(Sent::Call(call));
		Ok(())
	}

	async fn answer_callback_query(&self, text: Option<String>) -> anyhow::Result<()> {
		self.log.lock().push(Sent::Answer(text));
		Ok(())
	}
}

/// Minimal host context: callback data, a language and a recording transport.
#[derive(Debug, Default)]
pub struct TestCtx {
	pub data: Option<String>,
	pub lang: String,
	pub count: usize,
	pub attachments: Attachments,
	pub transport: RecordingTransport,
}

impl TestCtx {
	pub fn new() -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		Self {
			lang: "en".into(),
			..Self::default()
		}
	}
}

impl MenuContext for TestCtx {
	fn callback_data(&self) -> Option<&str> {
		self.data.as_deref()
	}

	fn attachments(&self) -> &Attachments {
		&self.attachments
	}

	fn attachments_mut(&mut self) -> &mut Attachments {
		&mut self.attachments
	}

	fn transport(&self) -> &dyn Transport {
		&self.transport
	}
}
