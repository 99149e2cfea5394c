use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;

/// Request-scoped, type-erased storage owned by the host context.
///
/// The dispatcher installs the menu control panel here for the duration of
/// one handler chain and removes it afterwards.
#[derive(Default)]
pub struct Attachments {
	inner: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Attachments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.inner.get(&TypeId::of::<T>())?.downcast_ref()
	}

	pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
		self.inner.get_mut(&TypeId::of::<T>())?.downcast_mut()
	}

	pub fn contains<T: Any + Send + Sync>(&self) -> bool {
		self.inner.contains_key(&TypeId::of::<T>())
	}

	/// Stores `val`, returning the value of the same type it replaced.
	pub fn insert<T: Any + Send + Sync>(&mut self, val: T) -> Option<T> {
		let previous = self.inner.insert(TypeId::of::<T>(), Box::new(val))?;
		previous.downcast().ok().map(|boxed| *boxed)
	}

	pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
		let boxed = self.inner.remove(&TypeId::of::<T>())?;
		boxed.downcast().ok().map(|boxed| *boxed)
	}
}

impl std::fmt::Debug for Attachments {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Attachments").field("len", &self.inner.len()).finish()
	}
}
