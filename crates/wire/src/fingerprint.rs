use std::fmt;

/// Number of hash characters following the tag marker.
pub const DIGEST_LEN: usize = 4;

/// Worst-case encoded size of a tag: the marker plus four characters of up to two bytes each.
pub const TAG_MAX_BYTES: usize = 1 + DIGEST_LEN * 2;

const SEED: u32 = 17;
const FACTOR: u32 = 37;

/// Rolling multiplicative hash over 32-bit values.
///
/// `h = 37 * h + n` with wrapping arithmetic, seeded with 17. The result is
/// returned as big-endian bytes.
pub fn hash(values: impl IntoIterator<Item = u32>) -> [u8; DIGEST_LEN] {
	values
		.into_iter()
		.fold(SEED, |h, n| h.wrapping_mul(FACTOR).wrapping_add(n))
		.to_be_bytes()
}

/// Which recomputation a verifier has to perform for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
	/// Hash of the grid shape and the button label.
	Structural,
	/// Hash of an integrator supplied fingerprint string.
	Custom,
}

impl TagKind {
	/// Marker character written in front of the digest.
	pub const fn marker(self) -> char {
		match self {
			Self::Structural => 'h',
			Self::Custom => 'f',
		}
	}

	/// Resolves a marker character, `None` for unknown markers.
	pub const fn from_marker(marker: char) -> Option<Self> {
		match marker {
			'h' => Some(Self::Structural),
			'f' => Some(Self::Custom),
			_ => None,
		}
	}
}

/// Integrity tag carried at the end of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
	kind: TagKind,
	digest: [u8; DIGEST_LEN],
}

impl Tag {
	/// Structural tag over the grid shape and one button label.
	///
	/// `shape` holds the column count of every row; the hashed sequence is the
	/// row count, each column count, then the label's code points.
	pub fn structural(shape: &[usize], label: &str) -> Self {
		let dims = std::iter::once(shape.len()).chain(shape.iter().copied()).map(|n| n as u32);
		let text = label.chars().map(u32::from);
		Self {
			kind: TagKind::Structural,
			digest: hash(dims.chain(text)),
		}
	}

	/// Custom tag over an integrator supplied fingerprint.
	pub fn custom(fingerprint: &str) -> Self {
		Self {
			kind: TagKind::Custom,
			digest: hash(fingerprint.chars().map(u32::from)),
		}
	}

	/// Parses the textual tag form. Returns `None` for unknown markers or a
	/// digest that is not exactly four byte-valued characters.
	pub fn parse(text: &str) -> Option<Self> {
		let mut chars = text.chars();
		let kind = TagKind::from_marker(chars.next()?)?;
		let mut digest = [0u8; DIGEST_LEN];
		for slot in &mut digest {
			*slot = u8::try_from(u32::from(chars.next()?)).ok()?;
		}
		if chars.next().is_some() {
			return None;
		}
		Some(Self { kind, digest })
	}

	pub const fn kind(&self) -> TagKind {
		self.kind
	}

	pub const fn digest(&self) -> [u8; DIGEST_LEN] {
		self.digest
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.kind.marker())?;
		for byte in self.digest {
			write!(f, "{}", char::from(byte))?;
		}
		Ok(())
	}
}
