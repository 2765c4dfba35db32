//! Field access permissions.
//!
//! A field is readable (`r`, rendered) and/or writable (`w`, accepted from
//! submissions). Effective permissions are the intersection of a field's own
//! permissions and those of its parent, down from the form instance.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions {
	read: bool,
	write: bool,
}

impl Permissions {
	pub const READ_WRITE: Self = Self {
		read: true,
		write: true,
	};
	pub const READ_ONLY: Self = Self {
		read: true,
		write: false,
	};
	pub const NONE: Self = Self {
		read: false,
		write: false,
	};

	pub fn readable(self) -> bool {
		self.read
	}

	pub fn writable(self) -> bool {
		self.write
	}

	/// Permissions granted by both `self` and `other`.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::Permissions;
	///
	/// let field: Permissions = "rw".parse().unwrap();
	/// assert_eq!(field.intersect(Permissions::READ_ONLY), Permissions::READ_ONLY);
	/// ```
	pub fn intersect(self, other: Self) -> Self {
		Self {
			read: self.read && other.read,
			write: self.write && other.write,
		}
	}
}

impl Default for Permissions {
	fn default() -> Self {
		Self::READ_WRITE
	}
}

impl FromStr for Permissions {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut perms = Self::NONE;
		for c in s.chars() {
			match c {
				'r' => perms.read = true,
				'w' => perms.write = true,
				other => return Err(format!("unknown permission '{}'", other)),
			}
		}
		Ok(perms)
	}
}

impl fmt::Display for Permissions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.read {
			write!(f, "r")?;
		}
		if self.write {
			write!(f, "w")?;
		}
		Ok(())
	}
}
