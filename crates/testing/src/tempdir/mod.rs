// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

/// A scratch directory removed when dropped.
pub struct TempDir {
	path: PathBuf,
}

impl TempDir {
	pub fn new() -> std::io::Result<Self> {
		let path = env::temp_dir().join(format!("murmur-{}", Uuid::new_v4().simple()));
		fs::create_dir(&path)?;
		Ok(Self {
			path,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Path of `name` inside the directory. The file is not created.
	pub fn file(&self, name: &str) -> PathBuf {
		self.path.join(name)
	}
}

impl Drop for TempDir {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.path);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_removed_on_drop() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().to_path_buf();
		fs::write(dir.file("a.txt"), b"x").unwrap();
		assert!(path.is_dir());

		drop(dir);
		assert!(!path.exists());
	}
}
