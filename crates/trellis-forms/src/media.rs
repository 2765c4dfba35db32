//! CSS and JavaScript assets required by fields and widgets.

use crate::widgets::escape_attribute;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaItem {
	Css(String),
	Js(String),
}

/// An ordered, de-duplicated set of media items.
///
/// # Examples
///
/// ```
/// use trellis_forms::Media;
///
/// let mut media = Media::new().with_css("/static/forms.css");
/// media.merge(&Media::new().with_css("/static/forms.css").with_js("/static/list.js"));
///
/// assert_eq!(media.render_css(), "<link rel=\"stylesheet\" href=\"/static/forms.css\" />\n");
/// assert_eq!(media.render_js(), "<script src=\"/static/list.js\"></script>\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
	items: Vec<MediaItem>,
}

impl Media {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_css(mut self, path: impl Into<String>) -> Self {
		self.add(MediaItem::Css(path.into()));
		self
	}

	pub fn with_js(mut self, path: impl Into<String>) -> Self {
		self.add(MediaItem::Js(path.into()));
		self
	}

	pub fn add(&mut self, item: MediaItem) {
		if !self.items.contains(&item) {
			self.items.push(item);
		}
	}

	/// Append the items of `other` not already present.
	pub fn merge(&mut self, other: &Media) {
		for item in &other.items {
			self.add(item.clone());
		}
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn items(&self) -> &[MediaItem] {
		&self.items
	}

	/// `<link>` tags for the stylesheets, with escaped paths.
	pub fn render_css(&self) -> String {
		let mut html = String::new();
		for item in &self.items {
			if let MediaItem::Css(path) = item {
				html.push_str(&format!(
					"<link rel=\"stylesheet\" href=\"{}\" />\n",
					escape_attribute(path)
				));
			}
		}
		html
	}

	/// `<script>` tags for the scripts, with escaped paths.
	pub fn render_js(&self) -> String {
		let mut html = String::new();
		for item in &self.items {
			if let MediaItem::Js(path) = item {
				html.push_str(&format!(
					"<script src=\"{}\"></script>\n",
					escape_attribute(path)
				));
			}
		}
		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_render_escapes_paths() {
		let media = Media::new().with_js("/a.js\"><script>alert(1)</script>");

		let html = media.render_js();

		assert!(!html.contains("<script>alert"));
		assert!(html.contains("&quot;&gt;&lt;script&gt;"));
	}

	#[rstest]
	fn test_merge_keeps_first_position() {
		let mut media = Media::new().with_css("a.css").with_js("a.js");

		media.merge(&Media::new().with_js("b.js").with_css("a.css"));

		assert_eq!(
			media.items(),
			&[
				MediaItem::Css("a.css".to_string()),
				MediaItem::Js("a.js".to_string()),
				MediaItem::Js("b.js".to_string()),
			]
		);
	}
}
