//! Widgets: the rendering half of a field.
//!
//! Leaf widgets turn a [`WidgetContext`] (raw value, error state, options)
//! into HTML. `FieldSet` and `FieldList` only mark aggregate fields; their
//! children are rendered by the form walker.

use crate::media::Media;
use std::fmt;
use std::sync::Arc;

/// Label of the empty option prepended to non-required selects.
pub const NULL_LABEL: &str = "--------";

/// How a field row is laid out around its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderType {
	/// Label above the widget.
	Default,
	/// Label next to the widget.
	Checkbox,
	/// No label, no row.
	Hidden,
	/// Spans the whole row in table-like layouts.
	FullWidth,
}

impl RenderType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Default => "default",
			Self::Checkbox => "checkbox",
			Self::Hidden => "hidden",
			Self::FullWidth => "full-width",
		}
	}
}

/// An entry of a select or checkbox list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	pub value: String,
	pub title: String,
	pub selected: bool,
}

/// Everything a widget needs to render one field.
#[derive(Debug, Clone, Default)]
pub struct WidgetContext {
	pub id: String,
	pub input_name: String,
	pub label: Option<String>,
	/// Raw values of the field; single-valued fields have at most one.
	pub values: Vec<String>,
	pub error: Option<String>,
	pub readonly: bool,
	pub required: bool,
	pub multiple: bool,
	pub options: Vec<SelectOption>,
}

impl WidgetContext {
	/// The single raw value, empty when absent.
	pub fn value(&self) -> &str {
		self.values.last().map(String::as_str).unwrap_or("")
	}
}

/// Application-defined widget.
pub trait CustomWidget: Send + Sync + fmt::Debug {
	fn render(&self, ctx: &WidgetContext) -> String;

	fn render_type(&self) -> RenderType {
		RenderType::Default
	}

	fn classname(&self) -> &str {
		""
	}

	fn media(&self) -> Media {
		Media::new()
	}
}

#[derive(Debug, Clone)]
pub enum Widget {
	TextInput,
	Textarea,
	HiddenInput,
	PasswordInput,
	Select {
		size: Option<u32>,
		/// Overrides the form's null label.
		null_label: Option<String>,
	},
	CheckBoxSelect,
	CheckBox,
	/// Read-only display of the value. `escape: false` emits it verbatim.
	CharDisplay {
		escape: bool,
	},
	FileInput,
	FieldSet,
	FieldList,
	Custom(Arc<dyn CustomWidget>),
}

impl Widget {
	pub fn select() -> Self {
		Self::Select {
			size: None,
			null_label: None,
		}
	}

	pub fn char_display() -> Self {
		Self::CharDisplay { escape: true }
	}

	pub fn custom(widget: impl CustomWidget + 'static) -> Self {
		Self::Custom(Arc::new(widget))
	}

	pub fn render_type(&self) -> RenderType {
		match self {
			Self::HiddenInput => RenderType::Hidden,
			Self::CheckBox => RenderType::Checkbox,
			Self::Custom(widget) => widget.render_type(),
			_ => RenderType::Default,
		}
	}

	/// Value of the element's `class` attribute.
	pub fn classname(&self) -> &str {
		match self {
			Self::TextInput | Self::PasswordInput => "textinput",
			Self::CheckBoxSelect => "select-checkbox",
			Self::CharDisplay { .. } => "chardisplay",
			Self::FieldSet => "fieldset",
			Self::FieldList => "fieldlist",
			Self::Custom(widget) => widget.classname(),
			_ => "",
		}
	}

	pub fn media(&self) -> Media {
		match self {
			Self::Custom(widget) => widget.media(),
			_ => Media::new(),
		}
	}

	/// Whether the widget renders a choice list.
	pub fn has_options(&self) -> bool {
		matches!(self, Self::Select { .. } | Self::CheckBoxSelect)
	}

	pub(crate) fn null_label(&self) -> Option<&str> {
		match self {
			Self::Select { null_label, .. } => null_label.as_deref(),
			_ => None,
		}
	}

	/// Render a leaf widget. Aggregate widgets render nothing here.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::{Widget, WidgetContext};
	///
	/// let ctx = WidgetContext {
	///     id: "login-name".to_string(),
	///     input_name: "name".to_string(),
	///     values: vec!["<b>".to_string()],
	///     ..Default::default()
	/// };
	///
	/// assert_eq!(
	///     Widget::TextInput.render(&ctx),
	///     r#"<input type="text" id="login-name" name="name" value="&lt;b&gt;" class="textinput" />"#
	/// );
	/// ```
	pub fn render(&self, ctx: &WidgetContext) -> String {
		let readonly = if ctx.readonly { " readonly=\"readonly\"" } else { "" };
		let class = class_attr(self.classname());
		let id = escape_attribute(&ctx.id);
		let name = escape_attribute(&ctx.input_name);

		match self {
			Self::TextInput => format!(
				"<input type=\"text\" id=\"{}\" name=\"{}\" value=\"{}\"{}{} />",
				id,
				name,
				escape_attribute(ctx.value()),
				class,
				readonly
			),
			Self::PasswordInput => format!(
				"<input type=\"password\" id=\"{}\" name=\"{}\"{}{} />",
				id, name, class, readonly
			),
			Self::HiddenInput => format!(
				"<input type=\"hidden\" id=\"{}\" name=\"{}\" value=\"{}\" />",
				id,
				name,
				escape_attribute(ctx.value())
			),
			Self::Textarea => format!(
				"<textarea id=\"{}\" name=\"{}\"{}{}>{}</textarea>",
				id,
				name,
				class,
				readonly,
				escape_html(ctx.value())
			),
			Self::Select { size, .. } => {
				let mut html = format!("<select id=\"{}\" name=\"{}\"", id, name);
				if ctx.multiple {
					html.push_str(" multiple=\"multiple\"");
				}
				if let Some(size) = size {
					html.push_str(&format!(" size=\"{}\"", size));
				}
				if ctx.readonly {
					html.push_str(" disabled=\"disabled\"");
				}
				html.push_str(&class);
				html.push('>');
				for option in &ctx.options {
					html.push_str(&format!(
						"<option value=\"{}\"{}>{}</option>",
						escape_attribute(&option.value),
						if option.selected { " selected=\"selected\"" } else { "" },
						escape_html(&option.title)
					));
				}
				html.push_str("</select>");
				html
			}
			Self::CheckBoxSelect => {
				let mut html = format!("<div id=\"{}\"{}>", id, class);
				for (index, option) in ctx.options.iter().enumerate() {
					let option_id = format!("{}-{}", id, index + 1);
					html.push_str(&format!(
						"<label for=\"{}\"><input type=\"checkbox\" id=\"{}\" name=\"{}\" value=\"{}\"{}{} /> {}</label>",
						option_id,
						option_id,
						name,
						escape_attribute(&option.value),
						if option.selected { " checked=\"checked\"" } else { "" },
						if ctx.readonly { " disabled=\"disabled\"" } else { "" },
						escape_html(&option.title)
					));
				}
				html.push_str("</div>");
				html
			}
			Self::CheckBox => format!(
				"<input type=\"checkbox\" id=\"{}\" name=\"{}\" value=\"{}\"{}{} />",
				id,
				name,
				crate::convs::CHECKED,
				if ctx.value().is_empty() { "" } else { " checked=\"checked\"" },
				if ctx.readonly { " disabled=\"disabled\"" } else { "" }
			),
			Self::CharDisplay { escape } => {
				let value = ctx.values.join(", ");
				format!(
					"<span id=\"{}\"{}>{}</span>",
					id,
					class,
					if *escape { escape_html(&value) } else { value }
				)
			}
			Self::FileInput => format!(
				"<input type=\"file\" id=\"{}\" name=\"{}\"{} />",
				id,
				name,
				if ctx.readonly { " disabled=\"disabled\"" } else { "" }
			),
			Self::FieldSet | Self::FieldList => String::new(),
			Self::Custom(widget) => widget.render(ctx),
		}
	}
}

fn class_attr(classname: &str) -> String {
	if classname.is_empty() {
		String::new()
	} else {
		format!(" class=\"{}\"", escape_attribute(classname))
	}
}

/// Escape text for use inside an element.
pub fn escape_html(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			other => escaped.push(other),
		}
	}
	escaped
}

/// Escape text for use inside a double-quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
	escape_html(value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn ctx(values: &[&str]) -> WidgetContext {
		WidgetContext {
			id: "f-x".to_string(),
			input_name: "x".to_string(),
			values: values.iter().map(|v| v.to_string()).collect(),
			..Default::default()
		}
	}

	#[rstest]
	#[case(Widget::HiddenInput, RenderType::Hidden)]
	#[case(Widget::CheckBox, RenderType::Checkbox)]
	#[case(Widget::TextInput, RenderType::Default)]
	#[case(Widget::FieldList, RenderType::Default)]
	fn test_render_type(#[case] widget: Widget, #[case] expected: RenderType) {
		assert_eq!(widget.render_type(), expected);
	}

	#[rstest]
	fn test_escape_html() {
		assert_eq!(
			escape_html(r#"<a href="x">'&'</a>"#),
			"&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
		);
	}

	#[rstest]
	fn test_select_marks_selected_option() {
		let mut context = ctx(&["b"]);
		context.options = vec![
			SelectOption {
				value: "a".to_string(),
				title: "A".to_string(),
				selected: false,
			},
			SelectOption {
				value: "b".to_string(),
				title: "B & co".to_string(),
				selected: true,
			},
		];

		let html = Widget::select().render(&context);

		assert_eq!(
			html,
			"<select id=\"f-x\" name=\"x\"><option value=\"a\">A</option><option value=\"b\" selected=\"selected\">B &amp; co</option></select>"
		);
	}

	#[rstest]
	fn test_checkbox_checked_state() {
		assert!(Widget::CheckBox.render(&ctx(&["checked"])).contains("checked=\"checked\""));
		assert!(!Widget::CheckBox.render(&ctx(&[])).contains("checked=\"checked\""));
	}

	#[rstest]
	fn test_readonly_text_input() {
		let mut context = ctx(&["v"]);
		context.readonly = true;

		let html = Widget::TextInput.render(&context);

		assert!(html.ends_with(" readonly=\"readonly\" />"));
	}

	#[rstest]
	fn test_char_display_escape_flag() {
		let context = ctx(&["<i>x</i>"]);

		assert!(Widget::char_display().render(&context).contains("&lt;i&gt;"));
		assert!(
			Widget::CharDisplay { escape: false }
				.render(&context)
				.contains("<i>x</i>")
		);
	}

	#[rstest]
	fn test_custom_widget() {
		#[derive(Debug)]
		struct Stars;

		impl CustomWidget for Stars {
			fn render(&self, ctx: &WidgetContext) -> String {
				format!("<stars name=\"{}\" />", ctx.input_name)
			}

			fn render_type(&self) -> RenderType {
				RenderType::FullWidth
			}
		}

		let widget = Widget::custom(Stars);

		assert_eq!(widget.render(&ctx(&[])), "<stars name=\"x\" />");
		assert_eq!(widget.render_type().as_str(), "full-width");
	}
}
