//! HTML rendering of bound forms.
//!
//! Each field is rendered with its raw value and error, so a rejected form
//! shows exactly what the user typed. Unreadable fields render as nothing.

use crate::bound_field::BoundField;
use crate::error::{ALL_FIELDS_KEY, FormResult};
use crate::field::{FieldKind, Node};
use crate::form::{Form, INDICES_SUFFIX};
use crate::media::Media;
use crate::widgets::{RenderType, escape_attribute, escape_html};

impl Form {
	/// Render every node of the form.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::{Field, Form, FormSchema};
	/// use trellis_forms::convs::Char;
	///
	/// let schema = FormSchema::builder("login")
	///     .field(Field::new("user", Char::new()).with_label("User"))
	///     .build()
	///     .unwrap();
	///
	/// let html = Form::new(schema).render();
	///
	/// assert!(html.contains(r#"<label for="login-user">User</label>"#));
	/// assert!(html.contains(r#"name="user""#));
	/// ```
	pub fn render(&self) -> String {
		let mut html = String::new();
		if let Some(error) = self.errors().non_field() {
			html.push_str(&format!(
				"<p class=\"error\" id=\"{}-{}\">{}</p>",
				escape_attribute(self.id()),
				ALL_FIELDS_KEY,
				escape_html(error)
			));
		}
		self.render_nodes(&mut html, self.schema().nodes(), None);
		html
	}

	/// Render a single field by dotted path.
	///
	/// # Errors
	///
	/// [`FormError::UnknownField`](crate::FormError::UnknownField) when
	/// nothing has that path.
	pub fn render_field(&self, path: &str) -> FormResult<String> {
		Ok(self.bound_field(path)?.render())
	}

	/// Media needed by the form's fields and widgets.
	pub fn media(&self) -> Media {
		self.schema().media()
	}

	fn render_nodes<'a>(
		&'a self,
		html: &mut String,
		nodes: &'a [Node],
		parent: Option<&BoundField<'a>>,
	) {
		for node in nodes {
			match node {
				Node::Field(field) => {
					let bound = match parent {
						Some(parent) => parent.child(field, &field.name),
						None => BoundField::new(
							self,
							field,
							field.name.clone(),
							self.permissions().intersect(field.permissions),
						),
					};
					html.push_str(&bound.render());
				}
				Node::Block(block) => {
					html.push_str(&format!(
						"<div class=\"{}\"><h2>{}</h2>",
						escape_attribute(block.classname.as_deref().unwrap_or("field-block")),
						escape_html(&block.title)
					));
					self.render_nodes(html, &block.nodes, parent);
					html.push_str("</div>");
				}
				Node::Static(widget) => html.push_str(&widget.render()),
			}
		}
	}

	pub(crate) fn render_bound<'a>(&'a self, bound: &BoundField<'a>) -> String {
		if !bound.readable() {
			return String::new();
		}
		match &bound.field().kind {
			FieldKind::Leaf(_) => render_row(bound),
			FieldKind::Set(nodes) => {
				let mut html = format!(
					"<fieldset class=\"fieldset\" id=\"{}\">",
					escape_attribute(&bound.id())
				);
				if let Some(label) = bound.label() {
					html.push_str(&format!("<legend>{}</legend>", escape_html(label)));
				}
				push_error(&mut html, bound);
				self.render_nodes(&mut html, nodes, Some(bound));
				push_help(&mut html, bound);
				html.push_str("</fieldset>");
				html
			}
			FieldKind::List(_) => {
				let mut html = format!(
					"<div class=\"fieldlist\" id=\"{}\">",
					escape_attribute(&bound.id())
				);
				if let Some(label) = bound.label() {
					html.push_str(&format!("<h3>{}</h3>", escape_html(label)));
				}
				push_error(&mut html, bound);
				let indices_name =
					escape_attribute(&format!("{}{}", bound.input_name(), INDICES_SUFFIX));
				for item in bound.children() {
					html.push_str(&format!(
						"<div class=\"fieldlist-item\"><input type=\"hidden\" name=\"{}\" value=\"{}\" />{}</div>",
						indices_name,
						escape_attribute(item.name()),
						item.render()
					));
				}
				push_help(&mut html, bound);
				html.push_str("</div>");
				html
			}
		}
	}
}

fn render_row(bound: &BoundField<'_>) -> String {
	let widget = &bound.field().widget;
	let input = widget.render(&bound.context());
	let render_type = widget.render_type();
	if render_type == RenderType::Hidden {
		return input;
	}

	let label = bound
		.label()
		.map(|label| {
			format!(
				"<label for=\"{}\">{}</label>",
				escape_attribute(&bound.id()),
				escape_html(label)
			)
		})
		.unwrap_or_default();

	let mut class = String::from("form-row");
	if render_type == RenderType::FullWidth {
		class.push_str(" full-width");
	}
	if bound.field().is_required() {
		class.push_str(" required");
	}
	if bound.error().is_some() {
		class.push_str(" error");
	}

	let mut html = format!("<div class=\"{}\">", class);
	if render_type == RenderType::Checkbox {
		html.push_str(&input);
		html.push_str(&label);
	} else {
		html.push_str(&label);
		html.push_str(&input);
	}
	push_help(&mut html, bound);
	push_error(&mut html, bound);
	html.push_str("</div>");
	html
}

fn push_help(html: &mut String, bound: &BoundField<'_>) {
	if let Some(help) = &bound.field().help_text {
		html.push_str(&format!("<p class=\"help\">{}</p>", escape_html(help)));
	}
}

fn push_error(html: &mut String, bound: &BoundField<'_>) {
	if let Some(error) = bound.error() {
		html.push_str(&format!("<p class=\"error\">{}</p>", escape_html(error)));
	}
}
