use crate::field::{Field, FieldKind};
use crate::form::Form;
use crate::multidict::RawValue;
use crate::perms::Permissions;
use crate::widgets::{NULL_LABEL, SelectOption, WidgetContext};

/// A field located inside a form instance: its input name, effective
/// permissions, raw value and error.
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
	form: &'a Form,
	field: &'a Field,
	name: String,
	input_name: String,
	permissions: Permissions,
}

impl<'a> BoundField<'a> {
	pub(crate) fn new(
		form: &'a Form,
		field: &'a Field,
		input_name: String,
		permissions: Permissions,
	) -> Self {
		let name = input_name
			.rsplit_once('.')
			.map_or(input_name.as_str(), |(_, last)| last)
			.to_string();
		Self {
			form,
			field,
			name,
			input_name,
			permissions,
		}
	}

	pub fn field(&self) -> &'a Field {
		self.field
	}

	/// Name within the parent; the index for list items.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Dotted name used as the HTML `name` attribute and the raw data key.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::{Field, Form, FormSchema};
	/// use trellis_forms::convs::Char;
	///
	/// let schema = FormSchema::builder("signup")
	///     .field(Field::set("address", vec![Field::new("city", Char::new()).into()]))
	///     .build()
	///     .unwrap();
	/// let form = Form::new(schema);
	///
	/// let city = form.bound_field("address.city").unwrap();
	/// assert_eq!(city.input_name(), "address.city");
	/// assert_eq!(city.id(), "signup-address.city");
	/// ```
	pub fn input_name(&self) -> &str {
		&self.input_name
	}

	/// Element id: `<form id>-<input name>`.
	pub fn id(&self) -> String {
		format!("{}-{}", self.form.id(), self.input_name)
	}

	pub fn label(&self) -> Option<&'a str> {
		self.field.label.as_deref()
	}

	pub fn permissions(&self) -> Permissions {
		self.permissions
	}

	pub fn readable(&self) -> bool {
		self.permissions.readable()
	}

	pub fn writable(&self) -> bool {
		self.permissions.writable()
	}

	pub fn error(&self) -> Option<&'a str> {
		self.form.errors().get(&self.input_name)
	}

	/// Raw text values submitted (or filled) for this field.
	pub fn raw_values(&self) -> Vec<&'a str> {
		let values: Vec<&'a str> = self
			.form
			.raw()
			.get_all(&self.input_name)
			.into_iter()
			.filter_map(RawValue::as_text)
			.collect();
		if self.field.is_multiple() {
			values
		} else {
			values.last().copied().into_iter().collect()
		}
	}

	/// Single raw value, empty when absent.
	pub fn raw_value(&self) -> &'a str {
		self.raw_values().last().copied().unwrap_or("")
	}

	/// Widget input for this field.
	pub fn context(&self) -> WidgetContext {
		let values: Vec<String> = self.raw_values().into_iter().map(str::to_string).collect();
		let options = if self.field.widget.has_options() {
			self.options(&values)
		} else {
			Vec::new()
		};
		WidgetContext {
			id: self.id(),
			input_name: self.input_name.clone(),
			label: self.field.label.clone(),
			values,
			error: self.error().map(str::to_string),
			readonly: !self.writable(),
			required: self.field.is_required(),
			multiple: self.field.is_multiple(),
			options,
		}
	}

	fn options(&self, values: &[String]) -> Vec<SelectOption> {
		let Some(choices) = self.field.converter().and_then(|conv| conv.choices()) else {
			return Vec::new();
		};
		let mut options = Vec::with_capacity(choices.len() + 1);
		let value = values.last().map(String::as_str).unwrap_or("");
		if !self.field.is_multiple() && (value.is_empty() || !self.field.is_required()) {
			let null_label = self
				.field
				.widget
				.null_label()
				.or(self.form.null_label())
				.unwrap_or(NULL_LABEL);
			options.push(SelectOption {
				value: String::new(),
				title: null_label.to_string(),
				selected: value.is_empty(),
			});
		}
		for (choice, title) in choices {
			let selected = values.contains(&choice);
			options.push(SelectOption {
				value: choice,
				title,
				selected,
			});
		}
		options
	}

	/// Bound children of a field set, or the items of a field list.
	pub fn children(&self) -> Vec<BoundField<'a>> {
		match &self.field.kind {
			FieldKind::Set(_) => self
				.field
				.fields()
				.into_iter()
				.map(|child| self.child(child, &child.name))
				.collect(),
			FieldKind::List(template) => self
				.form
				.list_indices(&self.input_name)
				.into_iter()
				.map(|index| self.child(template, &index))
				.collect(),
			FieldKind::Leaf(_) => Vec::new(),
		}
	}

	pub(crate) fn child(&self, field: &'a Field, name: &str) -> BoundField<'a> {
		BoundField::new(
			self.form,
			field,
			format!("{}.{}", self.input_name, name),
			self.permissions.intersect(field.permissions),
		)
	}

	/// HTML of this field, empty when it is not readable.
	pub fn render(&self) -> String {
		self.form.render_bound(self)
	}
}
