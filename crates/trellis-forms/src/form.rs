//! Per-submission form instances.
//!
//! A [`Form`] binds a shared [`FormSchema`] to one submission. Validation
//! walks the field tree depth-first and tries every writable field, so a
//! single pass reports every error. Errors are data: they stay on the form,
//! next to the raw data, for re-rendering.

use crate::bound_field::BoundField;
use crate::error::{ALL_FIELDS_KEY, FormErrors, FormError, FormResult};
use crate::field::{Field, FieldKind, Node, collect_fields, find_field, is_index};
use crate::multidict::{MultiDict, RawValue};
use crate::perms::Permissions;
use crate::schema::FormSchema;
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Suffix of the raw key listing the item indices of a field list.
pub const INDICES_SUFFIX: &str = "-indices";

pub struct Form {
	schema: Arc<FormSchema>,
	id: String,
	raw: MultiDict,
	clean: IndexMap<String, Value>,
	errors: FormErrors,
	permissions: Permissions,
	null_label: Option<String>,
}

impl Form {
	/// A fresh form with initial values filled into its raw data.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::{Field, Form, FormSchema, MultiDict, Value};
	/// use trellis_forms::convs::{Char, Int};
	///
	/// let schema = FormSchema::builder("item")
	///     .field(Field::new("title", Char::new().required()))
	///     .field(Field::new("count", Int::new().with_min(1)))
	///     .build()
	///     .unwrap();
	///
	/// let mut form = Form::new(schema.clone());
	/// let clean = form
	///     .validate(MultiDict::from_urlencoded("title=Pen&count=3").unwrap())
	///     .unwrap();
	/// assert_eq!(clean["count"], Value::Int(3));
	///
	/// let mut form = Form::new(schema);
	/// let errors = form
	///     .validate(MultiDict::from_urlencoded("title=&count=0").unwrap())
	///     .unwrap_err();
	/// assert_eq!(errors.len(), 2);
	/// ```
	pub fn new(schema: Arc<FormSchema>) -> Self {
		let clean = schema.initial();
		let mut form = Self {
			id: schema.id().to_string(),
			schema,
			raw: MultiDict::new(),
			clean,
			errors: FormErrors::new(),
			permissions: Permissions::READ_WRITE,
			null_label: None,
		};
		form.fill_raw();
		form
	}

	/// Prepend `prefix` to the form id used in element ids.
	pub fn with_id_prefix(mut self, prefix: &str) -> Self {
		self.id = format!("{}{}", prefix, self.schema.id());
		self
	}

	/// Permissions granted at the form level; every field gets at most these.
	pub fn with_permissions(mut self, permissions: Permissions) -> Self {
		self.permissions = permissions;
		self
	}

	/// Label of the empty select option for selects that do not set one.
	pub fn with_null_label(mut self, label: impl Into<String>) -> Self {
		self.null_label = Some(label.into());
		self
	}

	/// Seed clean data and fill raw data from it.
	///
	/// Fields not mentioned keep their initial values.
	///
	/// # Errors
	///
	/// [`FormError::UnknownField`] when a key names no top-level field.
	pub fn with_initial(mut self, values: IndexMap<String, Value>) -> FormResult<Self> {
		for (name, value) in values {
			if find_field(self.schema.nodes(), &name).is_none() {
				return Err(FormError::UnknownField(name));
			}
			self.clean.insert(name, value);
		}
		self.fill_raw();
		Ok(self)
	}

	fn fill_raw(&mut self) {
		let mut raw = MultiDict::new();
		for field in self.schema.fields() {
			let value = self
				.clean
				.get(&field.name)
				.cloned()
				.unwrap_or_else(|| field.get_initial());
			fill_field(&mut raw, field, &field.name, &value);
		}
		self.raw = raw;
	}

	pub fn schema(&self) -> &Arc<FormSchema> {
		&self.schema
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn raw(&self) -> &MultiDict {
		&self.raw
	}

	/// Converted data: the initial values until a validation succeeds.
	pub fn clean_data(&self) -> &IndexMap<String, Value> {
		&self.clean
	}

	pub fn errors(&self) -> &FormErrors {
		&self.errors
	}

	pub fn permissions(&self) -> Permissions {
		self.permissions
	}

	pub(crate) fn null_label(&self) -> Option<&str> {
		self.null_label.as_deref()
	}

	/// Validate a submission.
	///
	/// Every writable field is tried; read-only fields keep their current
	/// clean value and get their raw value refilled from it. Form-level
	/// validators run once all fields converted, reporting under
	/// [`ALL_FIELDS_KEY`]. On success the clean data is replaced.
	pub fn validate(&mut self, raw: MultiDict) -> Result<IndexMap<String, Value>, FormErrors> {
		self.raw = raw;
		self.errors.clear();

		let schema = Arc::clone(&self.schema);
		let mut acceptor = Acceptor {
			raw: &mut self.raw,
			errors: &mut self.errors,
		};
		let accepted = acceptor.accept_nodes("", schema.nodes(), self.permissions, &self.clean);

		if let Some(clean) = &accepted {
			for validator in schema.validators() {
				if let Err(err) = validator(clean) {
					self.errors.insert(ALL_FIELDS_KEY, err.message);
					break;
				}
			}
		}

		match accepted {
			Some(clean) if self.errors.is_empty() => {
				self.clean = clean.clone();
				Ok(clean)
			}
			_ => {
				tracing::debug!(form = %self.id, errors = self.errors.len(), "form rejected");
				Err(self.errors.clone())
			}
		}
	}

	/// [`Form::validate`] reporting only success.
	pub fn accept(&mut self, raw: MultiDict) -> bool {
		self.validate(raw).is_ok()
	}

	/// Find a field definition by dotted path.
	///
	/// # Errors
	///
	/// [`FormError::UnknownField`] when nothing has that path.
	pub fn field(&self, path: &str) -> FormResult<&Field> {
		self.schema.field(path)
	}

	/// A field bound to this form's data, with effective permissions.
	///
	/// # Errors
	///
	/// [`FormError::UnknownField`] when nothing has that path.
	pub fn bound_field(&self, path: &str) -> FormResult<BoundField<'_>> {
		let unknown = || FormError::UnknownField(path.to_string());
		let mut segments = path.split('.');
		let head = segments.next().ok_or_else(unknown)?;
		let field = find_field(self.schema.nodes(), head).ok_or_else(unknown)?;
		let mut bound = BoundField::new(
			self,
			field,
			head.to_string(),
			self.permissions.intersect(field.permissions),
		);
		for segment in segments {
			let child = match &bound.field().kind {
				FieldKind::Set(nodes) => find_field(nodes, segment),
				FieldKind::List(template) if is_index(segment) => Some(template.as_ref()),
				_ => None,
			}
			.ok_or_else(unknown)?;
			bound = bound.child(child, segment);
		}
		Ok(bound)
	}

	/// Bound top-level fields, blocks flattened away.
	pub fn bound_fields(&self) -> Vec<BoundField<'_>> {
		self.schema
			.fields()
			.into_iter()
			.map(|field| {
				BoundField::new(
					self,
					field,
					field.name.clone(),
					self.permissions.intersect(field.permissions),
				)
			})
			.collect()
	}

	/// Valid, distinct item indices submitted for the field list `input_name`.
	pub(crate) fn list_indices(&self, input_name: &str) -> Vec<String> {
		list_indices(&self.raw, input_name)
	}
}

impl fmt::Debug for Form {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Form")
			.field("id", &self.id)
			.field("raw", &self.raw)
			.field("clean", &self.clean)
			.field("errors", &self.errors)
			.field("permissions", &self.permissions)
			.finish_non_exhaustive()
	}
}

fn join(prefix: &str, name: &str) -> String {
	if prefix.is_empty() {
		name.to_string()
	} else {
		format!("{}.{}", prefix, name)
	}
}

fn list_indices(raw: &MultiDict, input_name: &str) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut indices = Vec::new();
	for value in raw.get_all(&format!("{}{}", input_name, INDICES_SUFFIX)) {
		let index = value.as_text().unwrap_or("").trim();
		if !is_index(index) {
			tracing::warn!(field = input_name, index = ?value, "skipping invalid list index");
			continue;
		}
		if seen.insert(index.to_string()) {
			indices.push(index.to_string());
		}
	}
	indices
}

/// Write the raw form of `value` for `field` under `input_name`.
fn fill_field(raw: &mut MultiDict, field: &Field, input_name: &str, value: &Value) {
	match &field.kind {
		FieldKind::Leaf(conv) => {
			raw.remove(input_name);
			for item in conv.from_value(value) {
				raw.add(input_name, item);
			}
		}
		FieldKind::Set(nodes) => {
			for child in collect_fields(nodes) {
				let child_value = value
					.as_map()
					.and_then(|map| map.get(&child.name))
					.cloned()
					.unwrap_or_else(|| child.get_initial());
				fill_field(raw, child, &join(input_name, &child.name), &child_value);
			}
		}
		FieldKind::List(template) => {
			let indices_name = format!("{}{}", input_name, INDICES_SUFFIX);
			raw.remove(&indices_name);
			for (position, item) in value.as_list().unwrap_or(&[]).iter().enumerate() {
				let index = (position + 1).to_string();
				fill_field(raw, template, &join(input_name, &index), item);
				raw.add(indices_name.clone(), index);
			}
		}
	}
}

/// Depth-first validation state. `None` results mean errors were recorded.
struct Acceptor<'a> {
	raw: &'a mut MultiDict,
	errors: &'a mut FormErrors,
}

impl Acceptor<'_> {
	fn accept_nodes(
		&mut self,
		prefix: &str,
		nodes: &[Node],
		permissions: Permissions,
		old: &IndexMap<String, Value>,
	) -> Option<IndexMap<String, Value>> {
		let mut result = IndexMap::new();
		let mut valid = true;
		for field in collect_fields(nodes) {
			let old_value = old
				.get(&field.name)
				.cloned()
				.unwrap_or_else(|| field.get_initial());
			match self.accept_field(field, &join(prefix, &field.name), permissions, &old_value) {
				Some(value) => {
					result.insert(field.name.clone(), value);
				}
				None => valid = false,
			}
		}
		valid.then_some(result)
	}

	fn accept_field(
		&mut self,
		field: &Field,
		input_name: &str,
		parent: Permissions,
		old: &Value,
	) -> Option<Value> {
		let permissions = parent.intersect(field.permissions);
		if !permissions.writable() {
			fill_field(self.raw, field, input_name, old);
			return Some(old.clone());
		}

		let value = match &field.kind {
			FieldKind::Leaf(conv) => self.accept_leaf(conv.as_ref(), input_name)?,
			FieldKind::Set(nodes) => {
				let empty = IndexMap::new();
				let old_map = old.as_map().unwrap_or(&empty);
				Value::Map(self.accept_nodes(input_name, nodes, permissions, old_map)?)
			}
			FieldKind::List(template) => self.accept_list(template, input_name, permissions, old)?,
		};

		for validator in field.validators() {
			if let Err(err) = validator(&value) {
				self.errors.insert(input_name, err.message);
				return None;
			}
		}
		Some(value)
	}

	fn accept_leaf(&mut self, conv: &dyn crate::convs::Converter, input_name: &str) -> Option<Value> {
		let mut values: Vec<RawValue> = self.raw.get_all(input_name).into_iter().cloned().collect();

		if conv.expects_file() {
			// Browsers send an empty text part for an untouched file input
			values.retain(|value| !value.is_blank());
			if values.iter().any(|value| value.as_file().is_none()) {
				self.errors.insert(input_name, "Given value is not file");
				return None;
			}
		} else if values.iter().any(|value| value.as_text().is_none()) {
			self.errors.insert(input_name, "Given value has incompatible type");
			return None;
		}

		let raw = if conv.is_multiple() {
			&values[..]
		} else {
			values.last().map(std::slice::from_ref).unwrap_or(&[])
		};
		match conv.accept(raw) {
			Ok(value) => Some(value),
			Err(err) => {
				self.errors.insert(input_name, err.message);
				None
			}
		}
	}

	fn accept_list(
		&mut self,
		template: &Field,
		input_name: &str,
		permissions: Permissions,
		old: &Value,
	) -> Option<Value> {
		let old_items = old.as_list().unwrap_or(&[]);
		let mut items = Vec::new();
		let mut valid = true;

		for index in list_indices(self.raw, input_name) {
			let item = template.renamed(index.as_str());
			let old_item = index
				.parse::<usize>()
				.ok()
				.and_then(|position| position.checked_sub(1))
				.and_then(|position| old_items.get(position));
			let writable = permissions.intersect(item.permissions).writable();
			if !writable && old_item.is_none() {
				continue;
			}
			let old_item = old_item.cloned().unwrap_or_else(|| item.get_initial());
			match self.accept_field(&item, &join(input_name, &index), permissions, &old_item) {
				Some(value) => items.push(value),
				None => valid = false,
			}
		}
		valid.then_some(Value::List(items))
	}
}
