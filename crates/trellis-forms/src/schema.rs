//! Immutable form definitions.

use crate::error::{FormError, FormResult, ValidationError};
use crate::field::{Block, Field, Node, StaticWidget, check_nodes, collect_fields, nodes_media};
use crate::media::Media;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// Check run on the whole clean data after every field converted.
pub type FormValidator =
	Arc<dyn Fn(&IndexMap<String, Value>) -> Result<(), ValidationError> + Send + Sync>;

/// The root container of a form: its id, nodes and form-level validators.
///
/// Built once and shared; a [`Form`](crate::Form) is created from it per
/// submission.
pub struct FormSchema {
	id: String,
	nodes: Vec<Node>,
	validators: Vec<FormValidator>,
	media: Media,
}

impl FormSchema {
	/// Start describing a schema.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::FormSchema;
	/// use trellis_forms::Field;
	/// use trellis_forms::convs::{Char, Int};
	///
	/// let schema = FormSchema::builder("profile")
	///     .field(Field::new("name", Char::new().required()))
	///     .field(Field::new("age", Int::new()))
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(schema.id(), "profile");
	/// assert_eq!(schema["age"].name, "age");
	/// assert!(schema.field("email").is_err());
	/// ```
	pub fn builder(id: impl Into<String>) -> FormSchemaBuilder {
		FormSchemaBuilder {
			id: id.into(),
			nodes: Vec::new(),
			validators: Vec::new(),
			media: Media::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Top-level fields, with blocks flattened away.
	pub fn fields(&self) -> Vec<&Field> {
		collect_fields(&self.nodes)
	}

	pub fn validators(&self) -> &[FormValidator] {
		&self.validators
	}

	/// Find a field by dotted path (`address.city`, `phones.2`).
	///
	/// # Errors
	///
	/// Returns [`FormError::UnknownField`] when nothing has that path.
	pub fn field(&self, path: &str) -> FormResult<&Field> {
		let (head, rest) = match path.split_once('.') {
			Some((head, rest)) => (head, Some(rest)),
			None => (path, None),
		};
		let field = collect_fields(&self.nodes)
			.into_iter()
			.find(|field| field.name == head);
		let found = match (field, rest) {
			(Some(field), Some(rest)) => field.field(rest),
			(field, None) => field,
			(None, Some(_)) => None,
		};
		found.ok_or_else(|| FormError::UnknownField(path.to_string()))
	}

	/// Initial clean data of every top-level field.
	pub fn initial(&self) -> IndexMap<String, Value> {
		self.fields()
			.into_iter()
			.map(|field| (field.name.clone(), field.get_initial()))
			.collect()
	}

	/// Media declared on the schema, its fields, widgets and static nodes.
	pub fn media(&self) -> Media {
		let mut media = self.media.clone();
		media.merge(&nodes_media(&self.nodes));
		media
	}
}

impl Index<&str> for FormSchema {
	type Output = Field;

	fn index(&self, path: &str) -> &Self::Output {
		self.field(path)
			.unwrap_or_else(|_| panic!("Field '{}' not found", path))
	}
}

impl fmt::Debug for FormSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormSchema")
			.field("id", &self.id)
			.field("nodes", &self.nodes)
			.field("validators", &self.validators.len())
			.finish()
	}
}

/// Builder for [`FormSchema`].
pub struct FormSchemaBuilder {
	id: String,
	nodes: Vec<Node>,
	validators: Vec<FormValidator>,
	media: Media,
}

impl FormSchemaBuilder {
	pub fn field(self, field: Field) -> Self {
		self.node(field)
	}

	pub fn block(self, block: Block) -> Self {
		self.node(block)
	}

	pub fn static_widget(self, widget: StaticWidget) -> Self {
		self.node(widget)
	}

	pub fn node(mut self, node: impl Into<Node>) -> Self {
		self.nodes.push(node.into());
		self
	}

	/// Add a form-level check. Its error is reported under
	/// [`ALL_FIELDS_KEY`](crate::ALL_FIELDS_KEY).
	pub fn validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&IndexMap<String, Value>) -> Result<(), ValidationError> + Send + Sync + 'static,
	{
		self.validators.push(Arc::new(validator));
		self
	}

	pub fn media(mut self, media: Media) -> Self {
		self.media.merge(&media);
		self
	}

	/// Check field names and freeze the schema.
	///
	/// # Errors
	///
	/// [`FormError::DuplicateField`] when siblings share a name (fields inside
	/// blocks count as siblings of the block's container) and
	/// [`FormError::InvalidFieldName`] for empty, numeric or dotted names
	/// and names ending in [`INDICES_SUFFIX`](crate::INDICES_SUFFIX).
	pub fn build(self) -> FormResult<Arc<FormSchema>> {
		check_nodes(&self.id, &self.nodes)?;
		Ok(Arc::new(FormSchema {
			id: self.id,
			nodes: self.nodes,
			validators: self.validators,
			media: self.media,
		}))
	}
}
