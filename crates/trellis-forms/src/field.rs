//! The field tree.
//!
//! A [`Field`] pairs a converter with a widget. Aggregate fields nest:
//! a field set groups differently named children into a `Map` value, and a
//! field list repeats one template field into a `List` value. Containers hold
//! [`Node`]s, which are fields, titled blocks of fields, or field-less static
//! widgets.

use crate::convs::Converter;
use crate::error::{FormError, FormResult, ValidationError};
use crate::form::INDICES_SUFFIX;
use crate::media::Media;
use crate::perms::Permissions;
use crate::value::Value;
use crate::widgets::Widget;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Extra check run on a field's converted value.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

#[derive(Clone)]
pub enum FieldKind {
	Leaf(Arc<dyn Converter>),
	/// Named children; the value is a `Map` keyed by child name.
	Set(Vec<Node>),
	/// Template instantiated once per submitted index; the value is a `List`.
	List(Box<Field>),
}

impl fmt::Debug for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Leaf(conv) => f.debug_tuple("Leaf").field(conv).finish(),
			Self::Set(nodes) => f.debug_tuple("Set").field(nodes).finish(),
			Self::List(template) => f.debug_tuple("List").field(template).finish(),
		}
	}
}

/// A named unit of a form schema.
#[derive(Clone)]
pub struct Field {
	pub name: String,
	pub label: Option<String>,
	pub help_text: Option<String>,
	pub kind: FieldKind,
	pub widget: Widget,
	pub permissions: Permissions,
	pub initial: Option<Value>,
	validators: Vec<Validator>,
	media: Media,
}

impl Field {
	/// A leaf field. The default widget follows the converter: file input for
	/// files, select for choices, text input otherwise.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_forms::Field;
	/// use trellis_forms::convs::{Char, EnumChoice};
	/// use trellis_forms::Widget;
	///
	/// let name = Field::new("name", Char::new().required()).with_label("Name");
	/// assert!(name.is_required());
	/// assert!(matches!(name.widget, Widget::TextInput));
	///
	/// let size = Field::new("size", EnumChoice::new([("s", "Small")]));
	/// assert!(matches!(size.widget, Widget::Select { .. }));
	/// ```
	pub fn new(name: impl Into<String>, conv: impl Converter + 'static) -> Self {
		Self::with_converter(name, Arc::new(conv))
	}

	pub fn with_converter(name: impl Into<String>, conv: Arc<dyn Converter>) -> Self {
		let widget = if conv.expects_file() {
			Widget::FileInput
		} else if conv.choices().is_some() {
			Widget::select()
		} else {
			Widget::TextInput
		};
		Self::build(name.into(), FieldKind::Leaf(conv), widget)
	}

	/// A field set grouping `nodes`.
	pub fn set(name: impl Into<String>, nodes: Vec<Node>) -> Self {
		Self::build(name.into(), FieldKind::Set(nodes), Widget::FieldSet)
	}

	/// A field list repeating `template`. The template's own name is replaced
	/// by the item index.
	pub fn list(name: impl Into<String>, template: Field) -> Self {
		Self::build(name.into(), FieldKind::List(Box::new(template)), Widget::FieldList)
	}

	fn build(name: String, kind: FieldKind, widget: Widget) -> Self {
		Self {
			name,
			label: None,
			help_text: None,
			kind,
			widget,
			permissions: Permissions::READ_WRITE,
			initial: None,
			validators: Vec::new(),
			media: Media::new(),
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = widget;
		self
	}

	pub fn with_permissions(mut self, permissions: Permissions) -> Self {
		self.permissions = permissions;
		self
	}

	/// Shorthand for read-only permissions.
	pub fn readonly(self) -> Self {
		self.with_permissions(Permissions::READ_ONLY)
	}

	pub fn with_initial(mut self, initial: impl Into<Value>) -> Self {
		self.initial = Some(initial.into());
		self
	}

	/// Add a check on the converted value. For field sets and lists it runs
	/// only when every child converted.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
	{
		self.validators.push(Arc::new(validator));
		self
	}

	pub fn with_media(mut self, media: Media) -> Self {
		self.media.merge(&media);
		self
	}

	pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
		let mut field = self.clone();
		field.name = name.into();
		field
	}

	pub fn converter(&self) -> Option<&Arc<dyn Converter>> {
		match &self.kind {
			FieldKind::Leaf(conv) => Some(conv),
			_ => None,
		}
	}

	pub fn validators(&self) -> &[Validator] {
		&self.validators
	}

	pub fn is_required(&self) -> bool {
		self.converter().is_some_and(|conv| conv.is_required())
	}

	pub fn is_multiple(&self) -> bool {
		self.converter().is_some_and(|conv| conv.is_multiple())
	}

	/// Child fields of a field set, with blocks flattened away.
	pub fn fields(&self) -> Vec<&Field> {
		match &self.kind {
			FieldKind::Set(nodes) => collect_fields(nodes),
			_ => Vec::new(),
		}
	}

	/// Nodes of a field set.
	pub fn nodes(&self) -> &[Node] {
		match &self.kind {
			FieldKind::Set(nodes) => nodes,
			_ => &[],
		}
	}

	/// The template of a field list.
	pub fn template(&self) -> Option<&Field> {
		match &self.kind {
			FieldKind::List(template) => Some(template),
			_ => None,
		}
	}

	/// Find a descendant by dotted path relative to this field.
	///
	/// List items are addressed by a numeric index and resolve to the list's
	/// template.
	pub fn field(&self, path: &str) -> Option<&Field> {
		let (head, rest) = match path.split_once('.') {
			Some((head, rest)) => (head, Some(rest)),
			None => (path, None),
		};
		let child = match &self.kind {
			FieldKind::Set(nodes) => find_field(nodes, head)?,
			FieldKind::List(template) if is_index(head) => template.as_ref(),
			_ => return None,
		};
		match rest {
			Some(rest) => child.field(rest),
			None => Some(child),
		}
	}

	/// Value used when no data was provided.
	pub fn get_initial(&self) -> Value {
		if let Some(initial) = &self.initial {
			return initial.clone();
		}
		match &self.kind {
			FieldKind::Leaf(conv) => conv.empty_value(),
			FieldKind::Set(nodes) => Value::Map(
				collect_fields(nodes)
					.into_iter()
					.map(|field| (field.name.clone(), field.get_initial()))
					.collect::<IndexMap<_, _>>(),
			),
			FieldKind::List(_) => Value::List(Vec::new()),
		}
	}

	/// Media of this field, its widget and its descendants.
	pub fn media(&self) -> Media {
		let mut media = self.media.clone();
		media.merge(&self.widget.media());
		match &self.kind {
			FieldKind::Set(nodes) => media.merge(&nodes_media(nodes)),
			FieldKind::List(template) => media.merge(&template.media()),
			FieldKind::Leaf(_) => {}
		}
		media
	}
}

impl fmt::Debug for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("kind", &self.kind)
			.field("widget", &self.widget)
			.field("permissions", &self.permissions)
			.field("initial", &self.initial)
			.finish_non_exhaustive()
	}
}

/// A titled group of fields. Its fields belong to the enclosing container:
/// a block adds no naming level and no value.
#[derive(Debug, Clone)]
pub struct Block {
	pub title: String,
	pub classname: Option<String>,
	pub nodes: Vec<Node>,
}

impl Block {
	pub fn new(title: impl Into<String>, nodes: Vec<Node>) -> Self {
		Self {
			title: title.into(),
			classname: None,
			nodes,
		}
	}

	pub fn with_classname(mut self, classname: impl Into<String>) -> Self {
		self.classname = Some(classname.into());
		self
	}
}

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// A widget without a field; its output is emitted verbatim.
#[derive(Clone)]
pub struct StaticWidget {
	render: RenderFn,
	media: Media,
}

impl StaticWidget {
	pub fn new<F>(render: F) -> Self
	where
		F: Fn() -> String + Send + Sync + 'static,
	{
		Self {
			render: Arc::new(render),
			media: Media::new(),
		}
	}

	/// Static HTML.
	pub fn html(html: impl Into<String>) -> Self {
		let html = html.into();
		Self::new(move || html.clone())
	}

	pub fn with_media(mut self, media: Media) -> Self {
		self.media = media;
		self
	}

	pub fn render(&self) -> String {
		(self.render)()
	}
}

impl fmt::Debug for StaticWidget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticWidget")
			.field("media", &self.media)
			.finish_non_exhaustive()
	}
}

/// Child of a form or field set.
#[derive(Debug, Clone)]
pub enum Node {
	Field(Field),
	Block(Block),
	Static(StaticWidget),
}

impl From<Field> for Node {
	fn from(field: Field) -> Self {
		Self::Field(field)
	}
}

impl From<Block> for Node {
	fn from(block: Block) -> Self {
		Self::Block(block)
	}
}

impl From<StaticWidget> for Node {
	fn from(widget: StaticWidget) -> Self {
		Self::Static(widget)
	}
}

/// Fields of `nodes` in order, descending into blocks.
pub(crate) fn collect_fields(nodes: &[Node]) -> Vec<&Field> {
	let mut fields = Vec::new();
	for node in nodes {
		match node {
			Node::Field(field) => fields.push(field),
			Node::Block(block) => fields.extend(collect_fields(&block.nodes)),
			Node::Static(_) => {}
		}
	}
	fields
}

pub(crate) fn find_field<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Field> {
	collect_fields(nodes).into_iter().find(|field| field.name == name)
}

pub(crate) fn nodes_media(nodes: &[Node]) -> Media {
	let mut media = Media::new();
	for node in nodes {
		match node {
			Node::Field(field) => media.merge(&field.media()),
			Node::Block(block) => media.merge(&nodes_media(&block.nodes)),
			Node::Static(widget) => media.merge(&widget.media),
		}
	}
	media
}

pub(crate) fn is_index(segment: &str) -> bool {
	!segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Check names below `container`: valid and unique among siblings.
pub(crate) fn check_nodes(container: &str, nodes: &[Node]) -> FormResult<()> {
	let mut seen = HashSet::new();
	for field in collect_fields(nodes) {
		check_name(&field.name)?;
		if !seen.insert(field.name.as_str()) {
			return Err(FormError::DuplicateField {
				container: container.to_string(),
				name: field.name.clone(),
			});
		}
		check_children(field)?;
	}
	Ok(())
}

fn check_children(field: &Field) -> FormResult<()> {
	match &field.kind {
		FieldKind::Set(nodes) => check_nodes(&field.name, nodes),
		// The template's name is replaced by the index
		FieldKind::List(template) => check_children(template),
		FieldKind::Leaf(_) => Ok(()),
	}
}

fn check_name(name: &str) -> FormResult<()> {
	let valid = !name.is_empty()
		&& !is_index(name)
		&& !name.contains('.')
		&& !name.ends_with(INDICES_SUFFIX)
		&& !name.chars().any(char::is_whitespace);
	if valid {
		Ok(())
	} else {
		Err(FormError::InvalidFieldName(name.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::convs::{Char, FileConv, Int, ListOf};
	use rstest::rstest;

	#[rstest]
	fn test_blocks_are_transparent() {
		// Arrange
		let nodes: Vec<Node> = vec![
			Block::new(
				"",
				vec![
					StaticWidget::html("<hr/>").into(),
					Field::new("f1", Char::new()).into(),
					Field::set("f2", vec![]).into(),
					Field::list("f3", Field::new("", Char::new())).into(),
				],
			)
			.into(),
			Field::new("f4", Char::new()).into(),
			Field::set("f5", vec![]).into(),
			Field::list("f6", Field::new("", Char::new())).into(),
			StaticWidget::html("<hr/>").into(),
		];
		let set = Field::set("name", nodes);

		// Act
		let names: Vec<&str> = set.fields().iter().map(|f| f.name.as_str()).collect();

		// Assert
		assert_eq!(names, vec!["f1", "f2", "f3", "f4", "f5", "f6"]);
	}

	#[rstest]
	fn test_lookup_by_path() {
		let address = Field::set(
			"address",
			vec![Field::new("city", Char::new()).into()],
		);
		let phones = Field::list("phones", Field::new("", Int::new()));
		let root = Field::set("root", vec![address.into(), phones.into()]);

		assert_eq!(root.field("address.city").map(|f| f.name.as_str()), Some("city"));
		assert!(root.field("phones.3").is_some());
		assert!(root.field("phones.x").is_none());
		assert!(root.field("address.zip").is_none());
	}

	#[rstest]
	fn test_initial_values() {
		let set = Field::set(
			"s",
			vec![
				Field::new("a", Char::new()).with_initial("x").into(),
				Field::new("b", ListOf::new(Int::new())).into(),
				Field::list("c", Field::new("", Int::new())).into(),
			],
		);

		let initial = set.get_initial();

		assert_eq!(initial.pointer("a"), Some(&Value::from("x")));
		assert_eq!(initial.pointer("b"), Some(&Value::List(vec![])));
		assert_eq!(initial.pointer("c"), Some(&Value::List(vec![])));
	}

	#[rstest]
	fn test_default_widget_for_files() {
		let field = Field::new("upload", FileConv::new());

		assert!(matches!(field.widget, Widget::FileInput));
	}

	#[rstest]
	#[case("")]
	#[case("a.b")]
	#[case("a-indices")]
	#[case("12")]
	#[case("first name")]
	fn test_invalid_names_rejected(#[case] name: &str) {
		let nodes = vec![Field::new(name, Char::new()).into()];

		assert_eq!(
			check_nodes("form", &nodes),
			Err(FormError::InvalidFieldName(name.to_string()))
		);
	}

	#[rstest]
	#[case("first-name")]
	#[case("indices")]
	#[case("x-indices-old")]
	fn test_dashed_names_accepted(#[case] name: &str) {
		let nodes = vec![Field::new(name, Char::new()).into()];

		assert_eq!(check_nodes("form", &nodes), Ok(()));
	}

	#[rstest]
	fn test_duplicate_across_block_rejected() {
		let nodes = vec![
			Field::new("a", Char::new()).into(),
			Block::new("More", vec![Field::new("a", Char::new()).into()]).into(),
		];

		assert_eq!(
			check_nodes("form", &nodes),
			Err(FormError::DuplicateField {
				container: "form".to_string(),
				name: "a".to_string(),
			})
		);
	}

	#[rstest]
	fn test_same_name_in_different_containers_allowed() {
		let nodes = vec![
			Field::new("name", Char::new()).into(),
			Field::set("child", vec![Field::new("name", Char::new()).into()]).into(),
		];

		assert!(check_nodes("form", &nodes).is_ok());
	}
}
