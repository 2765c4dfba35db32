//! Form validation and rendering for Trellis.
//!
//! A form is a tree of named fields. Each leaf field pairs a
//! [`Converter`](convs::Converter) (parse and validate) with a [`Widget`]
//! (render). Field sets group differently named children, field lists repeat
//! a template, blocks group fields visually and static widgets render fixed
//! HTML.
//!
//! ```
//! use trellis_forms::{Field, Form, FormSchema, MultiDict};
//! use trellis_forms::convs::{Char, Int};
//!
//! let schema = FormSchema::builder("signup")
//!     .field(Field::new("name", Char::new().required()))
//!     .field(Field::new("age", Int::new().with_min(18)))
//!     .build()
//!     .unwrap();
//!
//! let mut form = Form::new(schema);
//! let errors = form
//!     .validate(MultiDict::from_urlencoded("name=&age=twelve").unwrap())
//!     .unwrap_err();
//!
//! // Every field is tried: both errors are reported at once
//! assert_eq!(errors.get("name"), Some("required field"));
//! assert_eq!(errors.get("age"), Some("it is not valid integer"));
//!
//! // The rejected form re-renders with the submitted values
//! assert!(form.render().contains(r#"value="twelve""#));
//! ```

pub mod bound_field;
pub mod convs;
pub mod error;
pub mod field;
pub mod form;
pub mod media;
pub mod multidict;
pub mod perms;
mod render;
pub mod schema;
pub mod value;
pub mod widgets;

pub use bound_field::BoundField;
pub use error::{ALL_FIELDS_KEY, FormError, FormErrors, FormResult, ValidationError};
pub use field::{Block, Field, FieldKind, Node, StaticWidget, Validator};
pub use form::{Form, INDICES_SUFFIX};
pub use media::{Media, MediaItem};
pub use multidict::{MultiDict, RawValue, UploadedFile};
pub use perms::Permissions;
pub use schema::{FormSchema, FormSchemaBuilder, FormValidator};
pub use value::Value;
pub use widgets::{
	CustomWidget, NULL_LABEL, RenderType, SelectOption, Widget, WidgetContext, escape_attribute,
	escape_html,
};
