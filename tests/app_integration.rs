//! Application integration tests
//!
//! A router and a form working together through `App::handle`, the way a
//! server would drive them.

use hyper::{Method, StatusCode};
use rstest::{fixture, rstest};
use std::sync::Arc;
use trellis::conf::FormSettings;
use trellis::forms::convs::{Char, EnumChoice, Int};
use trellis::prelude::*;
use trellis::testing::ask;
use trellis::urls::ParamValue;

fn item_schema() -> Arc<FormSchema> {
	FormSchema::builder("item")
		.field(Field::new("title", Char::new().required().with_max_length(20)).with_label("Title"))
		.field(Field::new("quantity", Int::new().with_min(1)))
		.field(Field::new("size", EnumChoice::new([("s", "Small"), ("l", "Large")])))
		.build()
		.unwrap()
}

async fn edit_item(req: Request, schema: Arc<FormSchema>, forms: FormSettings) -> Result<Response> {
	let mut form = Form::new(schema)
		.with_id_prefix(&forms.id_prefix)
		.with_null_label(forms.null_label);
	let raw = MultiDict::from_pairs(req.form_pairs()?);
	match form.validate(raw) {
		Ok(clean) => {
			let location = format!("/items/{}/", req.path_param("id").unwrap_or_default());
			Response::see_other(location).with_json(&clean)
		}
		Err(_) => Ok(Response::bad_request().with_html(form.render())),
	}
}

/// Builds the app; the edit handler validates posted data and either
/// redirects or re-renders the form with a 400.
#[fixture]
fn app() -> App {
	let mut settings = Settings::default();
	settings.forms.id_prefix = "edit-".to_string();
	settings.forms.null_label = "(choose)".to_string();
	let form_settings = settings.forms.clone();

	let schema = item_schema();
	let edit = handler_fn(move |req: Request| edit_item(req, schema.clone(), form_settings.clone()));
	let show = handler_fn(|req: Request| async move {
		Ok(Response::ok().with_body(format!("item {}", req.path_param("id").unwrap_or_default())))
	});

	App::builder(settings)
		.add_route(Route::new("/items/{id:int}/", [Method::GET], show).with_name("detail"))
		.unwrap()
		.add_route(Route::new("/items/{id:int}/edit/", [Method::POST], edit).with_name("edit"))
		.unwrap()
		.build()
}

#[rstest]
#[tokio::test]
async fn test_valid_submission_redirects(app: App) {
	// Act
	let response = ask(
		&app,
		Method::POST,
		"/items/3/edit/",
		&[("title", "Lamp"), ("quantity", "2"), ("size", "l")],
	)
	.await;

	// Assert
	assert_eq!(response.status, StatusCode::SEE_OTHER);
	assert_eq!(
		response.headers.get("location").unwrap().to_str().unwrap(),
		"/items/3/"
	);
	let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
	assert_eq!(
		body,
		serde_json::json!({ "title": "Lamp", "quantity": 2, "size": "l" })
	);
}

#[rstest]
#[tokio::test]
async fn test_invalid_submission_rerenders_all_errors(app: App) {
	// Act
	let response = ask(
		&app,
		Method::POST,
		"/items/3/edit/",
		&[("title", ""), ("quantity", "0"), ("size", "xl")],
	)
	.await;

	// Assert
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	let html = response.text();
	assert!(html.contains("<p class=\"error\">required field</p>"));
	assert!(html.contains("<p class=\"error\">value should be &gt;= 1</p>"));
	assert!(html.contains("<p class=\"error\">no such choice</p>"));
	assert!(html.contains("<label for=\"edit-item-title\">Title</label>"));
	assert!(html.contains("value=\"0\""));
	assert!(html.contains(">(choose)</option>"));
}

#[rstest]
#[case(Method::GET, "/items/3/edit/", StatusCode::METHOD_NOT_ALLOWED)]
#[case(Method::POST, "/items/three/edit/", StatusCode::NOT_FOUND)]
#[case(Method::GET, "/items/3/", StatusCode::OK)]
#[case(Method::GET, "/nowhere/", StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_routing_statuses(
	app: App,
	#[case] method: Method,
	#[case] url: &str,
	#[case] expected: StatusCode,
) {
	// Act
	let response = ask(&app, method, url, &[]).await;

	// Assert
	assert_eq!(response.status, expected);
}

#[rstest]
#[tokio::test]
async fn test_method_not_allowed_lists_allowed_methods(app: App) {
	// Act
	let response = ask(&app, Method::DELETE, "/items/3/", &[]).await;

	// Assert
	assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers.get("allow").unwrap(), "GET");
}

#[rstest]
fn test_reverse_reproduces_matched_path(app: App) {
	// Arrange
	let path = "/items/15/edit/";

	// Act
	let matched = app.router().match_route(&Method::POST, path).unwrap();
	let params: Vec<(&str, ParamValue)> = matched
		.params
		.iter()
		.map(|(name, value)| (name.as_str(), value.clone()))
		.collect();

	// Assert
	assert_eq!(matched.name.as_deref(), Some("edit"));
	assert_eq!(app.router().reverse("edit", &params).unwrap(), path);
}

#[rstest]
fn test_app_form_uses_settings(app: App) {
	// Act
	let form = app.form(item_schema());

	// Assert
	assert_eq!(form.id(), "edit-item");
	assert!(form.render().contains(">(choose)</option>"));
}
