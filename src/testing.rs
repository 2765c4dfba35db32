//! Helpers for exercising an [`App`] in tests without a server.

use crate::app::App;
use crate::http::{Request, Response};
use hyper::Method;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Send a request through `app` and return its response.
///
/// `data` is urlencoded into the query string for `GET` and `HEAD`, and into
/// the body otherwise.
///
/// # Examples
///
/// ```
/// use trellis::App;
/// use trellis::http::{Request, Response, Result, handler_fn};
/// use trellis::testing::ask;
/// use hyper::{Method, StatusCode};
///
/// async fn echo(req: Request) -> Result<Response> {
///     let pairs = req.form_pairs()?;
///     Ok(Response::ok().with_body(format!("{:?}", pairs)))
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let echo = handler_fn(echo);
/// let app = App::builder(Default::default())
///     .route("/echo/", [Method::POST], echo)
///     .unwrap()
///     .build();
///
/// let response = ask(&app, Method::POST, "/echo/", &[("q", "a b")]).await;
///
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(response.text(), r#"[("q", "a b")]"#);
/// # }
/// ```
pub async fn ask(app: &App, method: Method, url: &str, data: &[(&str, &str)]) -> Response {
	match build_request(method, url, data) {
		Ok(request) => app.handle(request).await,
		Err(err) => Response::from(err),
	}
}

fn build_request(method: Method, url: &str, data: &[(&str, &str)]) -> crate::http::Result<Request> {
	let encoded = serde_urlencoded::to_string(data)
		.map_err(|e| crate::http::Error::Http(format!("Cannot encode form data: {}", e)))?;

	let builder = Request::builder().method(method.clone());
	if encoded.is_empty() {
		return builder.uri(url).build();
	}

	if method == Method::GET || method == Method::HEAD {
		let separator = if url.contains('?') { '&' } else { '?' };
		builder.uri(format!("{}{}{}", url, separator, encoded)).build()
	} else {
		builder
			.uri(url)
			.header("content-type", FORM_CONTENT_TYPE)
			.body(encoded)
			.build()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Method::GET, "/search/", "/search/?q=rust&page=2")]
	#[case(Method::GET, "/search/?lang=en", "/search/?lang=en&q=rust&page=2")]
	fn test_get_data_goes_to_query(#[case] method: Method, #[case] url: &str, #[case] expected: &str) {
		let request = build_request(method, url, &[("q", "rust"), ("page", "2")]).unwrap();

		assert_eq!(request.uri.to_string(), expected);
		assert!(request.body.is_empty());
	}

	#[rstest]
	fn test_post_data_goes_to_body() {
		let request = build_request(Method::POST, "/items/", &[("title", "a&b")]).unwrap();

		assert_eq!(request.path(), "/items/");
		assert_eq!(&request.body[..], b"title=a%26b");
		assert_eq!(
			request.form_pairs().unwrap(),
			vec![("title".to_string(), "a&b".to_string())]
		);
	}
}
