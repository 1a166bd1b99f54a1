use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{ApiError, Method, RawResponse, Result, Transport};

fn js_error(err: JsValue) -> ApiError {
	ApiError::Network(
		err.as_string()
			.unwrap_or_else(|| format!("{err:?}")),
	)
}

/// Browser `fetch` against a configured base URL.
#[derive(Clone, Debug)]
pub struct FetchTransport {
	base: String,
}

impl FetchTransport {
	pub fn new(base: impl Into<String>) -> Self {
		Self { base: base.into() }
	}
}

impl Transport for FetchTransport {
	async fn send(&self, method: Method, path: &str) -> Result<RawResponse> {
		let url = format!("{}{}", self.base, path);
		let init = RequestInit::new();
		init.set_method(method.as_str());
		init.set_mode(RequestMode::Cors);
		let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;

		let window =
			web_sys::window().ok_or_else(|| ApiError::Network("no window available".into()))?;
		let value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_error)?;
		let response: Response = value.dyn_into().map_err(js_error)?;

		let text = JsFuture::from(response.text().map_err(js_error)?)
			.await
			.map_err(js_error)?;
		Ok(RawResponse {
			status: response.status(),
			body: text.as_string().unwrap_or_default(),
		})
	}
}
