//! Thin wrapper over `window.fetch` returning status and body text.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Send a request and wait for the whole body. Errors are transport
/// failures only; HTTP error statuses come back as a normal response.
pub async fn fetch_text(method: &str, url: &str, body: Option<&str>) -> Result<HttpResponse, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(body));
        // Writes sent while the page unloads must outlive it.
        // web-sys has no `set_keepalive` binding; set the field directly.
        js_sys::Reflect::set(&init, &JsValue::from_str("keepalive"), &JsValue::TRUE).map_err(js_error)?;
    }
    let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    Ok(HttpResponse {
        status: response.status(),
        body: text.as_string().unwrap_or_default(),
    })
}
