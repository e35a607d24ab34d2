//! Content endpoints

use contracts::api::UploadedFileBody;
use contracts::content::entry::{ContentEntry, ContentPage, EntryPatch};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, response_error};

/// Fetch one page of entries for a type, newest first.
pub async fn fetch_page(type_slug: &str, from: i64, limit: i64) -> Result<ContentPage, String> {
    let url = api_url(&format!(
        "/api/content/{}?from={}&limit={}&sortBy=createdAt&sortOrder=DESC",
        urlencoding::encode(type_slug),
        from,
        limit
    ));
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<ContentPage>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Fetch a single entry by slug.
pub async fn fetch_entry(type_slug: &str, slug: &str) -> Result<ContentEntry, String> {
    let url = api_url(&format!(
        "/api/content/{}/{}",
        urlencoding::encode(type_slug),
        urlencoding::encode(slug)
    ));
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<ContentEntry>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Save the changed fields of an entry. Constraint violations come back as
/// the error message.
pub async fn update_entry(
    type_slug: &str,
    slug: &str,
    patch: &EntryPatch,
) -> Result<ContentEntry, String> {
    let url = api_url(&format!(
        "/api/content/{}/{}",
        urlencoding::encode(type_slug),
        urlencoding::encode(slug)
    ));
    let response = Request::put(&url)
        .json(patch)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<ContentEntry>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Store one file for a content field and return where it landed.
pub async fn upload_file(file: web_sys::File) -> Result<UploadedFileBody, String> {
    use wasm_bindgen::JsCast;
    use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

    let form_data = FormData::new().map_err(|e| format!("{e:?}"))?;
    form_data
        .append_with_blob("file", &file)
        .map_err(|e| format!("{e:?}"))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form_data);

    let url = api_url("/api/storage");
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| format!("{e:?}"))?;

    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{e:?}"))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{e:?}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("{e:?}"))?;
    let text: String = text.as_string().ok_or_else(|| "bad text".to_string())?;
    serde_json::from_str(&text).map_err(|e| format!("{e}"))
}
