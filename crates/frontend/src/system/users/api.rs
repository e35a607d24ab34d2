//! Account endpoints

use contracts::system::users::{
    ChangePasswordDto, DeleteAccountDto, ProfilePatch, UpdateEmailDto, UpdateUsernameDto, User,
};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, response_error};

/// Fetch the signed-in account.
pub async fn fetch_me() -> Result<User, String> {
    let response = Request::get(&api_url("/api/users/me"))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<User>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Change the username. Conflicts ("Username already taken") come back as
/// the error message.
pub async fn update_username(username: String) -> Result<User, String> {
    let dto = UpdateUsernameDto { username };
    let response = Request::put(&api_url("/api/users/me/username"))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<User>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn update_email(email: String) -> Result<User, String> {
    let dto = UpdateEmailDto { email };
    let response = Request::put(&api_url("/api/users/me/email"))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<User>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Merge changed profile keys into the stored profile.
pub async fn update_profile(patch: &ProfilePatch) -> Result<User, String> {
    let response = Request::put(&api_url("/api/users/me/profile"))
        .json(patch)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<User>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn change_password(current: String, new_password: String) -> Result<(), String> {
    let dto = ChangePasswordDto {
        password: current,
        new_password,
    };
    let response = Request::put(&api_url("/api/users/me/password"))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    Ok(())
}

pub async fn delete_account(password: String) -> Result<(), String> {
    let dto = DeleteAccountDto { password };
    let response = Request::delete(&api_url("/api/users/me"))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    Ok(())
}

/// Upload a new profile picture. The server stores the file, drops the
/// previous one and returns the updated account.
pub async fn upload_picture(file: web_sys::File) -> Result<User, String> {
    use wasm_bindgen::JsCast;
    use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

    let form_data = FormData::new().map_err(|e| format!("{e:?}"))?;
    form_data
        .append_with_blob("file", &file)
        .map_err(|e| format!("{e:?}"))?;

    let opts = RequestInit::new();
    opts.set_method("PUT");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form_data);

    let url = api_url("/api/users/me/picture");
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
