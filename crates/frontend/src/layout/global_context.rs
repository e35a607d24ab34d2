use contracts::config::AppConfig;
use contracts::system::users::User;
use gloo_net::http::Request;
use leptos::prelude::Effect;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

use crate::shared::api_utils::{api_url, response_error};
use crate::system::users::api as users_api;

/// Pages the application can show. The URL query string carries the same
/// information, so a page survives reload and can be linked to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    ContentList {
        type_slug: String,
    },
    ContentDetail {
        type_slug: String,
        slug: String,
    },
    ContentEdit {
        type_slug: String,
        slug: String,
    },
    Settings,
}

/// Query-string spelling of a [`Page`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
}

impl Page {
    fn from_query(query: &PageQuery) -> Self {
        match (
            query.page.as_deref(),
            query.type_slug.clone(),
            query.slug.clone(),
        ) {
            (Some("content-list"), Some(type_slug), _) => Page::ContentList { type_slug },
            (Some("content-detail"), Some(type_slug), Some(slug)) => {
                Page::ContentDetail { type_slug, slug }
            }
            (Some("content-edit"), Some(type_slug), Some(slug)) => {
                Page::ContentEdit { type_slug, slug }
            }
            (Some("settings"), _, _) => Page::Settings,
            // Anything unrecognized lands on the home page.
            _ => Page::Home,
        }
    }

    fn to_query(&self) -> PageQuery {
        match self {
            Page::Home => PageQuery::default(),
            Page::ContentList { type_slug } => PageQuery {
                page: Some("content-list".into()),
                type_slug: Some(type_slug.clone()),
                slug: None,
            },
            Page::ContentDetail { type_slug, slug } => PageQuery {
                page: Some("content-detail".into()),
                type_slug: Some(type_slug.clone()),
                slug: Some(slug.clone()),
            },
            Page::ContentEdit { type_slug, slug } => PageQuery {
                page: Some("content-edit".into()),
                type_slug: Some(type_slug.clone()),
                slug: Some(slug.clone()),
            },
            Page::Settings => PageQuery {
                page: Some("settings".into()),
                type_slug: None,
                slug: None,
            },
        }
    }
}

/// Link target for a page, usable in a plain `<a href>`.
pub fn href_for(page: &Page) -> String {
    let query = serde_qs::to_string(&page.to_query()).unwrap_or_default();
    if query.is_empty() {
        "?".to_string()
    } else {
        format!("?{}", query)
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub page: RwSignal<Page>,
    pub config: RwSignal<AppConfig>,
    pub config_loaded: RwSignal<bool>,
    /// Signed-in account; `None` renders the public view of everything.
    pub current_user: RwSignal<Option<User>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            page: RwSignal::new(Page::Home),
            config: RwSignal::new(AppConfig::default()),
            config_loaded: RwSignal::new(false),
            current_user: RwSignal::new(None),
        }
    }

    pub fn navigate(&self, page: Page) {
        leptos::logging::log!("navigate: {:?}", page);
        self.page.set(page);
    }

    /// Read the page out of the URL once, then keep the URL in sync with
    /// the page signal for the rest of the session.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let query: PageQuery = serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        self.page.set(Page::from_query(&query));

        let this = *self;
        Effect::new(move |_| {
            let page = this.page.get();
            let query_string = serde_qs::to_string(&page.to_query()).unwrap_or_default();

            let pathname = window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_string());
            let new_url = if query_string.is_empty() {
                pathname.clone()
            } else {
                format!("{}?{}", pathname, query_string)
            };

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            let current_url = format!("{}{}", pathname, current_search);

            // Only touch history when the URL actually changed.
            if current_url != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }

    /// Fetch the configuration and the signed-in account once at startup.
    /// Neither failure is fatal: the config falls back to the built-in
    /// default, the user stays signed out.
    pub fn load_initial_data(&self) {
        let config = self.config;
        let config_loaded = self.config_loaded;
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_config().await {
                Ok(loaded) => config.set(loaded),
                Err(e) => leptos::logging::warn!("config load failed: {}", e),
            }
            config_loaded.set(true);
        });

        let current_user = self.current_user;
        wasm_bindgen_futures::spawn_local(async move {
            match users_api::fetch_me().await {
                Ok(user) => current_user.set(Some(user)),
                Err(e) => leptos::logging::warn!("account load failed: {}", e),
            }
        });
    }
}

async fn fetch_config() -> Result<AppConfig, String> {
    let response = Request::get(&api_url("/api/config"))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    response
        .json::<AppConfig>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_trip_through_the_query_string() {
        let pages = [
            Page::Home,
            Page::ContentList {
                type_slug: "post".into(),
            },
            Page::ContentDetail {
                type_slug: "post".into(),
                slug: "hello-world".into(),
            },
            Page::ContentEdit {
                type_slug: "post".into(),
                slug: "hello-world".into(),
            },
            Page::Settings,
        ];
        for page in pages {
            let query = serde_qs::to_string(&page.to_query()).unwrap();
            let parsed: PageQuery = serde_qs::from_str(&query).unwrap();
            assert_eq!(Page::from_query(&parsed), page);
        }
    }

    #[test]
    fn unrecognized_queries_land_on_home() {
        let parsed: PageQuery = serde_qs::from_str("page=unknown&x=1").unwrap_or_default();
        assert_eq!(Page::from_query(&parsed), Page::Home);

        // A list page without its type is not addressable.
        let parsed: PageQuery = serde_qs::from_str("page=content-list").unwrap();
        assert_eq!(Page::from_query(&parsed), Page::Home);
    }

    #[test]
    fn hrefs_carry_the_page_query() {
        let href = href_for(&Page::ContentList {
            type_slug: "post".into(),
        });
        assert_eq!(href, "?page=content-list&type=post");
        assert_eq!(href_for(&Page::Home), "?");
    }
}
