//! In-process stand-in for the settings API, used by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubMode {
    Normal,
    /// Every request answers 500.
    ServerError,
    /// Every request answers 200 with `status: FAIL`.
    FailMarker,
    /// GET answers leave out `plan_price`.
    DropPlanPrice,
    /// Defaults for unknown brands carry someone else's slug.
    WrongSlug,
    /// Defaults for unknown brands have an empty `brand_name`.
    EmptyName,
    /// POST answers `status: FAIL`, GET behaves normally.
    RejectSave,
    /// POST stores a different `theme_color` than it was sent.
    AlterOnSave,
    /// Defaults carry a fractional review rating and `plan_benefits: null`.
    LooseOptionals,
    /// Every request waits `SLOW_DELAY` before answering.
    Slow,
}

pub const SLOW_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    store: Arc<Mutex<HashMap<String, Value>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// `"GET {slug}"` / `"POST {slug}"` for every request served so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_stub(mode: StubMode) -> StubServer {
    let mut store = HashMap::new();
    store.insert("annamartin".to_string(), annamartin());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        mode,
        store: Arc::new(Mutex::new(store)),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/legacy/landingpage/settings/:brand_slug", get(get_settings))
        .route("/legacy/landingpage/settings", post(save_settings))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{}/legacy", addr),
        requests,
        handle,
    }
}

/// A base URL on a port nobody is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/legacy", addr)
}

async fn get_settings(State(state): State<StubState>, Path(brand_slug): Path<String>) -> Response {
    state.requests.lock().unwrap().push(format!("GET {}", brand_slug));
    if state.mode == StubMode::Slow {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    match state.mode {
        StubMode::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
        StubMode::FailMarker => {
            let body = json!({ "status": "FAIL", "error": "Not implemented in production" });
            return Json(body).into_response();
        }
        _ => {}
    }

    let stored = state.store.lock().unwrap().get(&brand_slug).cloned();
    let mut settings = stored.unwrap_or_else(|| {
        let mut defaults = default_settings(&brand_slug);
        match state.mode {
            StubMode::WrongSlug => defaults["brand_slug"] = json!("default"),
            StubMode::EmptyName => defaults["brand_name"] = json!(""),
            StubMode::LooseOptionals => {
                defaults["reviews"] = json!([{ "name": "x", "text": "y", "rating": 4.5 }]);
                defaults["plan_benefits"] = Value::Null;
            }
            _ => {}
        }
        defaults
    });
    if state.mode == StubMode::DropPlanPrice {
        if let Some(map) = settings.as_object_mut() {
            map.remove("plan_price");
        }
    }

    Json(json!({ "status": "SUCCESS", "settings": settings })).into_response()
}

async fn save_settings(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let brand_slug = body["settings"]["brand_slug"].as_str().unwrap_or_default().to_string();
    state.requests.lock().unwrap().push(format!("POST {}", brand_slug));
    if state.mode == StubMode::Slow {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    match state.mode {
        StubMode::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
        StubMode::FailMarker | StubMode::RejectSave => {
            let body = json!({ "status": "FAIL", "error": "Failed to save settings" });
            return Json(body).into_response();
        }
        _ => {}
    }
    if brand_slug.is_empty() {
        let body = json!({ "status": "FAIL", "error": "Missing settings or brand_slug" });
        return Json(body).into_response();
    }

    let mut settings = body["settings"].clone();
    settings["updated_at"] = json!("2026-10-19T12:00:00.000Z");
    if state.mode == StubMode::AlterOnSave {
        settings["theme_color"] = json!("#308FAB");
    }
    state.store.lock().unwrap().insert(brand_slug, settings.clone());

    Json(json!({ "status": "SUCCESS", "settings": settings })).into_response()
}

fn annamartin() -> Value {
    json!({
        "brand_name": "Anna Martin Fitness",
        "brand_slug": "annamartin",
        "theme_color": "#308FAB",
        "about": "Certified personal trainer helping you get stronger.",
        "hero_title": "Transform Your Body, Transform Your Life",
        "hero_description": "Personalized workouts, nutrition plans and 24/7 support.",
        "hero_image": "https://images.unsplash.com/photo-1571019614242-c5c5dee9f50b?w=800",
        "access_title": "What You'll Get Access To",
        "access_description": "Workout videos, live classes, meal plans and a community.",
        "access_image": "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=800",
        "plan_title": "Monthly Membership",
        "plan_price": 29.99,
        "plan_benefits": ["100+ workout videos", "Weekly live classes", "7-day free trial"],
        "reviews": [
            { "name": "Sarah K.", "text": "Anna's program changed my life!", "rating": 5 }
        ],
        "logo": "/images/logo.svg",
        "currency": "GBP"
    })
}

fn default_settings(brand_slug: &str) -> Value {
    json!({
        "brand_name": "My Fitness",
        "brand_slug": brand_slug,
        "theme_color": "#308FAB",
        "about": "Welcome to my fitness program!",
        "hero_title": "Transform Your Body, Transform Your Life",
        "hero_description": "Join my exclusive fitness program.",
        "hero_image": "https://images.unsplash.com/photo-1571019614242-c5c5dee9f50b?w=800",
        "access_title": "What You'll Get Access To",
        "access_description": "Unlimited access to workout videos, live classes and meal plans.",
        "access_image": "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=800",
        "plan_title": "Monthly Membership",
        "plan_price": 29.99,
        "plan_benefits": ["100+ workout videos", "Weekly live classes", "7-day free trial"],
        "reviews": [],
        "logo": "/images/logo.svg",
        "currency": "GBP"
    })
}
