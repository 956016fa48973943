//! HTTP surface of tallyd.
//!
//! All mutation handlers funnel into the shared `DayRegistry` behind a
//! single async mutex, so every response body is a consistent view of
//! one momentary state. Historical reads bypass the registry and go
//! straight to the store.

use actix_web::{get, post, web, HttpResponse};
use chrono::NaiveDate;
use std::sync::Arc;
use tally_api::{
    AddEventRequest, DayStateView, ErrorBody, HealthStatus, LoginRequest, LoginResponse,
    NamedEvent, API_VERSION,
};
use tally_config::Settings;
use tally_core::DayRegistry;
use tally_store::{Store, StoreError};
use tally_util::{Clock, TallyError, Username};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared state handed to every handler
pub struct AppState {
    pub registry: Arc<Mutex<DayRegistry>>,
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<Settings>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(health)
        .service(state_for_day)
        .service(current_state)
        .service(increment)
        .service(decrement)
        .service(toggle)
        .service(add_event);
}

fn error_response(err: &TallyError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        TallyError::UserNotFound(_) => HttpResponse::NotFound().json(body),
        TallyError::UnknownField(_) | TallyError::NotNumeric(_) => {
            HttpResponse::BadRequest().json(body)
        }
        TallyError::Persistence(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn view_response(result: Result<DayStateView, TallyError>) -> HttpResponse {
    match result {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err),
    }
}

/// Credential check against the configured user list. No sessions or
/// tokens; the service trusts its network boundary.
#[post("/login")]
async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    if state.settings.lookup_user(&body.user, &body.password) {
        info!(user = %body.user, "Login accepted");
        HttpResponse::Ok().json(LoginResponse {
            ok: true,
            user: body.user.clone(),
        })
    } else {
        warn!(user = %body.user, "Login rejected");
        HttpResponse::Unauthorized().json(ErrorBody {
            error: "Invalid credentials".into(),
        })
    }
}

#[get("/state/{user}")]
async fn current_state(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let user = Username::from(path.into_inner());
    let result = state.registry.lock().await.state(&user);
    view_response(result)
}

/// State for an explicit day. Today is answered from the live
/// registry; any other day is reconstructed from archived rows and
/// marked read-only.
#[get("/state/{user}/{date}")]
async fn state_for_day(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (user, date) = path.into_inner();
    let user = Username::from(user);

    let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
        return HttpResponse::BadRequest().json(ErrorBody {
            error: format!("Invalid date: {date}"),
        });
    };

    let registry = state.registry.lock().await;
    if date == state.clock.today() {
        return view_response(registry.state(&user));
    }

    // Registry membership doubles as the known-user check
    if let Err(err) = registry.state(&user) {
        return error_response(&err);
    }
    drop(registry);

    match archived_view(state.store.as_ref(), &user, date) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&TallyError::persistence(err.to_string())),
    }
}

fn archived_view(
    store: &dyn Store,
    user: &Username,
    date: NaiveDate,
) -> Result<DayStateView, StoreError> {
    let mut view = DayStateView::empty(date);
    view.read_only = true;

    // A day with no rows at all still answers with zeroes
    if let Some(snapshot) = store.latest_snapshot(user, date)? {
        view.poop = snapshot.poop;
        view.piss = snapshot.piss;
        view.coffee = snapshot.coffee;
        view.shower = snapshot.shower;
        view.sick = snapshot.sick;
        view.workout = snapshot.workout;
        view.nap = snapshot.nap;
        view.party = snapshot.party;
    }

    for row in store.events_for_day(user, date)? {
        view.events_mut(row.category).push(NamedEvent {
            name: row.name,
            time: row.time,
        });
    }

    Ok(view)
}

#[post("/increment/{user}/{field}")]
async fn increment(state: web::Data<AppState>, path: web::Path<(String, String)>) -> HttpResponse {
    let (user, field) = path.into_inner();
    let user = Username::from(user);
    let result = state.registry.lock().await.increment(&user, &field);
    view_response(result)
}

#[post("/decrement/{user}/{field}")]
async fn decrement(state: web::Data<AppState>, path: web::Path<(String, String)>) -> HttpResponse {
    let (user, field) = path.into_inner();
    let user = Username::from(user);
    let result = state.registry.lock().await.decrement(&user, &field);
    view_response(result)
}

#[post("/toggle/{user}/{field}")]
async fn toggle(state: web::Data<AppState>, path: web::Path<(String, String)>) -> HttpResponse {
    let (user, field) = path.into_inner();
    let user = Username::from(user);
    let result = state.registry.lock().await.toggle(&user, &field);
    view_response(result)
}

#[post("/add/{user}/{category}")]
async fn add_event(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<AddEventRequest>,
) -> HttpResponse {
    let (user, category) = path.into_inner();
    let user = Username::from(user);

    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(ErrorBody {
            error: "Event name must not be empty".into(),
        });
    }

    let result = state
        .registry
        .lock()
        .await
        .add_event(&user, &category, name);
    view_response(result)
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    let user_count = state.registry.lock().await.user_count();
    HttpResponse::Ok().json(HealthStatus {
        api_version: API_VERSION,
        live: true,
        store_ok: state.store.is_healthy(),
        user_count,
    })
}
