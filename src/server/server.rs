use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, error, info};

use axum_extra::extract::cookie::{Cookie, SameSite};
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::assets::{asset_manifest, SoundClips};
use super::metrics::{metrics_handler, record_map_click, record_sound_toggle};
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::session_store::SessionStore;
use super::{http_cache, log_requests, state::*, ServerConfig};
use crate::audio::{ChannelState, SoundChannel, SoundInstruction};
use crate::census::DatasetSummary;
use crate::detail::{render_detail, DetailView};
use crate::map::{ClickOutcome, ClickTarget, LatLng, MapPresenter, Viewport};

pub const MAP_TITLE: &str = "SQURL";
pub const MARKER_ICON_KEY: &str = "marker:squirrel";
pub const MARKER_ICON_SIZE: [u32; 2] = [78, 77];

/// Idle sessions are swept at most this often, even with a shorter timeout.
const MIN_PRUNE_PERIOD: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub records: usize,
    pub session_token: Option<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct CreateSessionResponse {
    token: String,
}

#[derive(Serialize)]
struct MarkerIcon {
    key: &'static str,
    size: [u32; 2],
}

#[derive(Serialize)]
struct MapView<'a> {
    title: &'static str,
    tile_url: &'a str,
    attribution: &'a str,
    marker_icon: MarkerIcon,
    viewport: Viewport,
    max_cluster_zoom: u8,
    summary: &'a DatasetSummary,
}

#[derive(Deserialize, Debug)]
struct ViewportBody {
    center: LatLng,
    zoom: u8,
}

#[derive(Serialize)]
struct ClickResponse {
    #[serde(flatten)]
    outcome: ClickOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<DetailView>,
}

#[derive(Serialize)]
struct ChannelStateView {
    channel: SoundChannel,
    state: ChannelState,
}

#[derive(Serialize)]
struct SoundResponse<'a> {
    #[serde(flatten)]
    instruction: SoundInstruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_uri: Option<&'a str>,
}

fn initial_viewport(state: &ServerState) -> Viewport {
    let centroid = state.census.summary.centroid;
    Viewport::new(
        LatLng::new(centroid.latitude, centroid.longitude),
        state.config.map.default_zoom,
    )
}

async fn home(session: Option<Session>, State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        records: state.census.features.len(),
        session_token: session.map(|s| s.token),
    };
    Json(stats)
}

async fn create_session(State(state): State<ServerState>) -> Response {
    let presenter = MapPresenter::new(
        state.census.features.clone(),
        state.config.map.presenter_settings(),
        initial_viewport(&state),
    );
    let token = state.sessions.create(presenter);

    let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(CreateSessionResponse { token }),
    )
        .into_response()
}

async fn delete_session(session: Session, State(sessions): State<GuardedSessionStore>) -> Response {
    sessions.remove(&session.token);

    let expired = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .same_site(SameSite::Lax)
        .build();

    (StatusCode::OK, [(header::SET_COOKIE, expired.to_string())]).into_response()
}

async fn get_map(State(state): State<ServerState>) -> Response {
    let map = &state.config.map;
    Json(MapView {
        title: MAP_TITLE,
        tile_url: &map.tile_url,
        attribution: &map.attribution,
        marker_icon: MarkerIcon {
            key: MARKER_ICON_KEY,
            size: MARKER_ICON_SIZE,
        },
        viewport: initial_viewport(&state),
        max_cluster_zoom: map.max_cluster_zoom,
        summary: &state.census.summary,
    })
    .into_response()
}

async fn get_features(State(census): State<GuardedCensus>) -> Response {
    match serde_json::to_vec(census.features.as_ref()) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/geo+json")], body).into_response(),
        Err(err) => {
            error!("Could not serialize feature collection: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_clusters(session: Session, State(sessions): State<GuardedSessionStore>) -> Response {
    match sessions.with_session(&session.token, |s| s.presenter.clusters().clone()) {
        Some(clusters) => Json(clusters).into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn put_viewport(
    session: Session,
    State(sessions): State<GuardedSessionStore>,
    Json(body): Json<ViewportBody>,
) -> Response {
    debug!("Viewport change {:?}", body);
    match sessions.with_session(&session.token, |s| {
        s.presenter.set_viewport(body.center, body.zoom).clone()
    }) {
        Some(clusters) => Json(clusters).into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn post_click(
    session: Session,
    State(sessions): State<GuardedSessionStore>,
    Json(target): Json<ClickTarget>,
) -> Response {
    record_map_click(target.kind());
    let response = sessions.with_session(&session.token, |s| {
        let outcome = s.presenter.on_marker_click(&target);
        let detail = match outcome {
            ClickOutcome::Selected { .. } => s
                .presenter
                .selected_feature()
                .map(|f| render_detail(&f.properties)),
            _ => None,
        };
        ClickResponse { outcome, detail }
    });

    match response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn get_selected_detail(
    session: Session,
    State(sessions): State<GuardedSessionStore>,
) -> Response {
    let detail = sessions.with_session(&session.token, |s| {
        s.presenter
            .selected_feature()
            .map(|f| render_detail(&f.properties))
    });

    match detail {
        Some(Some(detail)) => Json(detail).into_response(),
        Some(None) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn get_detail(State(census): State<GuardedCensus>, Path(id): Path<String>) -> Response {
    match census.features.get(&id) {
        Some(feature) => Json(render_detail(&feature.properties)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_sound(session: Session, State(sessions): State<GuardedSessionStore>) -> Response {
    let states = sessions.with_session(&session.token, |s| {
        s.audio
            .states()
            .into_iter()
            .map(|(channel, state)| ChannelStateView { channel, state })
            .collect::<Vec<_>>()
    });

    match states {
        Some(states) => Json(states).into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

async fn post_sound_click(
    session: Session,
    State(state): State<ServerState>,
    Path(channel): Path<String>,
) -> Response {
    let channel: SoundChannel = match channel.parse() {
        Ok(channel) => channel,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let Some(instruction) = state
        .sessions
        .with_session(&session.token, |s| s.audio.click(channel))
    else {
        return StatusCode::FORBIDDEN.into_response();
    };

    let data_uri = match instruction {
        SoundInstruction::Play { .. } => {
            record_sound_toggle(channel.name(), "playing");
            state.sound_clips.data_uri(channel)
        }
        SoundInstruction::Stop { .. } => {
            record_sound_toggle(channel.name(), "idle");
            None
        }
    };

    Json(SoundResponse {
        instruction,
        data_uri,
    })
    .into_response()
}

async fn get_asset_manifest() -> Response {
    Json(asset_manifest()).into_response()
}

impl ServerState {
    fn new(config: ServerConfig, census: LoadedCensus, sound_clips: SoundClips) -> ServerState {
        let idle_timeout = Duration::from_secs(config.session_idle_timeout_sec);
        let sessions = SessionStore::with_limit(idle_timeout, config.max_sessions);
        ServerState {
            config,
            start_time: Instant::now(),
            census: Arc::new(census),
            sessions: Arc::new(sessions),
            sound_clips: Arc::new(sound_clips),
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    census: LoadedCensus,
    sound_clips: SoundClips,
) -> Result<Router> {
    make_router(ServerState::new(config, census, sound_clips))
}

fn make_router(state: ServerState) -> Result<Router> {
    let config = state.config.clone();

    let cached_routes: Router = Router::new()
        .route("/map/features", get(get_features))
        .route("/assets/manifest", get(get_asset_manifest))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let map_routes: Router = Router::new()
        .route("/session", post(create_session).delete(delete_session))
        .route("/map", get(get_map))
        .route("/map/clusters", get(get_clusters))
        .route("/map/viewport", put(put_viewport))
        .route("/map/click", post(post_click))
        .route("/detail", get(get_selected_detail))
        .route("/detail/{id}", get(get_detail))
        .route("/sound", get(get_sound))
        .route("/sound/{channel}/click", post(post_sound_click))
        .with_state(state.clone())
        .merge(cached_routes);

    let home_router: Router = match &config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router.nest("/v1", map_routes);
    if let Some(assets_path) = &config.assets_dir_path {
        app = app.nest_service("/assets", ServeDir::new(assets_path));
    }
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

async fn serve_metrics(port: u16) -> Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Could not bind metrics port {}", port))?;
    Ok(axum::serve(listener, app).await?)
}

pub async fn run_server(
    config: ServerConfig,
    census: LoadedCensus,
    sound_clips: SoundClips,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let state = ServerState::new(config, census, sound_clips);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let period = sessions.idle_timeout().max(MIN_PRUNE_PERIOD);
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            sessions.prune_idle();
        }
    });

    let app = make_router(state)?;

    tokio::spawn(async move {
        if let Err(err) = serve_metrics(metrics_port).await {
            error!("Metrics server stopped: {:#}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Could not bind port {}", port))?;
    info!("Listening on {:?}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
