//! Single binary web server: game state via REST, rendering is client-side.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), DATA_DIR (ranking files).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use team_fortune_web::events::{CommentarySink, CueSink};
use team_fortune_web::storage::{JsonFileStore, KeyValueStore, HISTORY_KEY, RANKING_KEY};
use team_fortune_web::{
    confirm_pick, draw_captains, finalize_report, finish_spin, request_pick, standings,
    start_round, ErrorKind, Game, GameError, GameId, PlayerId, Team, WheelEngine,
};
use uuid::Uuid;

/// Per-game entry: game data, its wheel, and last activity time (for auto-cleanup).
struct GameEntry {
    game: Game,
    wheel: WheelEngine,
    last_activity: Instant,
}

/// In-memory state: many games by ID (sessioned). Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<GameId, GameEntry>>>;

/// Inactivity threshold: games not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Sink that routes cues and commentary to the log. The real audio/voice
/// consumers live in the client; the server just records that they fired.
struct LogSink;

impl CueSink for LogSink {
    fn spin_start(&self) {
        log::debug!("cue: spin start");
    }
    fn tick(&self) {
        log::trace!("cue: tick");
    }
    fn win(&self) {
        log::debug!("cue: win");
    }
    fn round_complete(&self) {
        log::debug!("cue: round complete");
    }
}

impl CommentarySink for LogSink {
    fn round_started(&self) {
        log::info!("commentary: round started");
    }
    fn winner_announced(&self, name: &str) {
        log::info!("commentary: winner announced: {}", name);
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize, Default)]
struct SpinBody {
    /// Flick velocity from a drag release; omitted for a button spin.
    flick_velocity: Option<f64>,
}

#[derive(Deserialize)]
struct ReportBody {
    winning_team: Option<Team>,
    #[serde(default)]
    kills: HashMap<PlayerId, u32>,
}

/// Path segment: game id (e.g. /api/games/{id})
#[derive(Deserialize)]
struct GamePath {
    id: GameId,
}

/// Path segments: game id and player id (e.g. /api/games/{id}/players/{player_id})
#[derive(Deserialize)]
struct GamePlayerPath {
    id: GameId,
    player_id: Uuid,
}

fn error_response(e: GameError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        // Invariant violations are bugs, not bad requests.
        ErrorKind::LogicError => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-fortune-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new game (returns it with id; client stores id for subsequent requests).
/// Ranking and history are seeded from the persisted store.
#[post("/api/games")]
async fn api_create_game(state: AppState, store: Data<JsonFileStore>) -> HttpResponse {
    let game = Game::with_persisted(
        store.load_json(RANKING_KEY),
        store.load_json(HISTORY_KEY),
    );
    let id = game.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        GameEntry {
            game,
            wheel: WheelEngine::new(),
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.get(&id).unwrap().game)
}

/// Get a game by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/games/{id}")]
async fn api_get_game(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.game)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    }
}

/// Add a player to the roster (blocked while a round is in progress).
#[post("/api/games/{id}/players")]
async fn api_add_player(state: AppState, path: Path<GamePath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match entry.game.add_player(body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Remove a player by id (blocked while a round is in progress).
#[delete("/api/games/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<GamePlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match entry.game.remove_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Start a round from the current 8-player roster.
#[post("/api/games/{id}/round/start")]
async fn api_start_round(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match start_round(&mut entry.game, &mut rand::thread_rng(), &LogSink) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Spin the wheel for the next pick. The response carries the spin duration
/// so the client can animate; call the finish endpoint when it elapses.
#[post("/api/games/{id}/round/spin")]
async fn api_spin(state: AppState, path: Path<GamePath>, body: Option<Json<SpinBody>>) -> HttpResponse {
    let flick = body.and_then(|b| b.flick_velocity);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match request_pick(&entry.game, &mut entry.wheel, flick, &mut rand::thread_rng(), &LogSink) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "duration_ms": entry.wheel.spin_duration_ms(),
            "rotation": entry.wheel.rotation(),
        })),
        Err(e) => error_response(e),
    }
}

/// Finish the in-flight spin: resolves the winner into the pending pick.
#[post("/api/games/{id}/round/spin/finish")]
async fn api_finish_spin(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match finish_spin(&mut entry.game, &mut entry.wheel, &LogSink, &LogSink) {
        Ok(_) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Confirm the pending winner into team A (4th confirm completes the round).
#[post("/api/games/{id}/round/confirm")]
async fn api_confirm_pick(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match confirm_pick(&mut entry.game, &LogSink) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Draw one random captain per team (completed rounds only, once per round).
#[post("/api/games/{id}/round/captains")]
async fn api_draw_captains(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match draw_captains(&mut entry.game, &mut rand::thread_rng()) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Submit the post-round report: winner and kill counts. Persists ranking and
/// starts the next round with the same roster.
#[post("/api/games/{id}/round/report")]
async fn api_report(
    state: AppState,
    store: Data<JsonFileStore>,
    path: Path<GamePath>,
    body: Json<ReportBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    };
    entry.last_activity = Instant::now();
    match finalize_report(
        &mut entry.game,
        body.winning_team,
        &body.kills,
        store.get_ref(),
        &mut rand::thread_rng(),
        &LogSink,
    ) {
        Ok(()) => HttpResponse::Ok().json(&entry.game),
        Err(e) => error_response(e),
    }
}

/// Ranking table sorted by wins, then kills.
#[get("/api/games/{id}/standings")]
async fn api_standings(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(standings(&entry.game))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<GameId, GameEntry>::new()));
    let store = Data::new(JsonFileStore::new(data_dir));

    // Background task: every 30 minutes, remove games inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive game(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(store.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_game)
            .service(api_get_game)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_start_round)
            .service(api_spin)
            .service(api_finish_spin)
            .service(api_confirm_pick)
            .service(api_draw_captains)
            .service(api_report)
            .service(api_standings)
    })
    .bind(bind)?
    .run()
    .await
}
