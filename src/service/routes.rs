//! HTTP routes and request handlers
//!
//! The web collaborator: extracts form/query data, authenticates the
//! caller through the session cookie, invokes the core modules with
//! plain in-memory values and returns JSON responses. Every core
//! failure is converted into an HTTP status plus a user-facing notice;
//! nothing here is fatal.

use crate::error::{AppError, Result};
use crate::rating::{apply_skill_rating, average_ratings};
use crate::roster::match_not_found;
use crate::service::app::AppState;
use crate::team::balance;
use crate::types::{
    BalancedTeams, CreateMatchRequest, LoginRequest, Match, MatchDetail, MatchId, PastMatchEntry,
    Player, PlayerId, Rating, RatingChecklist, RegisterPlayerRequest, SkillScores,
};
use crate::utils::current_timestamp;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

/// Build the full route table over the service context
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_open_matches))
        .route("/agregar_jugador", post(register_player))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/jugador/{id}", get(player_profile))
        .route("/jugador/{id}/calificar", post(rate_player_direct))
        .route("/partido/crear", post(create_match))
        .route("/partido/{id}", get(match_detail))
        .route("/partido/{id}/inscribir", post(signup))
        .route("/partido/{id}/darse-de-baja", post(withdraw))
        .route("/partido/{id}/organizar", get(organize_teams).post(organize_teams))
        .route("/partido/{id}/calificar", get(rating_checklist))
        .route(
            "/partido/{id}/submit_calificacion/{calificado_id}",
            post(submit_rating),
        )
        .route("/partidos-anteriores", get(past_matches))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Error wrapper that maps the domain taxonomy onto HTTP responses
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<AppError>() {
            // Unauthenticated callers are sent to the login page.
            Some(AppError::Unauthenticated) => {
                return Redirect::to("/login").into_response();
            }
            Some(AppError::PlayerNotFound { .. }) | Some(AppError::MatchNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            Some(AppError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Some(AppError::InvalidRequest { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(AppError::MatchFull { .. })
            | Some(AppError::AlreadyEnrolled { .. })
            | Some(AppError::NotEnrolled { .. })
            | Some(AppError::MatchAlreadyPlayed { .. })
            | Some(AppError::MatchNotPlayed { .. })
            | Some(AppError::DuplicateRating { .. })
            | Some(AppError::SelfRating)
            | Some(AppError::PlayerAlreadyRegistered { .. }) => StatusCode::CONFLICT,
            _ => {
                warn!("Internal error serving request: {:#}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let notice = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal service error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "notice": notice }))).into_response()
    }
}

/// Resolve the caller through the session cookie
fn current_player(state: &AppState, jar: &CookieJar) -> Result<Player> {
    let cookie = jar
        .get(&state.config.auth.session_cookie)
        .ok_or(AppError::Unauthenticated)?;
    let token = Uuid::parse_str(cookie.value()).map_err(|_| AppError::Unauthenticated)?;
    let player_id = state
        .sessions
        .resolve(token)?
        .ok_or(AppError::Unauthenticated)?;

    state
        .players
        .get_player(player_id)?
        .ok_or_else(|| AppError::Unauthenticated.into())
}

fn get_match_or_404(state: &AppState, match_id: MatchId) -> Result<Match> {
    state
        .matches
        .get_match(match_id)?
        .ok_or_else(|| match_not_found(match_id))
}

/// Skill bounds are a boundary concern; the aggregator never checks them
fn check_score_bounds(state: &AppState, scores: &SkillScores) -> Result<()> {
    let (min, max) = (state.config.rating.min_score, state.config.rating.max_score);
    if !scores.within_bounds(min, max) {
        return Err(AppError::InvalidRequest {
            reason: format!("skill scores must lie between {} and {}", min, max),
        }
        .into());
    }
    Ok(())
}

fn refresh_open_matches_gauge(state: &AppState) {
    if let Ok(joinable) = state.matches.list_joinable(current_timestamp()) {
        state
            .metrics
            .matches()
            .open_matches
            .set(joinable.len() as i64);
    }
}

fn rejection_reason(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<AppError>() {
        Some(AppError::DuplicateRating { .. }) => "duplicate",
        Some(AppError::SelfRating) => "self_rating",
        Some(AppError::MatchNotPlayed { .. }) => "match_not_played",
        Some(AppError::NotEnrolled { .. }) => "not_enrolled",
        Some(AppError::InvalidRequest { .. }) => "invalid_scores",
        _ => "other",
    }
}

/// GET / - open, future, non-full matches
async fn list_open_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    let joinable = state.matches.list_joinable(current_timestamp())?;
    Ok(Json(joinable))
}

/// POST /agregar_jugador - registration (legacy form sends name/email
/// only; the full flow adds surname and password)
async fn register_player(
    State(state): State<AppState>,
    Json(form): Json<RegisterPlayerRequest>,
) -> Result<Response, ApiError> {
    if form.name.trim().is_empty() {
        return Err(AppError::InvalidRequest {
            reason: "name is required".to_string(),
        }
        .into());
    }
    if form.email.trim().is_empty() || !form.email.contains('@') {
        return Err(AppError::InvalidRequest {
            reason: "a valid email is required".to_string(),
        }
        .into());
    }

    let password_hash = match &form.password {
        Some(password) => Some(state.hasher.hash(password)?),
        None => None,
    };

    let player = state.players.create_player(Player::new(
        form.name.trim().to_string(),
        form.surname.unwrap_or_default().trim().to_string(),
        form.email.trim().to_string(),
        password_hash,
    ))?;

    state.metrics.players().registered_total.inc();
    info!("Registered player '{}' ({})", player.name, player.id);

    Ok((StatusCode::CREATED, Json(player)).into_response())
}

/// GET /login - placeholder for the login view (templates are out of scope)
async fn login_page() -> Json<serde_json::Value> {
    Json(json!({
        "notice": "POST email and password to /login"
    }))
}

/// POST /login - open a session; failures get a generic notice
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let failure = || {
        state
            .metrics
            .players()
            .logins_total
            .with_label_values(&["failure"])
            .inc();
        ApiError::from(AppError::InvalidCredentials)
    };

    let player = match state.players.find_by_email(form.email.trim())? {
        Some(player) => player,
        None => return Err(failure()),
    };
    let digest = match &player.password_hash {
        Some(digest) => digest.clone(),
        None => return Err(failure()),
    };
    if !state.hasher.verify(&form.password, &digest)? {
        return Err(failure());
    }

    let token = state.sessions.create_session(player.id)?;
    state
        .metrics
        .players()
        .logins_total
        .with_label_values(&["success"])
        .inc();
    info!("Player '{}' logged in", player.name);

    let cookie = Cookie::build((state.config.auth.session_cookie.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Json(player)).into_response())
}

/// GET /logout - drop the session and go home
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let cookie_name = state.config.auth.session_cookie.clone();
    if let Some(cookie) = jar.get(&cookie_name) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            state.sessions.revoke(token)?;
        }
    }

    let jar = jar.remove(Cookie::from(cookie_name));
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /jugador/{id} - player profile
async fn player_profile(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Player>, ApiError> {
    let player = state.players.get_player(player_id)?.ok_or_else(|| {
        ApiError::from(AppError::PlayerNotFound {
            player_id: player_id.to_string(),
        })
    })?;
    Ok(Json(player))
}

/// POST /jugador/{id}/calificar - legacy single-shot rating, superseded
/// by the per-match flow. Not tied to any match, so it cannot
/// double-count with match-level aggregation.
async fn rate_player_direct(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(player_id): Path<PlayerId>,
    Json(scores): Json<SkillScores>,
) -> Result<Json<Player>, ApiError> {
    let rater = current_player(&state, &jar)?;
    check_score_bounds(&state, &scores)?;

    let updated = state
        .players
        .update_player(player_id, &mut |p| apply_skill_rating(p, &scores))?;

    state.metrics.ratings().aggregations_total.inc();
    info!(
        "Legacy rating applied to '{}' by '{}'",
        updated.name, rater.name
    );
    Ok(Json(updated))
}

/// POST /partido/crear - organizer creates a match; past dates rejected
async fn create_match(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<CreateMatchRequest>,
) -> Result<Response, ApiError> {
    let organizer = current_player(&state, &jar)?;

    let m = Match::create(
        form.venue,
        form.location,
        form.scheduled_at,
        form.players_needed,
        organizer.id,
        current_timestamp(),
    )?;
    let m = state.matches.create_match(m)?;

    state.metrics.matches().created_total.inc();
    refresh_open_matches_gauge(&state);
    info!(
        "Match created at '{}' for {} players on {}",
        m.venue, m.players_needed, m.scheduled_at
    );

    Ok((StatusCode::CREATED, Json(m)).into_response())
}

/// GET /partido/{id} - match detail with the past flag
async fn match_detail(
    State(state): State<AppState>,
    Path(match_id): Path<MatchId>,
) -> Result<Json<MatchDetail>, ApiError> {
    let m = get_match_or_404(&state, match_id)?;
    let is_past = m.is_past(current_timestamp());
    Ok(Json(MatchDetail { info: m, is_past }))
}

/// POST /partido/{id}/inscribir - signup (requires auth)
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Match>, ApiError> {
    let player = current_player(&state, &jar)?;
    get_match_or_404(&state, match_id)?;

    let now = current_timestamp();
    // Capacity check and append run under one store write lock.
    let result = state
        .matches
        .update_match(match_id, &mut |m| m.signup(player.id, now));

    match result {
        Ok(m) => {
            state
                .metrics
                .matches()
                .signups_total
                .with_label_values(&["accepted"])
                .inc();
            refresh_open_matches_gauge(&state);
            info!("Player '{}' signed up for match {}", player.name, match_id);
            Ok(Json(m))
        }
        Err(err) => {
            state
                .metrics
                .matches()
                .signups_total
                .with_label_values(&["rejected"])
                .inc();
            Err(err.into())
        }
    }
}

/// POST /partido/{id}/darse-de-baja - withdrawal (requires auth and a
/// future match date)
async fn withdraw(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(match_id): Path<MatchId>,
) -> Result<Json<Match>, ApiError> {
    let player = current_player(&state, &jar)?;
    get_match_or_404(&state, match_id)?;

    let now = current_timestamp();
    let result = state
        .matches
        .update_match(match_id, &mut |m| m.withdraw(player.id, now));

    match result {
        Ok(m) => {
            state
                .metrics
                .matches()
                .withdrawals_total
                .with_label_values(&["accepted"])
                .inc();
            refresh_open_matches_gauge(&state);
            info!("Player '{}' withdrew from match {}", player.name, match_id);
            Ok(Json(m))
        }
        Err(err) => {
            state
                .metrics
                .matches()
                .withdrawals_total
                .with_label_values(&["rejected"])
                .inc();
            Err(err.into())
        }
    }
}

/// GET|POST /partido/{id}/organizar - balanced squads from the roster
async fn organize_teams(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(match_id): Path<MatchId>,
) -> Result<Json<BalancedTeams>, ApiError> {
    current_player(&state, &jar)?;
    let m = get_match_or_404(&state, match_id)?;

    let roster = state.players.get_players(&m.roster)?;
    let (team_a, team_b) = balance(&roster);
    Ok(Json(BalancedTeams { team_a, team_b }))
}

/// GET /partido/{id}/calificar - teammates still to rate vs already
/// rated by the current user
async fn rating_checklist(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(match_id): Path<MatchId>,
) -> Result<Json<RatingChecklist>, ApiError> {
    let player = current_player(&state, &jar)?;
    let m = get_match_or_404(&state, match_id)?;

    if !m.is_enrolled(player.id) {
        return Err(AppError::NotEnrolled {
            player_id: player.id.to_string(),
        }
        .into());
    }

    let already_rated = state.ratings.rated_ids_by(player.id, match_id)?;
    let mut pending_ids = Vec::new();
    let mut rated_ids = Vec::new();
    for teammate in m.teammates_of(player.id) {
        if already_rated.contains(&teammate) {
            rated_ids.push(teammate);
        } else {
            pending_ids.push(teammate);
        }
    }

    Ok(Json(RatingChecklist {
        pending: state.players.get_players(&pending_ids)?,
        rated: state.players.get_players(&rated_ids)?,
    }))
}

/// POST /partido/{id}/submit_calificacion/{calificado_id} - submit one
/// rating; when the ratee's last expected teammate rating arrives, the
/// match's averaged vector is folded into their stats exactly once
async fn submit_rating(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((match_id, rated_id)): Path<(MatchId, PlayerId)>,
    Json(scores): Json<SkillScores>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rater = current_player(&state, &jar)?;
    let m = get_match_or_404(&state, match_id)?;

    let now = current_timestamp();
    let accepted: Result<()> = (|| {
        m.check_can_rate(rater.id, rated_id, now)?;
        check_score_bounds(&state, &scores)?;
        state.ratings.insert_rating(Rating {
            rater_id: rater.id,
            rated_id,
            match_id,
            scores,
            submitted_at: now,
        })
    })();

    if let Err(err) = accepted {
        state
            .metrics
            .ratings()
            .rejected_total
            .with_label_values(&[rejection_reason(&err)])
            .inc();
        return Err(err.into());
    }
    state.metrics.ratings().submitted_total.inc();

    // One aggregation per (ratee, match): fire only when every teammate
    // has rated. Concurrent final submissions can both observe the
    // complete set, so the stat update must first be claimed through
    // the store's aggregation marker.
    let received = state.ratings.ratings_for(rated_id, match_id)?;
    let teammates_count = m.roster.len().saturating_sub(1);
    let mut stats_updated = false;

    if received.len() == teammates_count
        && state.ratings.try_mark_aggregated(rated_id, match_id)?
    {
        let timer = state
            .metrics
            .ratings()
            .aggregation_duration
            .start_timer();
        let vectors: Vec<SkillScores> = received.iter().map(|r| r.scores).collect();
        if let Some(averaged) = average_ratings(&vectors) {
            state
                .players
                .update_player(rated_id, &mut |p| apply_skill_rating(p, &averaged))?;
            state.metrics.ratings().aggregations_total.inc();
            stats_updated = true;
            info!(
                "Aggregated {} ratings into player {} for match {}",
                vectors.len(),
                rated_id,
                match_id
            );
        }
        timer.observe_duration();
    }

    Ok(Json(json!({
        "notice": "rating submitted",
        "stats_updated": stats_updated,
    })))
}

/// GET /partidos-anteriores - past matches of the current user with
/// rating-completion status
async fn past_matches(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<PastMatchEntry>>, ApiError> {
    let player = current_player(&state, &jar)?;
    let now = current_timestamp();

    let mut entries = Vec::new();
    for m in state.matches.list_past_for_player(player.id, now)? {
        let teammates_count = m.roster.len().saturating_sub(1);
        let ratings_given = state.ratings.count_given_by(player.id, m.id)?;
        entries.push(PastMatchEntry {
            teammates_count,
            ratings_given,
            completed: ratings_given >= teammates_count,
            info: m,
        });
    }

    Ok(Json(entries))
}

/// GET /health - service liveness
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": state.config.service.name,
        "version": crate::VERSION,
    }))
}

/// GET /metrics - Prometheus text exposition
async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rendered = state.metrics.gather()?;
    Ok((StatusCode::OK, rendered).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_reason_labels() {
        let duplicate: anyhow::Error = AppError::DuplicateRating {
            rater_id: "a".to_string(),
            rated_id: "b".to_string(),
        }
        .into();
        assert_eq!(rejection_reason(&duplicate), "duplicate");

        let other: anyhow::Error = AppError::InternalError {
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(rejection_reason(&other), "other");
    }

    #[test]
    fn test_roster_phase_display_used_in_responses() {
        use crate::roster::RosterPhase;
        assert_eq!(RosterPhase::Past.to_string(), "Past");
    }
}
