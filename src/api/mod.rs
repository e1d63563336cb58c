use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    ExplorerError,
    encyclopedia::{ImageSource, SummarySource},
    explorer::Explorer,
    geocoding::ReverseGeocoder,
    location_resolver::LocationResolver,
    models::{Coordinates, EXPORT_MIME_TYPE, KnowledgeCard, Language},
    session::{Session, SessionEvent},
};

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Everything the handlers share. One session: the explorer is single-user.
pub struct AppState<E, G> {
    pub explorer: Explorer<E>,
    pub geocoder: G,
    pub session: Mutex<Session>,
    pub default_language: Language,
}

impl<E, G> AppState<E, G> {
    pub fn new(explorer: Explorer<E>, geocoder: G, default_language: Language) -> Self {
        Self {
            explorer,
            geocoder,
            session: Mutex::new(Session::new()),
            default_language,
        }
    }
}

#[derive(Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
pub struct MapRequest {
    pub visible: bool,
}

#[derive(Deserialize)]
pub struct ExploreParams {
    pub place: Option<String>,
    pub lang: Option<String>,
}

pub fn router<E, G>(state: Arc<AppState<E, G>>) -> Router
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    Router::new()
        .route("/session", get(get_session::<E, G>))
        .route("/session/location", post(detect_city::<E, G>))
        .route("/session/map", post(toggle_map::<E, G>))
        .route("/session/map/click", post(map_click::<E, G>))
        .route("/explore", get(explore::<E, G>))
        .route("/explore/download", get(download::<E, G>))
        .with_state(state)
}

fn reject(err: ExplorerError) -> (StatusCode, String) {
    let status = match err {
        ExplorerError::Validation { .. } => StatusCode::BAD_REQUEST,
        ExplorerError::NotFound { .. } => StatusCode::NOT_FOUND,
        ExplorerError::Network { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.user_message())
}

async fn get_session<E, G>(State(state): State<Arc<AppState<E, G>>>) -> Json<Session>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    Json(state.session.lock().await.clone())
}

async fn detect_city<E, G>(
    State(state): State<Arc<AppState<E, G>>>,
    Json(request): Json<LocationRequest>,
) -> ApiResult<Json<Session>>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    let location = Coordinates::new(request.latitude, request.longitude).map_err(reject)?;
    let city = LocationResolver::city_name(&state.geocoder, location).await;

    let session = apply(&state, SessionEvent::DetectCity { location, city }).await;
    Ok(Json(session))
}

async fn toggle_map<E, G>(
    State(state): State<Arc<AppState<E, G>>>,
    Json(request): Json<MapRequest>,
) -> Json<Session>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    let event = if request.visible {
        SessionEvent::ShowMap
    } else {
        SessionEvent::HideMap
    };
    Json(apply(&state, event).await)
}

async fn map_click<E, G>(
    State(state): State<Arc<AppState<E, G>>>,
    Json(request): Json<LocationRequest>,
) -> ApiResult<Json<Session>>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    let location = Coordinates::new(request.latitude, request.longitude).map_err(reject)?;

    if !state.session.lock().await.show_map {
        return Err((
            StatusCode::CONFLICT,
            "Show the map before picking a location.".to_string(),
        ));
    }

    let city = LocationResolver::city_name(&state.geocoder, location).await;
    let session = apply(&state, SessionEvent::MapClicked { location, city }).await;
    Ok(Json(session))
}

async fn explore<E, G>(
    State(state): State<Arc<AppState<E, G>>>,
    Query(params): Query<ExploreParams>,
) -> ApiResult<Json<KnowledgeCard>>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    Ok(Json(build_card(&state, params).await?))
}

async fn download<E, G>(
    State(state): State<Arc<AppState<E, G>>>,
    Query(params): Query<ExploreParams>,
) -> ApiResult<impl IntoResponse>
where
    E: SummarySource + ImageSource + 'static,
    G: ReverseGeocoder + 'static,
{
    let card = build_card(&state, params).await?;
    let disposition = content_disposition(&card.export_file_name());

    Ok((
        [
            (header::CONTENT_TYPE, format!("{EXPORT_MIME_TYPE}; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        card.to_text(),
    ))
}

/// `attachment` with an ASCII `filename` and, for other names, the UTF-8
/// `filename*` from RFC 5987
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .filter(|c| *c != '"')
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    if file_name.is_ascii() {
        format!("attachment; filename=\"{ascii}\"")
    } else {
        format!(
            "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
            urlencoding::encode(file_name)
        )
    }
}

async fn apply<E, G>(state: &AppState<E, G>, event: SessionEvent) -> Session {
    let mut session = state.session.lock().await;
    let current = std::mem::take(&mut *session);
    *session = current.apply(event);
    session.clone()
}

async fn build_card<E, G>(state: &AppState<E, G>, params: ExploreParams) -> ApiResult<KnowledgeCard>
where
    E: SummarySource + ImageSource,
{
    let language = match params.lang.as_deref() {
        Some(lang) => lang.parse::<Language>().map_err(reject)?,
        None => state.default_language,
    };

    let place = match params.place.filter(|place| !place.trim().is_empty()) {
        Some(place) => place,
        None => state
            .session
            .lock()
            .await
            .suggested_place()
            .map(str::to_string)
            .unwrap_or_default(),
    };

    state
        .explorer
        .explore_named(&place, language)
        .await
        .map_err(reject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEncyclopedia, FakeGeocoder};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(city: Option<&str>) -> Router {
        let encyclopedia = FakeEncyclopedia::new().with_summary(
            "Hyderabad",
            "Hyderabad is the capital of the Indian state of Telangana.",
        );
        let state = AppState::new(
            Explorer::new(encyclopedia),
            FakeGeocoder(city.map(str::to_string)),
            Language::English,
        );
        router(Arc::new(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_explore_by_name() {
        let app = app(None);
        let (status, body) = send(&app, get_request("/explore?place=Hyderabad&lang=te")).await;

        assert_eq!(status, StatusCode::OK);
        let card: KnowledgeCard = serde_json::from_str(&body).unwrap();
        assert_eq!(
            card.summary,
            "[TE] Hyderabad is the capital of the Indian state of Telangana."
        );
        assert_eq!(card.languages_spoken(), "English, Telugu");
    }

    #[tokio::test]
    async fn test_explore_without_place_is_rejected() {
        let app = app(None);
        let (status, body) = send(&app, get_request("/explore")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please enter a place name.");
    }

    #[tokio::test]
    async fn test_detected_city_seeds_explore() {
        let app = app(Some("Hyderabad"));
        let (status, _) = send(
            &app,
            post_json("/session/location", r#"{"latitude": 17.385, "longitude": 78.4867}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get_request("/explore")).await;
        assert_eq!(status, StatusCode::OK);
        let card: KnowledgeCard = serde_json::from_str(&body).unwrap();
        assert_eq!(card.place, "Hyderabad");
    }

    #[tokio::test]
    async fn test_map_click_requires_visible_map() {
        let app = app(Some("Hyderabad"));
        let click = r#"{"latitude": 17.385, "longitude": 78.4867}"#;

        let (status, _) = send(&app, post_json("/session/map/click", click)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(&app, post_json("/session/map", r#"{"visible": true}"#)).await;
        let (status, body) = send(&app, post_json("/session/map/click", click)).await;
        assert_eq!(status, StatusCode::OK);
        let session: Session = serde_json::from_str(&body).unwrap();
        assert_eq!(session.city.as_deref(), Some("Hyderabad"));
    }

    #[tokio::test]
    async fn test_failed_geocoding_reports_unknown() {
        let app = app(None);
        let (_, body) = send(
            &app,
            post_json("/session/location", r#"{"latitude": 17.385, "longitude": 78.4867}"#),
        )
        .await;
        let session: Session = serde_json::from_str(&body).unwrap();
        assert_eq!(session.city.as_deref(), Some("Unknown"));
        assert!(session.suggested_place().is_none());
    }

    #[tokio::test]
    async fn test_download_headers() {
        let app = app(None);
        let response = app
            .oneshot(get_request("/explore/download?place=Hyderabad"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Hyderabad_summary.txt\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Hyderabad - Cultural Summary (English)"));
    }

    #[tokio::test]
    async fn test_download_with_control_characters() {
        let app = app(None);
        let response = app
            .oneshot(get_request("/explore/download?place=Foo%0ABar"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Foo_Bar_summary.txt\""
        );
    }

    #[tokio::test]
    async fn test_download_with_non_ascii_name() {
        let app = app(None);
        let response = app
            .oneshot(get_request("/explore/download?place=%E0%A4%B9%E0%A5%88"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"__summary.txt\"; filename*=UTF-8''%E0%A4%B9%E0%A5%88_summary.txt"
        );
    }

    #[test]
    fn test_content_disposition_drops_quotes() {
        assert_eq!(
            content_disposition("Say \"Hi\"_summary.txt"),
            "attachment; filename=\"Say Hi_summary.txt\""
        );
    }

    #[tokio::test]
    async fn test_invalid_coordinates_are_rejected() {
        let app = app(Some("Hyderabad"));
        let (status, _) = send(
            &app,
            post_json("/session/location", r#"{"latitude": 123.0, "longitude": 78.4867}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
