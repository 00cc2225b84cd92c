use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use planbook::api::{ApiError, CopyRequest, CurriculumApi, HttpApi, InMemoryApi, MoveRequest, SpecialDay};
use planbook::config::PlannerConfig;
use planbook::model::entity::{AnyEntity, Course, EntityDraft, Lesson, SubTopic, Topic};
use planbook::model::{CurriculumEntity, EntityKind, NodeKey};
use planbook::planner::{PlannerService, ToastQueue};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Two courses; Algebra holds a subtopic between two direct lessons.
pub fn sample_store() -> InMemoryApi {
    InMemoryApi::from_entities([
        Course::new(1, "Maths", 0).into(),
        Course::new(2, "Physics", 1).into(),
        Topic::new(10, 1, "Algebra", 0).into(),
        Topic::new(11, 1, "Geometry", 1).into(),
        Topic::new(12, 2, "Mechanics", 0).into(),
        SubTopic::new(20, 1, 10, "Linear", 1).into(),
        Lesson::new(30, 1, 10, None, "Variables", 0).into(),
        Lesson::new(31, 1, 10, Some(20), "Slopes", 0).into(),
        Lesson::new(32, 1, 10, None, "Review", 2).into(),
        Lesson::new(33, 1, 11, None, "Angles", 0).into(),
        Lesson::new(34, 2, 12, None, "Forces", 0).into(),
    ])
}

/// REST backend on a random local port, backed by an in-memory store.
pub struct StubBackend {
    pub store: Arc<InMemoryApi>,
    pub base_url: String,
}

impl StubBackend {
    pub async fn spawn(store: InMemoryApi) -> Self {
        let store = Arc::new(store);
        let app = Router::new().nest("/api", routes(store.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            store,
            base_url: format!("http://{addr}/api"),
        }
    }

    pub fn client(&self) -> HttpApi {
        HttpApi::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    /// Planner over HTTP with every course loaded.
    pub async fn planner(&self, config: PlannerConfig) -> (PlannerService<HttpApi>, ToastQueue) {
        let toasts = ToastQueue::new();
        let mut service = PlannerService::new(self.client(), config, Arc::new(toasts.clone()));
        for course in service.load_courses().await.unwrap() {
            service
                .load_course(course.id())
                .await
                .unwrap();
        }
        (service, toasts)
    }

    /// Number of calls the store has served so far.
    pub fn served(&self) -> usize {
        self.store.calls().len()
    }
}

type Store = State<Arc<InMemoryApi>>;

fn routes(store: Arc<InMemoryApi>) -> Router {
    Router::new()
        .route("/{resource}", get(list).post(create))
        .route("/{resource}/{id}", get(fetch).put(update).delete(remove))
        .route(
            "/{resource}/{id}/{action}",
            get(special_days).put(save_special_day).post(relocate),
        )
        .with_state(store)
}

struct StubError(StatusCode, String);

impl From<ApiError> for StubError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::StatusError { status, message } => Self(
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            other => Self(StatusCode::BAD_REQUEST, other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StubError {
    fn from(value: serde_json::Error) -> Self {
        Self(StatusCode::UNPROCESSABLE_ENTITY, value.to_string())
    }
}

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

type StubResult = Result<Json<Value>, StubError>;

fn kind_of(resource: &str) -> Result<EntityKind, StubError> {
    EntityKind::ALL
        .into_iter()
        .find(|k| k.resource() == resource)
        .ok_or_else(|| StubError(StatusCode::NOT_FOUND, format!("no resource `{resource}`")))
}

fn to_json<T: serde::Serialize>(value: T) -> StubResult {
    Ok(Json(serde_json::to_value(value)?))
}

async fn list(
    State(store): Store,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> StubResult {
    let kind = kind_of(&resource)?;
    if kind == EntityKind::Course {
        return to_json(store.list_courses().await?);
    }

    let course_id: i64 = query
        .get("courseId")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| StubError(StatusCode::BAD_REQUEST, String::from("courseId is required")))?;
    let snapshot = store.load_course(course_id).await?;
    match kind {
        EntityKind::Topic => to_json(snapshot.topics),
        EntityKind::SubTopic => to_json(snapshot.sub_topics),
        _ => to_json(snapshot.lessons),
    }
}

async fn create(State(store): Store, Path(resource): Path<String>, Json(body): Json<Value>) -> StubResult {
    let draft = match kind_of(&resource)? {
        EntityKind::Course => EntityDraft::Course(serde_json::from_value(body)?),
        EntityKind::Topic => EntityDraft::Topic(serde_json::from_value(body)?),
        EntityKind::SubTopic => EntityDraft::SubTopic(serde_json::from_value(body)?),
        EntityKind::Lesson => EntityDraft::Lesson(serde_json::from_value(body)?),
    };
    to_json(store.create(&draft).await?)
}

async fn fetch(State(store): Store, Path((resource, id)): Path<(String, i64)>) -> StubResult {
    let key = NodeKey::new(kind_of(&resource)?, id);
    if key.kind == EntityKind::Course {
        return to_json(store.load_course(id).await?.course);
    }
    let entity = store
        .get(key)
        .ok_or_else(|| StubError(StatusCode::NOT_FOUND, format!("{key} not found")))?;
    to_json(entity)
}

async fn update(
    State(store): Store,
    Path((resource, _id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> StubResult {
    let entity = AnyEntity::from_value(kind_of(&resource)?, body)?;
    to_json(store.update(&entity).await?)
}

async fn remove(State(store): Store, Path((resource, id)): Path<(String, i64)>) -> Result<StatusCode, StubError> {
    store.delete(NodeKey::new(kind_of(&resource)?, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn relocate(
    State(store): Store,
    Path((_resource, _id, action)): Path<(String, i64, String)>,
    Json(body): Json<Value>,
) -> StubResult {
    match action.as_str() {
        "move" => {
            let request: MoveRequest = serde_json::from_value(body)?;
            to_json(store.move_entity(&request).await?)
        }
        "copy" => {
            let request: CopyRequest = serde_json::from_value(body)?;
            to_json(store.copy_entity(&request).await?)
        }
        other => Err(StubError(StatusCode::NOT_FOUND, format!("no action `{other}`"))),
    }
}

async fn special_days(State(store): Store, Path((_resource, id, _action)): Path<(String, i64, String)>) -> StubResult {
    to_json(store.special_days(id).await?)
}

async fn save_special_day(
    State(store): Store,
    Path((_resource, _id, _action)): Path<(String, i64, String)>,
    Json(day): Json<SpecialDay>,
) -> StubResult {
    to_json(store.save_special_day(&day).await?)
}
