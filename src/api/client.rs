use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::api::dto::ErrorResponse;
use crate::api::{ApiError, ApiResult, CopyRequest, CurriculumApi, MoveRequest, SpecialDay};
use crate::config::ApiConfig;
use crate::model::entity::{AnyEntity, Course, CourseSnapshot, EntityDraft, Lesson, SubTopic, Topic};
use crate::model::{EntityKind, NodeKey};

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client, // cloning is cheap, the client is an Arc<> inside
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config.base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn entity_url(&self, key: NodeKey) -> String {
        self.url(&format!("{}/{}", key.kind.resource(), key.id))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        trace!("{} {}", status, response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        debug!("backend rejected request with {}: {}", status, message);
        Err(ApiError::StatusError { status, message })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn fetch_entity(&self, kind: EntityKind, request: RequestBuilder) -> ApiResult<AnyEntity> {
        let value: serde_json::Value = self.fetch(request).await?;
        Ok(AnyEntity::from_value(kind, value)?)
    }
}

#[async_trait]
impl CurriculumApi for HttpApi {
    #[tracing::instrument(skip(self))]
    async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        self.fetch(self.client.get(self.url("courses"))).await
    }

    #[tracing::instrument(skip(self))]
    async fn load_course(&self, course_id: i64) -> ApiResult<CourseSnapshot> {
        let course: Course = self
            .fetch(self.client.get(self.entity_url(NodeKey::course(course_id))))
            .await?;
        let topics: Vec<Topic> = self
            .fetch(self.client.get(self.url(&format!("topics?courseId={course_id}"))))
            .await?;
        let sub_topics: Vec<SubTopic> = self
            .fetch(self.client.get(self.url(&format!("subtopics?courseId={course_id}"))))
            .await?;
        let lessons: Vec<Lesson> = self
            .fetch(self.client.get(self.url(&format!("lessons?courseId={course_id}"))))
            .await?;

        Ok(CourseSnapshot {
            course: Some(course),
            topics,
            sub_topics,
            lessons,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, draft: &EntityDraft) -> ApiResult<AnyEntity> {
        let kind = draft.kind();
        self.fetch_entity(kind, self.client.post(self.url(kind.resource())).json(draft))
            .await
    }

    #[tracing::instrument(skip(self), fields(key = %entity.key()))]
    async fn update(&self, entity: &AnyEntity) -> ApiResult<AnyEntity> {
        self.fetch_entity(
            entity.kind(),
            self.client.put(self.entity_url(entity.key())).json(entity),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: NodeKey) -> ApiResult<()> {
        self.send(self.client.delete(self.entity_url(key))).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn move_entity(&self, request: &MoveRequest) -> ApiResult<AnyEntity> {
        let url = format!("{}/move", self.entity_url(request.source()));
        self.fetch_entity(request.entity_type, self.client.post(url).json(request))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn copy_entity(&self, request: &CopyRequest) -> ApiResult<AnyEntity> {
        let url = format!("{}/copy", self.entity_url(request.source()));
        self.fetch_entity(request.entity_type, self.client.post(url).json(request))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn special_days(&self, course_id: i64) -> ApiResult<Vec<SpecialDay>> {
        let url = format!("{}/special-days", self.entity_url(NodeKey::course(course_id)));
        self.fetch(self.client.get(url)).await
    }

    #[tracing::instrument(skip(self))]
    async fn save_special_day(&self, day: &SpecialDay) -> ApiResult<SpecialDay> {
        let url = format!("{}/special-days", self.entity_url(NodeKey::course(day.course_id)));
        self.fetch(self.client.put(url).json(day)).await
    }
}
