use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use wa_analysis::templates::{DEFAULT_AUDIENCE, DEFAULT_KIND};
use wa_core::job::{DEFAULT_MIN_READS, FALLBACK_KEYWORD};
use wa_core::{
    AnalysisRecord, ArticleId, ArticleQuery, Category, Error, HarvestRequest, TemplateRecord,
    WritingTemplate,
};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_TEMPLATE_USER: &str = "anonymous";
const DEFAULT_TEMPLATE_LIMIT: usize = 10;

type Params = Query<HashMap<String, String>>;

/// An absent or blank body reads as the all-defaults request.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

fn parse_param<T: std::str::FromStr>(params: &HashMap<String, String>, name: &str, default: T) -> ApiResult<T> {
    match params.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid value for {}: {}", name, raw))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct CollectBody {
    keywords: Option<Keywords>,
    category: Option<String>,
    min_reads: Option<u64>,
}

impl CollectBody {
    fn into_request(self) -> ApiResult<HarvestRequest> {
        let keywords = match self.keywords {
            None => vec![FALLBACK_KEYWORD.to_string()],
            Some(Keywords::One(keyword)) => vec![keyword],
            Some(Keywords::Many(keywords)) => keywords,
        };
        let category = match self.category {
            Some(raw) => raw.parse::<Category>()?,
            None => Category::All,
        };
        Ok(HarvestRequest::new(
            keywords,
            category,
            self.min_reads.unwrap_or(DEFAULT_MIN_READS),
        ))
    }
}

pub async fn collect_articles(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<Value>> {
    let request = parse_body::<CollectBody>(&body)?.into_request()?;
    let handle = state.queue.submit(request).await?;

    Ok(Json(json!({
        "status": "success",
        "task_id": handle.id,
        "message": "采集任务已启动",
    })))
}

pub async fn get_job(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let not_found = || ApiError::not_found(format!("Job {} not found", id));
    let job_id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let job = state.queue.status(&job_id).await.ok_or_else(not_found)?;

    Ok(Json(json!({ "status": "success", "data": job })))
}

pub async fn list_articles(State(state): State<Arc<AppState>>, Query(params): Params) -> ApiResult<Json<Value>> {
    let defaults = ArticleQuery::default();
    let query = ArticleQuery {
        category: match params.get("category") {
            Some(raw) => raw.parse()?,
            None => defaults.category,
        },
        limit: parse_param(&params, "limit", defaults.limit)?,
        offset: parse_param(&params, "offset", defaults.offset)?,
    };
    let page = state.storage.list_articles(&query).await?;

    Ok(Json(json!({
        "status": "success",
        "data": page.articles,
        "total": page.total,
        "limit": query.limit,
        "offset": query.offset,
    })))
}

pub async fn analyze_article(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let article_id = ArticleId::new(id);
    let article = state
        .storage
        .get_article(&article_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Article {}", article_id)))?;

    let content = if !article.content.is_empty() {
        article.content.clone()
    } else if !article.content_url.is_empty() {
        state.fetcher.fetch(&article.content_url).await
    } else {
        String::new()
    };

    let analysis = state.analyzer.analyze(&article.title, &content);
    let record = AnalysisRecord {
        article_id: article_id.clone(),
        analysis,
        analyze_time: Utc::now(),
    };
    state.storage.upsert_analysis(&record).await?;
    info!(article_id = %article_id, score = record.analysis.score, "Article analyzed");

    Ok(Json(json!({ "status": "success", "data": record.analysis })))
}

pub async fn get_analysis(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let article_id = ArticleId::new(id);
    let record = state
        .storage
        .get_analysis(&article_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Analysis for article {}", article_id)))?;

    Ok(Json(json!({ "status": "success", "data": record })))
}

#[derive(Debug, Default, Deserialize)]
struct TextBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

pub async fn analyze_text(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<Value>> {
    let TextBody { title, content } = parse_body(&body)?;
    if title.is_empty() && content.is_empty() {
        return Err(ApiError::bad_request("Title or content is required"));
    }

    let analysis = state.analyzer.analyze(&title, &content);
    Ok(Json(json!({ "status": "success", "data": analysis })))
}

#[derive(Debug, Default, Deserialize)]
struct TemplateBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    audience: Option<String>,
    keywords: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeneratedTemplate {
    #[serde(flatten)]
    template: WritingTemplate,
    template_id: String,
}

pub async fn generate_template(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<Value>> {
    let body: TemplateBody = parse_body(&body)?;
    let now = Utc::now();
    let template = state.templates.generate(
        body.kind.as_deref().unwrap_or(DEFAULT_KIND),
        body.audience.as_deref().unwrap_or(DEFAULT_AUDIENCE),
        body.keywords.as_deref().unwrap_or(""),
        now,
    );

    let record = TemplateRecord {
        id: Uuid::new_v4().to_string(),
        template,
        user_id: body.user_id.unwrap_or_else(|| DEFAULT_TEMPLATE_USER.to_string()),
        created_time: now,
    };
    state.storage.insert_template(&record).await?;

    let generated = GeneratedTemplate {
        template: record.template,
        template_id: record.id,
    };
    Ok(Json(json!({ "status": "success", "data": generated })))
}

pub async fn list_templates(State(state): State<Arc<AppState>>, Query(params): Params) -> ApiResult<Json<Value>> {
    let user_id = params
        .get("user_id")
        .map(String::as_str)
        .unwrap_or(DEFAULT_TEMPLATE_USER);
    let limit = parse_param(&params, "limit", DEFAULT_TEMPLATE_LIMIT)?;
    let templates = state.storage.list_templates(user_id, limit).await?;

    Ok(Json(json!({ "status": "success", "data": templates })))
}

pub async fn dashboard_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let stats = state.storage.dashboard_stats(Utc::now()).await?;
    Ok(Json(json!({ "status": "success", "data": stats })))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": state.version,
    }))
}
