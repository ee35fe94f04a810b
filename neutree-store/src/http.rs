//! Production [`ResourceStore`] implementation talking to a PostgREST-style
//! HTTP API (spec.md §6): `(id, api_version, kind, spec, metadata, status)`
//! rows, column-path filters, partial merge updates.

use async_trait::async_trait;
use neutree_core::{Object, ObjectId, ObjectMeta, ObjectRef, ResourceKind};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::auth::ServiceTokenSigner;
use crate::error::StoreError;
use crate::filter::Filter;
use crate::store::ResourceStore;

/// The wire shape of a single row, matching spec.md §6's column layout.
#[derive(Debug, Serialize, Deserialize)]
struct Row<Spec, Status> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    api_version: String,
    kind: ResourceKind,
    metadata: ObjectMeta,
    spec: Spec,
    status: Status,
}

impl<Spec, Status> Row<Spec, Status> {
    fn into_object(self) -> Result<Object<Spec, Status>, StoreError> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Decode("row missing id".to_string()))?;
        Ok(Object {
            id,
            api_version: self.api_version,
            kind: self.kind,
            metadata: self.metadata,
            spec: self.spec,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
struct StatusPatch<'a, Status> {
    status: &'a Status,
}

#[derive(Debug, Serialize)]
struct SpecPatch<'a, Spec> {
    spec: &'a Spec,
}

#[derive(Debug, Serialize)]
struct DeletionPatch {
    metadata: DeletionPatchMeta,
}

#[derive(Debug, Serialize)]
struct DeletionPatchMeta {
    deletion_timestamp: chrono::DateTime<chrono::Utc>,
}

pub struct HttpStore<Spec, Status> {
    http: reqwest::Client,
    base_url: String,
    kind: ResourceKind,
    signer: ServiceTokenSigner,
    api_version: String,
    _marker: std::marker::PhantomData<fn() -> (Spec, Status)>,
}

impl<Spec, Status> HttpStore<Spec, Status>
where
    Spec: Serialize + DeserializeOwned + Send + Sync + Clone,
    Status: Serialize + DeserializeOwned + Send + Sync + Clone + Default,
{
    pub fn new(
        base_url: impl Into<String>,
        kind: ResourceKind,
        api_version: impl Into<String>,
        jwt_secret: &str,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            kind,
            signer: ServiceTokenSigner::new(jwt_secret),
            api_version: api_version.into(),
            _marker: std::marker::PhantomData,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.kind.table_name())
    }

    async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, StoreError> {
        let token = self.signer.sign()?;
        Ok(builder.bearer_auth(token))
    }

    fn key_filters(key: &ObjectRef) -> Vec<Filter> {
        let mut filters = vec![Filter::name_eq(&key.name)];
        if let Some(ws) = &key.workspace {
            filters.push(Filter::workspace_eq(ws));
        }
        filters
    }

    async fn map_status_error(resp: reqwest::Response) -> StoreError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return StoreError::NotFound;
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return StoreError::Policy(body);
        }
        if status.is_client_error() {
            if let Some(code) = extract_error_code(&body) {
                return StoreError::Validation(code, body);
            }
            if body.contains("cannot delete") || body.contains("referenc") {
                return StoreError::Referential(body);
            }
            return StoreError::Policy(body);
        }
        StoreError::Transport(format!("{status}: {body}"))
    }
}

fn extract_error_code(body: &str) -> Option<neutree_core::ErrorCode> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("code")?.as_str()?.parse::<u32>().ok())
        .map(neutree_core::ErrorCode)
}

#[async_trait]
impl<Spec, Status> ResourceStore<Spec, Status> for HttpStore<Spec, Status>
where
    Spec: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
    Status: Serialize + DeserializeOwned + Send + Sync + Clone + Default + 'static,
{
    #[instrument(skip(self), fields(kind = ?self.kind, name = %key.name))]
    async fn get(&self, key: &ObjectRef) -> Result<Object<Spec, Status>, StoreError> {
        let mut req = self
            .http
            .get(self.table_url())
            .header("Accept", "application/vnd.pgrst.object+json");
        for (k, v) in Self::key_filters(key).iter().map(Filter::to_query_pair) {
            req = req.query(&[(k, v)]);
        }
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        let row: Row<Spec, Status> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!("fetched object");
        row.into_object()
    }

    #[instrument(skip(self), fields(kind = ?self.kind, workspace = ?workspace))]
    async fn list(&self, workspace: Option<&str>) -> Result<Vec<Object<Spec, Status>>, StoreError> {
        let mut req = self.http.get(self.table_url());
        if let Some(ws) = workspace {
            let (k, v) = Filter::workspace_eq(ws).to_query_pair();
            req = req.query(&[(k, v)]);
        }
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        let rows: Vec<Row<Spec, Status>> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.into_iter().map(Row::into_object).collect()
    }

    async fn create(&self, metadata: ObjectMeta, spec: Spec) -> Result<Object<Spec, Status>, StoreError> {
        let row = Row {
            id: None,
            api_version: self.api_version.clone(),
            kind: self.kind,
            metadata,
            spec,
            status: Status::default(),
        };
        let req = self
            .http
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&row);
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        let mut created: Vec<Row<Spec, Status>> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        created
            .pop()
            .ok_or_else(|| StoreError::Decode("empty create response".to_string()))?
            .into_object()
    }

    async fn soft_delete(&self, id: &ObjectId) -> Result<(), StoreError> {
        let patch = DeletionPatch {
            metadata: DeletionPatchMeta {
                deletion_timestamp: neutree_core::time::rfc3339_now(),
            },
        };
        let (k, v) = id_filter(id);
        let req = self
            .http
            .patch(self.table_url())
            .query(&[(k, v)])
            .json(&patch);
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        Ok(())
    }

    #[instrument(skip(self, status), fields(kind = ?self.kind))]
    async fn update_status(&self, id: &ObjectId, status: Status) -> Result<(), StoreError> {
        let patch = StatusPatch { status: &status };
        let (k, v) = id_filter(id);
        let req = self
            .http
            .patch(self.table_url())
            .query(&[(k, v)])
            .json(&patch);
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        Ok(())
    }

    async fn update_spec(&self, id: &ObjectId, spec: Spec) -> Result<(), StoreError> {
        let patch = SpecPatch { spec: &spec };
        let (k, v) = id_filter(id);
        let req = self
            .http
            .patch(self.table_url())
            .query(&[(k, v)])
            .json(&patch);
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::map_status_error(resp).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), StoreError> {
        let (k, v) = id_filter(id);
        let req = self.http.delete(self.table_url()).query(&[(k, v)]);
        let req = self.authed(req).await?;
        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !resp.status().is_success() && resp.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(Self::map_status_error(resp).await);
        }
        Ok(())
    }
}

fn id_filter(id: &ObjectId) -> (String, String) {
    ("id".to_string(), format!("eq.{id}"))
}
