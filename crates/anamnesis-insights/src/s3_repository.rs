use aws_sdk_s3::Client as S3Client;

use anamnesis_core::keys;
use anamnesis_core::models::insight::Insight;
use anamnesis_storage::error::StorageError;
use anamnesis_storage::json;

use crate::error::RepositoryError;
use crate::repository::InsightRepository;
use crate::BoxFuture;

/// Insight rows stored as JSON objects in S3.
///
/// The per-session object is authoritative and created with a conditional
/// write, which is the uniqueness constraint on `(tenant_id, session_id)`.
/// A second object keyed by answers hash serves reuse lookups; it is
/// overwritten by each new insight with that hash.
pub struct S3InsightRepository {
    pub s3: S3Client,
    pub bucket: String,
}

impl S3InsightRepository {
    pub fn new(s3: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
        }
    }
}

impl InsightRepository for S3InsightRepository {
    fn find_by_session<'a>(
        &'a self,
        tenant_id: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>> {
        Box::pin(async move {
            let key = keys::session_insight(tenant_id, session_id);
            Ok(json::load_json(&self.s3, &self.bucket, &key).await?)
        })
    }

    fn find_by_hash<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>> {
        Box::pin(async move {
            let key = keys::hashed_insight(tenant_id, answers_hash);
            Ok(json::load_json(&self.s3, &self.bucket, &key).await?)
        })
    }

    fn create<'a>(&'a self, insight: &'a Insight) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            let key = keys::session_insight(&insight.tenant_id, &insight.session_id);
            match json::create_json(&self.s3, &self.bucket, &key, insight).await {
                Ok(_) => {}
                Err(StorageError::AlreadyExists { .. }) => {
                    return Err(RepositoryError::Conflict {
                        tenant_id: insight.tenant_id.clone(),
                        session_id: insight.session_id.clone(),
                    });
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(hash) = &insight.answers_hash {
                let hash_key = keys::hashed_insight(&insight.tenant_id, hash);
                // The session object is already durable; a missing hash entry
                // only costs a future reuse.
                if let Err(e) = json::save_json(&self.s3, &self.bucket, &hash_key, insight).await {
                    tracing::warn!(
                        error = %e,
                        key = %hash_key,
                        "failed to write answers-hash index entry"
                    );
                }
            }

            Ok(())
        })
    }
}
