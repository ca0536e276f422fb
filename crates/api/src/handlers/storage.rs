//! Informational storage access policies.
//!
//! Nothing here touches the database; the document describes the row-level
//! policies an operator applies to the object store's buckets by hand.

use axum::Json;
use serde::Serialize;
use verde_core::storage::{
    BUCKET_AVATARS, BUCKET_CONSTRUCTION_DOCS, BUCKET_ESG_REPORTS, BUCKET_PRECONSTRUCTION_DOCS,
    BUCKET_PROJECTS,
};

#[derive(Debug, Serialize)]
pub struct BucketPolicy {
    pub bucket: &'static str,
    pub public: bool,
    pub policies: Vec<PolicySql>,
}

#[derive(Debug, Serialize)]
pub struct PolicySql {
    pub name: &'static str,
    pub operation: &'static str,
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct PolicyDocument {
    pub buckets: Vec<BucketPolicy>,
    pub note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PolicyGuidance {
    pub success: bool,
    pub message: &'static str,
}

/// Policies for a bucket keyed by the uploader's user id.
fn owner_folder_policies(bucket: &'static str) -> Vec<PolicySql> {
    vec![
        PolicySql {
            name: "Public read",
            operation: "SELECT",
            sql: format!(
                "CREATE POLICY \"{bucket} public read\" ON storage.objects \
                 FOR SELECT USING (bucket_id = '{bucket}');"
            ),
        },
        PolicySql {
            name: "Owner write",
            operation: "INSERT",
            sql: format!(
                "CREATE POLICY \"{bucket} owner write\" ON storage.objects \
                 FOR INSERT WITH CHECK (bucket_id = '{bucket}' \
                 AND auth.uid()::text = (storage.foldername(name))[1]);"
            ),
        },
        PolicySql {
            name: "Owner delete",
            operation: "DELETE",
            sql: format!(
                "CREATE POLICY \"{bucket} owner delete\" ON storage.objects \
                 FOR DELETE USING (bucket_id = '{bucket}' \
                 AND auth.uid()::text = (storage.foldername(name))[1]);"
            ),
        },
    ]
}

/// Policies for a bucket keyed by project id, open to organization members.
fn project_folder_policies(bucket: &'static str) -> Vec<PolicySql> {
    let member_check = "EXISTS (SELECT 1 FROM public.projects p \
         JOIN public.organization_member m ON m.organization_id = p.organization_id \
         WHERE p.project_id::text = (storage.foldername(name))[1] \
         AND m.user_id = auth.uid())";
    ["SELECT", "INSERT", "DELETE"]
        .into_iter()
        .map(|operation| {
            let clause = if operation == "INSERT" {
                "WITH CHECK"
            } else {
                "USING"
            };
            PolicySql {
                name: "Project members",
                operation,
                sql: format!(
                    "CREATE POLICY \"{bucket} members {op}\" ON storage.objects \
                     FOR {operation} {clause} (bucket_id = '{bucket}' AND {member_check});",
                    op = operation.to_lowercase(),
                ),
            }
        })
        .collect()
}

pub fn policy_document() -> PolicyDocument {
    PolicyDocument {
        buckets: vec![
            BucketPolicy {
                bucket: BUCKET_AVATARS,
                public: true,
                policies: owner_folder_policies(BUCKET_AVATARS),
            },
            BucketPolicy {
                bucket: BUCKET_PROJECTS,
                public: false,
                policies: project_folder_policies(BUCKET_PROJECTS),
            },
            BucketPolicy {
                bucket: BUCKET_PRECONSTRUCTION_DOCS,
                public: false,
                policies: project_folder_policies(BUCKET_PRECONSTRUCTION_DOCS),
            },
            BucketPolicy {
                bucket: BUCKET_CONSTRUCTION_DOCS,
                public: false,
                policies: project_folder_policies(BUCKET_CONSTRUCTION_DOCS),
            },
            BucketPolicy {
                bucket: BUCKET_ESG_REPORTS,
                public: false,
                policies: project_folder_policies(BUCKET_ESG_REPORTS),
            },
        ],
        note: "Apply these statements in the storage provider's SQL editor. \
               This endpoint never changes the database.",
    }
}

// ---------------------------------------------------------------------------
// GET /storage/policies
// ---------------------------------------------------------------------------

pub async fn get_policies() -> Json<PolicyDocument> {
    Json(policy_document())
}

// ---------------------------------------------------------------------------
// POST /storage/policies
// ---------------------------------------------------------------------------

pub async fn apply_policies() -> Json<PolicyGuidance> {
    Json(PolicyGuidance {
        success: true,
        message: "Storage policies are not applied automatically. \
                  Fetch them with GET /api/storage/policies and run them in the SQL editor.",
    })
}
