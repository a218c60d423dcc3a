use graphql_client::GraphQLQuery;
use serde::{Deserialize, Serialize};

use crate::digest;

pub const DEFAULT_MIME_TYPE: &str = "text/plain";
/// Stand-in for a wrapped file key. Sent verbatim, never derived from key material.
pub const PLACEHOLDER_ENCRYPTED_KEY: &str = "dGVzdGtleQ==";

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "schema.gql",
    query_path = "src/graphql/upload_file_from_map.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone"
)]
pub struct UploadFileFromMap;

/// Everything the backend needs to store one file, flattened into a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileMetadata {
    pub filename: String,
    pub content_hash: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub encrypted_key: String,
    pub file_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataOptions {
    pub mime_type: String,
    pub encrypted_key: String,
    pub folder_id: Option<u64>,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            encrypted_key: PLACEHOLDER_ENCRYPTED_KEY.to_string(),
            folder_id: None,
        }
    }
}

impl FileMetadata {
    /// Size, hash and payload all come from the same `bytes`, so they always agree.
    pub fn from_bytes(filename: &str, bytes: &[u8], options: &MetadataOptions) -> Self {
        Self {
            filename: filename.to_string(),
            content_hash: digest::sha256_hex(bytes),
            size_bytes: bytes.len() as u64,
            mime_type: options.mime_type.clone(),
            encrypted_key: options.encrypted_key.clone(),
            file_data: digest::encode_base64(bytes),
            folder_id: options.folder_id,
        }
    }
}

/// Request body for the `UploadFileFromMap` mutation.
///
/// Only `query` and `variables` are emitted; the backend reads the operation
/// from the query text, so no `operationName` is sent.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequestDocument {
    pub query: &'static str,
    pub variables: upload_file_from_map::Variables,
}

impl UploadRequestDocument {
    pub fn new(metadata: &FileMetadata) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_string(metadata)?;

        Ok(Self {
            query: upload_file_from_map::QUERY,
            variables: upload_file_from_map::Variables {
                input: upload_file_from_map::UploadFileFromMapInput { data },
            },
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
