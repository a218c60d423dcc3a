use std::{fs, path::Path};

use serde_json::{Map, Value};

use crate::{
    digest,
    error::RequestError,
    request::{FileMetadata, upload_file_from_map},
};

/// A request document whose payload agrees with its declared size and hash.
#[derive(Debug, Clone)]
pub struct VerifiedRequest {
    pub metadata: FileMetadata,
}

impl VerifiedRequest {
    /// Metadata as JSON with `file_data` dropped, for display.
    pub fn preview(&self) -> Result<Value, RequestError> {
        let mut value = serde_json::to_value(&self.metadata)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("file_data");
        }
        Ok(value)
    }
}

fn expect_keys<'a>(
    value: &'a Value,
    expected: &[&str],
    location: &str,
) -> Result<&'a Map<String, Value>, RequestError> {
    let object = value
        .as_object()
        .ok_or_else(|| RequestError::MalformedDocument(format!("{location} is not an object")))?;

    let mut actual: Vec<&str> = object.keys().map(String::as_str).collect();
    actual.sort_unstable();
    let mut wanted = expected.to_vec();
    wanted.sort_unstable();

    if actual != wanted {
        return Err(RequestError::MalformedDocument(format!(
            "{location} has keys {actual:?}, expected {wanted:?}"
        )));
    }
    Ok(object)
}

pub fn verify_document(document: &str) -> Result<VerifiedRequest, RequestError> {
    let root: Value = serde_json::from_str(document)?;
    let root = expect_keys(&root, &["query", "variables"], "document")?;

    let query = root["query"]
        .as_str()
        .ok_or_else(|| RequestError::MalformedDocument("query is not a string".to_string()))?;
    if query.trim() != upload_file_from_map::QUERY.trim() {
        return Err(RequestError::UnexpectedQuery(query.to_string()));
    }

    let variables = expect_keys(&root["variables"], &["input"], "variables")?;
    let input = expect_keys(&variables["input"], &["data"], "variables.input")?;
    let data = input["data"].as_str().ok_or_else(|| {
        RequestError::MalformedDocument("variables.input.data is not a string".to_string())
    })?;

    let metadata: FileMetadata = serde_json::from_str(data)?;

    let decoded = digest::decode_base64(&metadata.file_data)?;
    let actual_size = decoded.len() as u64;
    if actual_size != metadata.size_bytes {
        return Err(RequestError::SizeMismatch {
            declared: metadata.size_bytes,
            actual: actual_size,
        });
    }

    let actual_hash = digest::sha256_hex(&decoded);
    if actual_hash != metadata.content_hash {
        return Err(RequestError::HashMismatch {
            declared: metadata.content_hash.clone(),
            actual: actual_hash,
        });
    }

    Ok(VerifiedRequest { metadata })
}

pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<VerifiedRequest, RequestError> {
    let path = path.as_ref();
    let document = fs::read_to_string(path).map_err(|source| RequestError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    verify_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MetadataOptions, UploadRequestDocument};
    use serde_json::json;

    fn document_for(bytes: &[u8]) -> String {
        let metadata = FileMetadata::from_bytes("test_file.txt", bytes, &MetadataOptions::default());
        UploadRequestDocument::new(&metadata)
            .unwrap()
            .to_json()
            .unwrap()
    }

    fn document_with_data(data: Value) -> String {
        json!({
            "query": upload_file_from_map::QUERY,
            "variables": { "input": { "data": data.to_string() } }
        })
        .to_string()
    }

    #[test]
    fn test_accepts_built_document() {
        let verified = verify_document(&document_for(b"hello")).unwrap();
        assert_eq!(verified.metadata.size_bytes, 5);
        assert_eq!(verified.metadata.filename, "test_file.txt");
    }

    #[test]
    fn test_accepts_empty_payload() {
        let verified = verify_document(&document_for(b"")).unwrap();
        assert_eq!(verified.metadata.size_bytes, 0);
    }

    #[test]
    fn test_rejects_extra_top_level_key() {
        let mut document: Value = serde_json::from_str(&document_for(b"hello")).unwrap();
        document["operationName"] = json!("UploadFileFromMap");

        let err = verify_document(&document.to_string()).unwrap_err();
        assert!(matches!(err, RequestError::MalformedDocument(_)));
    }

    #[test]
    fn test_rejects_other_mutation() {
        let mut document: Value = serde_json::from_str(&document_for(b"hello")).unwrap();
        document["query"] = json!("mutation Other { other }");

        let err = verify_document(&document.to_string()).unwrap_err();
        assert!(matches!(err, RequestError::UnexpectedQuery(_)));
    }

    #[test]
    fn test_rejects_non_string_data() {
        let document = json!({
            "query": upload_file_from_map::QUERY,
            "variables": { "input": { "data": { "filename": "a" } } }
        });

        let err = verify_document(&document.to_string()).unwrap_err();
        assert!(matches!(err, RequestError::MalformedDocument(_)));
    }

    #[test]
    fn test_rejects_missing_metadata_key() {
        let data = json!({
            "filename": "a.txt",
            "content_hash": digest::sha256_hex(b"hello"),
            "size_bytes": 5,
            "mime_type": "text/plain",
            "file_data": "aGVsbG8="
        });

        let err = verify_document(&document_with_data(data)).unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let data = json!({
            "filename": "a.txt",
            "content_hash": digest::sha256_hex(b"hello"),
            "size_bytes": 6,
            "mime_type": "text/plain",
            "encrypted_key": "dGVzdGtleQ==",
            "file_data": "aGVsbG8="
        });

        let err = verify_document(&document_with_data(data)).unwrap_err();
        assert!(matches!(
            err,
            RequestError::SizeMismatch {
                declared: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_rejects_hash_mismatch() {
        let data = json!({
            "filename": "a.txt",
            "content_hash": digest::sha256_hex(b"world"),
            "size_bytes": 5,
            "mime_type": "text/plain",
            "encrypted_key": "dGVzdGtleQ==",
            "file_data": "aGVsbG8="
        });

        let err = verify_document(&document_with_data(data)).unwrap_err();
        assert!(matches!(err, RequestError::HashMismatch { .. }));
    }

    #[test]
    fn test_rejects_bad_base64() {
        let data = json!({
            "filename": "a.txt",
            "content_hash": digest::sha256_hex(b"hello"),
            "size_bytes": 5,
            "mime_type": "text/plain",
            "encrypted_key": "dGVzdGtleQ==",
            "file_data": "###"
        });

        let err = verify_document(&document_with_data(data)).unwrap_err();
        assert!(matches!(err, RequestError::Base64(_)));
    }

    #[test]
    fn test_preview_drops_payload() {
        let verified = verify_document(&document_for(b"hello")).unwrap();
        let preview = verified.preview().unwrap();

        assert!(preview.get("file_data").is_none());
        assert_eq!(preview["size_bytes"], 5);
        assert_eq!(preview["encrypted_key"], "dGVzdGtleQ==");
    }

    #[test]
    fn test_verify_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_file(dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}
