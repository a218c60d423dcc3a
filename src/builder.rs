use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::RequestError,
    request::{FileMetadata, MetadataOptions, UploadRequestDocument},
};

pub const DEFAULT_INPUT_PATH: &str = "test_file.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "upload_request.json";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Name sent to the backend; defaults to the input's file name
    pub filename: Option<String>,
    pub metadata: MetadataOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            filename: None,
            metadata: MetadataOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub filename: String,
    pub size_bytes: u64,
    pub content_hash: String,
    pub mime_type: String,
    pub output: PathBuf,
    pub document_len: usize,
}

fn default_filename(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// Read the input file and write its `UploadFileFromMap` request body to `options.output`.
///
/// The document is fully assembled before the output is opened, so a missing
/// input never touches an existing output file. The write itself is not atomic.
pub fn build_request(options: &BuildOptions) -> Result<BuildOutcome, RequestError> {
    let content = fs::read(&options.input).map_err(|source| RequestError::InputRead {
        path: options.input.clone(),
        source,
    })?;

    let filename = options
        .filename
        .clone()
        .unwrap_or_else(|| default_filename(&options.input));

    let metadata = FileMetadata::from_bytes(&filename, &content, &options.metadata);
    let document = UploadRequestDocument::new(&metadata)?.to_json()?;

    fs::write(&options.output, &document).map_err(|source| RequestError::OutputWrite {
        path: options.output.clone(),
        source,
    })?;

    Ok(BuildOutcome {
        filename: metadata.filename,
        size_bytes: metadata.size_bytes,
        content_hash: metadata.content_hash,
        mime_type: metadata.mime_type,
        output: options.output.clone(),
        document_len: document.len(),
    })
}
