use crate::domain::model::{Encoding, SubmissionRequest};
use crate::utils::error::{CheckerError, Result};
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

pub const FILE_PART_NAME: &str = "script_file";
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const BASE64_PREVIEW_CHARS: usize = 48;

pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Everything the webhook learns about a submission besides the file itself.
/// Identical across encodings; only the placement differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub project_title: String,
    pub environment: String,
    pub user_email: String,
    pub filename: String,
    pub file_size: String,
    pub mime_type: String,
}

impl SubmissionMetadata {
    pub fn from_request(request: &SubmissionRequest) -> Self {
        let mime_type = if request.mime_type.is_empty() {
            FALLBACK_MIME_TYPE.to_string()
        } else {
            request.mime_type.clone()
        };

        Self {
            project_title: request.project_title.clone(),
            environment: request.environment.as_str().to_string(),
            user_email: request.user_email.clone(),
            filename: request.file_name.clone(),
            file_size: request.file_bytes.len().to_string(),
            mime_type,
        }
    }

    /// Form field names, in the order they are sent.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("project_title", &self.project_title),
            ("environment", &self.environment),
            ("user_email", &self.user_email),
            ("filename", &self.filename),
            ("file_size", &self.file_size),
            ("mime_type", &self.mime_type),
        ]
    }

    /// Header names used by the raw-binary encoding. The MIME type travels
    /// as `Content-Type` instead.
    pub fn headers(&self) -> [(&'static str, &str); 5] {
        [
            ("x-project-title", &self.project_title),
            ("x-environment", &self.environment),
            ("x-user-email", &self.user_email),
            ("x-filename", &self.filename),
            ("x-file-size", &self.file_size),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEnvelope {
    #[serde(flatten)]
    pub metadata: SubmissionMetadata,
    pub file_data: String,
    pub encoding: String,
}

pub enum RequestBody {
    Multipart(Form),
    Json(JsonEnvelope),
    Raw { headers: HeaderMap, bytes: Vec<u8> },
}

impl RequestBody {
    pub fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            RequestBody::Multipart(form) => builder.multipart(form),
            RequestBody::Json(envelope) => builder.json(&envelope),
            RequestBody::Raw { headers, bytes } => builder.headers(headers).body(bytes),
        }
    }
}

pub fn encode(request: &SubmissionRequest) -> Result<RequestBody> {
    let metadata = SubmissionMetadata::from_request(request);

    match request.encoding {
        Encoding::Multipart => {
            let part = Part::bytes(request.file_bytes.clone())
                .file_name(metadata.filename.clone())
                .mime_str(&metadata.mime_type)?;
            let form = metadata
                .fields()
                .into_iter()
                .fold(Form::new(), |form, (name, value)| {
                    form.text(name, value.to_string())
                })
                .part(FILE_PART_NAME, part);
            Ok(RequestBody::Multipart(form))
        }
        Encoding::JsonBase64 => Ok(RequestBody::Json(JsonEnvelope {
            file_data: general_purpose::STANDARD.encode(&request.file_bytes),
            encoding: "base64".to_string(),
            metadata,
        })),
        Encoding::RawBinary => {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, header_value("content-type", &metadata.mime_type)?);
            for (name, value) in metadata.headers() {
                headers.insert(HeaderName::from_static(name), header_value(name, value)?);
            }
            Ok(RequestBody::Raw {
                headers,
                bytes: request.file_bytes.clone(),
            })
        }
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| CheckerError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Human-readable preview of what `encode` would send.
pub fn describe(request: &SubmissionRequest) -> String {
    let metadata = SubmissionMetadata::from_request(request);
    let mut lines = Vec::new();

    match request.encoding {
        Encoding::Multipart => {
            lines.push("# Multipart form data".to_string());
            lines.push(format!(
                "{}: (\"{}\", {} bytes, \"{}\")",
                FILE_PART_NAME, metadata.filename, metadata.file_size, metadata.mime_type
            ));
            for (name, value) in metadata.fields() {
                lines.push(format!("{}: \"{}\"", name, value));
            }
        }
        Encoding::JsonBase64 => {
            lines.push("# JSON body (application/json)".to_string());
            for (name, value) in metadata.fields() {
                lines.push(format!("{}: \"{}\"", name, value));
            }
            let encoded = general_purpose::STANDARD.encode(&request.file_bytes);
            let preview: String = encoded.chars().take(BASE64_PREVIEW_CHARS).collect();
            let ellipsis = if encoded.len() > BASE64_PREVIEW_CHARS { "..." } else { "" };
            lines.push(format!(
                "file_data: \"{}{}\" ({} chars)",
                preview,
                ellipsis,
                encoded.len()
            ));
            lines.push("encoding: \"base64\"".to_string());
        }
        Encoding::RawBinary => {
            lines.push(format!("# Raw body: {} bytes", metadata.file_size));
            lines.push(format!("Content-Type: {}", metadata.mime_type));
            for (name, value) in metadata.headers() {
                lines.push(format!("{}: {}", name, value));
            }
        }
    }

    lines.join("\n")
}
