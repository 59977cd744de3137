//! HTTP 传输层
//!
//! `HttpClient` 是唯一的网络接缝：浏览器中使用 `FetchClient`（基于 `gloo-net`），
//! 测试中使用 `MockHttpClient`。

use std::collections::BTreeMap;

use churchhub_shared::protocol::HttpMethod;

use crate::error::{AdminError, AdminResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 上传文件
// =========================================================

/// 文件内容来源
#[derive(Debug, Clone)]
pub enum FileSource {
    /// `<input type="file">` 选中的文件
    Browser(web_sys::File),
    /// 内存中的字节
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    /// MIME 类型，如 "image/png"；浏览器无法识别时为空串
    pub media_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl UploadFile {
    pub fn from_browser(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            media_type: file.type_(),
            size: file.size() as u64,
            source: FileSource::Browser(file),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }
}

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone)]
pub enum HttpBody {
    Json(String),
    /// 单文件 multipart 表单
    Multipart { field: String, file: UploadFile },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(HttpBody::Json(body));
        self
    }

    /// multipart 请求不设置 Content-Type，由浏览器生成 boundary
    pub fn with_file(mut self, field: &str, file: UploadFile) -> Self {
        self.body = Some(HttpBody::Multipart {
            field: field.to_string(),
            file,
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 只有请求未能完成时才返回 Err（`AdminErrorKind::Network`），
/// 任何 HTTP 状态码都作为 `Ok(HttpResponse)` 返回。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> AdminResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn builder(req: &HttpRequest) -> gloo_net::http::RequestBuilder {
        let mut builder = match req.method {
            HttpMethod::Get => gloo_net::http::Request::get(&req.url),
            HttpMethod::Post => gloo_net::http::Request::post(&req.url),
            HttpMethod::Put => gloo_net::http::Request::put(&req.url),
            HttpMethod::Delete => gloo_net::http::Request::delete(&req.url),
        };
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn form_data(field: &str, file: &UploadFile) -> AdminResult<web_sys::FormData> {
        let js_err = |e: wasm_bindgen::JsValue| {
            AdminError::network(format!("{:?}", e)).in_op("http.form_data")
        };

        let form = web_sys::FormData::new().map_err(js_err)?;
        match &file.source {
            FileSource::Browser(f) => {
                form.append_with_blob_and_filename(field, f, &file.name)
                    .map_err(js_err)?;
            }
            FileSource::Bytes(bytes) => {
                let parts = js_sys::Array::new();
                parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(&file.media_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                    .map_err(js_err)?;
                form.append_with_blob_and_filename(field, &blob, &file.name)
                    .map_err(js_err)?;
            }
        }
        Ok(form)
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> AdminResult<HttpResponse> {
        let builder = Self::builder(&req);
        let request = match &req.body {
            None => builder.build(),
            Some(HttpBody::Json(body)) => builder.body(body.clone()),
            Some(HttpBody::Multipart { field, file }) => {
                builder.body(Self::form_data(field, file)?)
            }
        }
        .map_err(|e| AdminError::network(e.to_string()).in_op_with("http.build", &req.url))?;

        let response = request
            .send()
            .await
            .map_err(|e| AdminError::network(e.to_string()).in_op_with("http.send", &req.url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdminError::network(e.to_string()).in_op_with("http.read", &req.url))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 记录下来的请求
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    /// JSON 请求体
    pub body: Option<String>,
    /// multipart 请求的 (字段名, 文件名)
    pub multipart: Option<(String, String)>,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .map(|b| serde_json::from_str(b).unwrap())
            .unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
enum MockReply {
    Respond(u16, String),
    NetworkFailure,
}

#[cfg(test)]
pub struct MockHttpClient {
    // ((Method, URL), Reply)
    responses: RefCell<HashMap<(HttpMethod, String), MockReply>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().insert(
            (method, url.to_string()),
            MockReply::Respond(status, body.to_string()),
        );
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses.borrow_mut().insert(
            (method, url.to_string()),
            MockReply::Respond(status, body.to_string()),
        );
    }

    pub fn mock_network_failure(&self, method: HttpMethod, url: &str) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), MockReply::NetworkFailure);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> AdminResult<HttpResponse> {
        let (body, multipart) = match &req.body {
            None => (None, None),
            Some(HttpBody::Json(b)) => (Some(b.clone()), None),
            Some(HttpBody::Multipart { field, file }) => {
                (None, Some((field.clone(), file.name.clone())))
            }
        };
        self.requests.borrow_mut().push(RecordedRequest {
            url: req.url.clone(),
            method: req.method,
            headers: req.headers.clone(),
            body,
            multipart,
        });

        // 让出一次，模拟真实的异步边界
        tokio::task::yield_now().await;

        let responses = self.responses.borrow();
        match responses.get(&(req.method, req.url.clone())) {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(MockReply::NetworkFailure) => {
                Err(AdminError::network("Failed to fetch").in_op_with("http.send", &req.url))
            }
            None => Ok(HttpResponse {
                status: 404,
                body: r#"{"error": "Not Found"}"#.to_string(),
            }),
        }
    }
}
