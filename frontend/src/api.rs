//! 类型化 REST 客户端
//!
//! 每个端点的路径、方法与响应类型都由 `churchhub_shared::protocol::ApiRequest` 描述，
//! 这里只负责拼接 URL、附加令牌、编码请求体与解码响应。

use churchhub_shared::HEADER_AUTHORIZATION;
use churchhub_shared::UPLOAD_FIELD_NAME;
use churchhub_shared::protocol::{ApiRequest, HttpMethod, UPLOAD_IMAGE_PATH, UploadResponse};
use serde::de::DeserializeOwned;

use crate::error::{AdminError, AdminResult};
use crate::web::http::{HttpClient, HttpRequest, HttpResponse, UploadFile};

pub struct ChurchHubApi<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> ChurchHubApi<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    #[cfg(test)]
    pub(crate) fn client_for_tests(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(req: HttpRequest, token: Option<&str>) -> HttpRequest {
        match token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}")),
            None => req,
        }
    }

    /// 发送类型化请求
    ///
    /// GET/DELETE 不携带请求体；2xx 空响应体按 `{}` 解码。
    pub async fn call<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> AdminResult<R::Response> {
        let path = req.path();
        let url = self.url(&path);
        let mut http = Self::authorize(HttpRequest::new(&url, R::METHOD), token);
        if R::METHOD.has_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| AdminError::decode(e.to_string()).in_op_with("api.encode", &path))?;
            http = http.with_json(body);
        }

        let response = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.call", format!("{} {}", R::METHOD.as_str(), path)))?;

        decode_response(response)
            .map_err(|e| e.in_op_with("api.call", format!("{} {}", R::METHOD.as_str(), path)))
    }

    /// 上传图片（multipart，字段名 `image`）
    pub async fn upload_image(&self, file: UploadFile, token: Option<&str>) -> AdminResult<UploadResponse> {
        let url = self.url(UPLOAD_IMAGE_PATH);
        let http = Self::authorize(HttpRequest::new(&url, HttpMethod::Post), token)
            .with_file(UPLOAD_FIELD_NAME, file);

        let response = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op("api.upload_image"))?;

        decode_response(response).map_err(|e| e.in_op("api.upload_image"))
    }
}

fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> AdminResult<T> {
    if !response.ok() {
        return Err(AdminError::from_response(response.status, &response.body));
    }
    let body = match response.body.trim() {
        "" => "{}",
        body => body,
    };
    Ok(serde_json::from_str(body)?)
}
