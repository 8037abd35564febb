//! Blocking HTTP transport
//!
//! One trait method per request so the protocol logic above it can be
//! exercised with scripted responses instead of a live server.

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, already serialized.
    pub body: Option<String>,
    /// Full `Authorization` header value.
    pub authorization: String,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Server status description, used verbatim in error messages.
    pub status_text: String,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Issues one blocking request. Transport-level failures only; status
/// classification belongs to the caller, which knows the endpoint.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<T: Transport> Transport for &T {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request)
    }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        builder = builder
            .header(reqwest::header::AUTHORIZATION, request.authorization.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status();
        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            body: response.text()?,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::Error;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Hands out scripted responses in order and records every request.
    pub(crate) struct FakeTransport {
        responses: RefCell<VecDeque<ApiResponse>>,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        pub(crate) fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn ok(body: impl Into<String>) -> ApiResponse {
            ApiResponse {
                status: 200,
                status_text: "OK".to_string(),
                body: body.into(),
            }
        }

        pub(crate) fn status(status: u16, status_text: &str) -> ApiResponse {
            ApiResponse {
                status,
                status_text: status_text.to_string(),
                body: String::new(),
            }
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| Error::Api("no scripted response left".to_string()))
        }
    }
}
