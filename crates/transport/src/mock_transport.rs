//! Mock HTTP 传输层
//!
//! 用于单元测试的 mock 实现，支持脚本化响应与注入失败场景。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tracing::instrument;

use crate::client::{HttpTransport, TransportRequest, TransportResponse};
use crate::error::{Result, TransportError};

/// 单次调用的预设结果
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// 返回响应
    Respond(TransportResponse),
    /// 返回传输层错误
    Fail(TransportError),
}

#[derive(Debug)]
struct MockState {
    /// 按顺序消费的预设结果
    script: VecDeque<MockOutcome>,
    /// 脚本耗尽后的默认结果
    fallback: MockOutcome,
    /// 已收到的请求
    requests: Vec<TransportRequest>,
    /// 每次调用的模拟耗时
    latency: Option<Duration>,
}

/// Mock HTTP 传输层
///
/// Clone 共享同一份状态，测试可以在移交给 dispatcher 后继续检查请求。
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// 创建默认 mock：总是返回 200 `{}`
    pub fn new() -> Self {
        Self::with_fallback(MockOutcome::Respond(TransportResponse::new(200, "{}")))
    }

    /// 使用指定默认结果创建
    pub fn with_fallback(fallback: MockOutcome) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                fallback,
                requests: Vec::new(),
                latency: None,
            })),
        }
    }

    /// 总是返回同一个 JSON 响应
    pub fn always_json(status: u16, body: Value) -> Self {
        Self::with_fallback(MockOutcome::Respond(TransportResponse::json(status, &body)))
    }

    /// 总是失败
    pub fn always_fail(error: TransportError) -> Self {
        Self::with_fallback(MockOutcome::Fail(error))
    }

    /// 追加一个 JSON 响应
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(MockOutcome::Respond(TransportResponse::json(status, &body)))
    }

    /// 追加一个原始文本响应
    pub fn push_raw(&self, status: u16, body: &str) -> &Self {
        self.push(MockOutcome::Respond(TransportResponse::new(
            status,
            body.to_string(),
        )))
    }

    /// 追加一次失败
    pub fn push_failure(&self, error: TransportError) -> &Self {
        self.push(MockOutcome::Fail(error))
    }

    /// 设置每次调用的模拟耗时
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }

    /// 获取已收到的请求
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.lock().requests.clone()
    }

    /// 获取请求数量
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// 最近一次请求
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.lock().requests.last().cloned()
    }

    fn push(&self, outcome: MockOutcome) -> &Self {
        self.lock().script.push_back(outcome);
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // 状态只含纯数据，poison 后继续使用是安全的
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_outcome(&self, request: TransportRequest) -> (MockOutcome, Option<Duration>) {
        let mut state = self.lock();
        state.requests.push(request);
        let outcome = state
            .script
            .pop_front()
            .unwrap_or_else(|| state.fallback.clone());
        (outcome, state.latency)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(
        name = "mock_transport_send",
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let (outcome, latency) = self.next_outcome(request);

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match outcome {
            MockOutcome::Respond(response) => Ok(response),
            MockOutcome::Fail(error) => Err(error),
        }
    }
}
