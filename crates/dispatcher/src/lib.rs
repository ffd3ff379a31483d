//! # Dispatcher
//!
//! API 调用分发模块。
//!
//! 负责：
//! - 按 id 在目录中查找 API
//! - 模拟模式：固定延迟后返回预设数据
//! - 真实模式：一次 HTTP 调用，结果归一化为 `ResponseEnvelope`

pub mod dispatcher;
pub mod error;
pub mod live;
pub mod metrics;
pub mod simulation;

pub use contracts::{InvocationMode, InvocationRequest, Params, ResponseEnvelope, ResponseSource};
#[cfg(feature = "live-http")]
pub use dispatcher::create_dispatcher;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::DispatchError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use simulation::{SimulationTable, SynthesisFn};
