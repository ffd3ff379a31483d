//! 调用指标收集模块
//!
//! 基于 ResponseEnvelope 记录 dispatcher 的调用次数、结果和延迟。

use std::collections::BTreeMap;

use contracts::{ResponseEnvelope, ResponseSource};
use metrics::{counter, histogram};

/// 记录一次调用
///
/// 每产生一个 ResponseEnvelope 时调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_invocation;
///
/// let envelope = dispatcher.invoke("pin-checker", &params, mode, None).await?;
/// record_invocation("pin-checker", envelope.source, envelope.success, envelope.latency);
/// ```
pub fn record_invocation(api_id: &str, source: ResponseSource, success: bool, latency_ms: u64) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "api_sandbox_invocations_total",
        "api_id" => api_id.to_string(),
        "source" => source.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "api_sandbox_invocation_latency_ms",
        "source" => source.as_str()
    )
    .record(latency_ms as f64);
}

/// 记录未知 API 标识
pub fn record_unknown_api(api_id: &str) {
    counter!("api_sandbox_unknown_api_total").increment(1);
    tracing::debug!(api_id, "unknown api id recorded");
}

/// 调用指标聚合器
///
/// 在内存中聚合调用结果，便于 CLI 和 demo 输出摘要。
#[derive(Debug, Clone, Default)]
pub struct InvocationStatsAggregator {
    /// 总调用数
    pub total: u64,

    /// 成功次数
    pub succeeded: u64,

    /// 失败次数
    pub failed: u64,

    /// 模拟模式延迟统计
    pub simulated_latency: RunningStats,

    /// 真实模式延迟统计
    pub live_latency: RunningStats,

    /// 各 API 调用次数
    pub per_api: BTreeMap<String, u64>,
}

impl InvocationStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, api_id: &str, envelope: &ResponseEnvelope) {
        self.total += 1;
        if envelope.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        *self.per_api.entry(api_id.to_string()).or_insert(0) += 1;

        let latency = envelope.latency as f64;
        match envelope.source {
            ResponseSource::Simulated => self.simulated_latency.push(latency),
            ResponseSource::Live => self.live_latency.push(latency),
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> InvocationSummary {
        InvocationSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            failure_rate: if self.total > 0 {
                self.failed as f64 / self.total as f64 * 100.0
            } else {
                0.0
            },
            simulated_latency_ms: StatsSummary::from(&self.simulated_latency),
            live_latency_ms: StatsSummary::from(&self.live_latency),
            per_api: self.per_api.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 调用摘要
#[derive(Debug, Clone, Default)]
pub struct InvocationSummary {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub simulated_latency_ms: StatsSummary,
    pub live_latency_ms: StatsSummary,
    pub per_api: BTreeMap<String, u64>,
}

impl std::fmt::Display for InvocationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Invocation Summary ===")?;
        writeln!(f, "Total invocations: {}", self.total)?;
        writeln!(f, "Succeeded: {}", self.succeeded)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Simulated latency (ms): {}", self.simulated_latency_ms)?;
        writeln!(f, "Live latency (ms): {}", self.live_latency_ms)?;

        if !self.per_api.is_empty() {
            writeln!(f, "Per API:")?;
            for (api_id, count) in &self.per_api {
                writeln!(f, "  {}: {}", api_id, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
