//! 沙箱配置解析
//!
//! 把 `[dispatcher]` 设置和 `[[apis]]` 目录条目反序列化为 `SandboxConfig`。
//! 内置目录和用户文件一般用 TOML；JSON 可读回 `ConfigLoader::to_json` 的输出。
//! 这里只做语法层面的解析，ID 重复、端点格式等检查在 `validator` 中完成。

use contracts::{ContractError, SandboxConfig};

/// 沙箱配置文件格式，由 `ConfigLoader::load_from_path` 按扩展名选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML，内置目录 `catalog/builtin.toml` 使用此格式
    Toml,
    /// JSON，字段名与 TOML 相同
    Json,
}

impl ConfigFormat {
    /// 按扩展名推断格式（大小写不敏感），未知扩展名返回 `None`
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 沙箱配置；未知 HTTP 方法或参数类型会在此处报 `ConfigParse`
pub fn parse_toml(content: &str) -> Result<SandboxConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 沙箱配置，缺省字段取与 TOML 相同的默认值
pub fn parse_json(content: &str) -> Result<SandboxConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 按给定格式解析，未经校验
pub fn parse(content: &str, format: ConfigFormat) -> Result<SandboxConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
