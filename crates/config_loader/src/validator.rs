//! 配置校验模块
//!
//! 校验规则：
//! - dispatcher 设置合法 (base_url 为 URL，模拟延迟 > 0)
//! - api id 非空且唯一
//! - endpoint 以 '/' 开头
//! - 参数名非空且在同一 API 内唯一
//! - 参数 pattern 为合法正则

use std::collections::HashSet;

use contracts::{ApiDefinition, ContractError, DispatcherSettings, SandboxConfig};
use regex::Regex;
use validator::Validate;

/// 校验 SandboxConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &SandboxConfig) -> Result<(), ContractError> {
    validate_settings(&config.dispatcher)?;
    validate_api_ids(config)?;
    for api in &config.apis {
        validate_endpoint(api)?;
        validate_parameters(api)?;
    }
    Ok(())
}

/// 校验 dispatcher 设置
pub fn validate_settings(settings: &DispatcherSettings) -> Result<(), ContractError> {
    settings.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<_> = errs.iter().map(|e| e.code.to_string()).collect();
                (field.to_string(), codes.join(", "))
            })
            .collect();
        fields.sort();

        let (field, message) = fields
            .into_iter()
            .next()
            .unwrap_or_else(|| (String::from("dispatcher"), String::from("invalid")));

        ContractError::config_validation(
            format!("dispatcher.{field}"),
            format!("invalid value ({message})"),
        )
    })
}

/// 校验 api id 非空且唯一
fn validate_api_ids(config: &SandboxConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, api) in config.apis.iter().enumerate() {
        if api.id.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("apis[{idx}].id"),
                "api id cannot be empty",
            ));
        }
        if !seen.insert(api.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("apis[id={}]", api.id),
                "duplicate api id",
            ));
        }
    }
    Ok(())
}

/// 校验 endpoint 路径
fn validate_endpoint(api: &ApiDefinition) -> Result<(), ContractError> {
    if !api.endpoint.starts_with('/') {
        return Err(ContractError::config_validation(
            format!("apis[{}].endpoint", api.id),
            format!("endpoint must start with '/', got '{}'", api.endpoint),
        ));
    }
    Ok(())
}

/// 校验参数定义
fn validate_parameters(api: &ApiDefinition) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, param) in api.parameters.iter().enumerate() {
        if param.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("apis[{}].parameters[{idx}].name", api.id),
                "parameter name cannot be empty",
            ));
        }
        if !seen.insert(param.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("apis[{}].parameters[name={}]", api.id, param.name),
                "duplicate parameter name",
            ));
        }
        if let Some(pattern) = &param.pattern {
            Regex::new(pattern).map_err(|e| {
                ContractError::config_validation(
                    format!("apis[{}].parameters[{}].pattern", api.id, param.name),
                    format!("invalid pattern: {e}"),
                )
            })?;
        }
    }
    Ok(())
}
