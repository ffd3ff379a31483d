//! Simulated responses - canned payloads keyed by API identifier
//!
//! Each identifier maps to a pure synthesis function; identifiers without a
//! rule fall back to echoing the submitted parameters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use contracts::Params;
use rand::Rng;
use serde_json::{Map, Value};

/// Synthesis rule: submitted parameters in, `data` payload out
pub type SynthesisFn = Arc<dyn Fn(&Params) -> Value + Send + Sync>;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier -> synthesis rule lookup with a default entry
#[derive(Clone)]
pub struct SimulationTable {
    rules: HashMap<String, SynthesisFn>,
    default_rule: SynthesisFn,
}

impl SimulationTable {
    /// Table with no bespoke rules; every identifier echoes its params
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
            default_rule: Arc::new(echo_params),
        }
    }

    /// Table with the built-in sandbox rules
    pub fn builtin() -> Self {
        Self::empty()
            .with_rule("pin-checker", pin_checker)
            .with_rule("vat-withholding", vat_withholding)
            .with_rule("mpesa-express", mpesa_express)
            .with_rule("c2b-register", c2b_register)
            .with_rule("b2c-payment", b2c_payment)
    }

    /// Register (or replace) the rule for `api_id`
    pub fn with_rule<F>(mut self, api_id: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Params) -> Value + Send + Sync + 'static,
    {
        self.rules.insert(api_id.into(), Arc::new(rule));
        self
    }

    /// Replace the fallback rule
    pub fn with_default<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Params) -> Value + Send + Sync + 'static,
    {
        self.default_rule = Arc::new(rule);
        self
    }

    /// Whether `api_id` has a bespoke rule
    pub fn has_rule(&self, api_id: &str) -> bool {
        self.rules.contains_key(api_id)
    }

    /// Produce the canned payload for `api_id`
    pub fn synthesize(&self, api_id: &str, params: &Params) -> Value {
        let rule = self.rules.get(api_id).unwrap_or(&self.default_rule);
        (**rule)(params)
    }
}

impl Default for SimulationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for SimulationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.rules.keys().collect();
        ids.sort();
        f.debug_struct("SimulationTable").field("rules", &ids).finish()
    }
}

/// Copy `params[param]` into `data[key]` when it was submitted
fn echo(data: &mut Map<String, Value>, key: &str, params: &Params, param: &str) {
    if let Some(value) = params.get(param) {
        data.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn random_below(bound: u32) -> u32 {
    rand::rng().random_range(0..bound)
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Default rule: success message plus every submitted parameter
///
/// Parameters are applied last, so a parameter named `message` wins.
pub fn echo_params(params: &Params) -> Value {
    let mut data = Map::new();
    data.insert("message".into(), Value::from("Success"));
    for (name, value) in params {
        data.insert(name.clone(), Value::String(value.clone()));
    }
    Value::Object(data)
}

/// Taxpayer lookup
pub fn pin_checker(params: &Params) -> Value {
    let mut data = Map::new();
    echo(&mut data, "pin", params, "pin");
    data.insert("status".into(), Value::from("Active"));
    data.insert("taxpayerName".into(), Value::from("JOHN DOE"));
    data.insert("registrationDate".into(), Value::from("2020-01-15"));
    data.insert("station".into(), Value::from("West of Nairobi"));
    Value::Object(data)
}

/// Payment registration number for VAT withholding
pub fn vat_withholding(params: &Params) -> Value {
    let mut data = Map::new();
    data.insert(
        "prn".into(),
        Value::String(format!("PRN-{}", random_below(1_000_000))),
    );
    echo(&mut data, "amount", params, "invoiceAmount");
    data.insert(
        "generatedDate".into(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(data)
}

/// STK push acknowledgement with fresh request identifiers
pub fn mpesa_express(_params: &Params) -> Value {
    let checkout_id = format!("ws_CO_{}{}", Utc::now().timestamp_millis(), random_base36(6));
    serde_json::json!({
        "MerchantRequestID": format!("12345-67890-{}", random_below(1000)),
        "CheckoutRequestID": checkout_id,
        "ResponseCode": "0",
        "ResponseDescription": "Success. Request accepted for processing",
        "CustomerMessage": "Success. Request accepted for processing",
    })
}

/// C2B URL registration acknowledgement
pub fn c2b_register(_params: &Params) -> Value {
    serde_json::json!({
        "OriginatorConversationID": format!("12345-67890-{}", random_below(1000)),
        "ResponseCode": "0",
        "ResponseDescription": "Success",
    })
}

/// B2C payment acceptance
pub fn b2c_payment(_params: &Params) -> Value {
    serde_json::json!({
        "ConversationID": format!("AG_20230101_{}", random_below(100_000)),
        "OriginatorConversationID": format!("23456-78901-{}", random_below(1000)),
        "ResponseCode": "0",
        "ResponseDescription": "Accept the service request successfully.",
    })
}
