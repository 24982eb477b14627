//! Hash-fragment parameter codec.
//!
//! Target URIs carry application parameters in the hash fragment:
//! `host#path?key=value;flag`. Parameters are `;`-separated; a bare key is
//! a boolean flag. Before a target is loaded into a sandboxed context the
//! router injects the `ipc-mode` flag, telling the child it is being
//! hosted rather than top-level navigated.

use std::collections::BTreeMap;

/// A hash-fragment parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Bare key, serialized without `=`.
    Flag,
    /// `key=value` pair.
    Value(String),
}

/// Parse the parameters from a URI's hash fragment.
pub fn hash_params(uri: &str) -> BTreeMap<String, ParamValue> {
    let mut params = BTreeMap::new();

    let Some((_, hash)) = uri.split_once('#') else {
        return params;
    };
    let Some((_, param_str)) = hash.split_once('?') else {
        return params;
    };

    for part in param_str.split(';').filter(|p| !p.is_empty()) {
        match part.split_once('=') {
            Some((key, value)) => {
                params.insert(key.to_string(), ParamValue::Value(value.to_string()));
            }
            None => {
                params.insert(part.to_string(), ParamValue::Flag);
            }
        }
    }
    params
}

/// Serialize parameters back into a fragment parameter string.
pub fn params_to_string(params: &BTreeMap<String, ParamValue>) -> String {
    let mut out = String::new();
    for (key, value) in params {
        if !out.is_empty() {
            out.push(';');
        }
        match value {
            ParamValue::Flag => out.push_str(key),
            ParamValue::Value(v) => {
                out.push_str(key);
                out.push('=');
                out.push_str(v);
            }
        }
    }
    out
}

/// Rebuild `uri` with the `ipc-mode` flag injected into its hash params.
pub fn inject_ipc_mode(uri: &str) -> String {
    let (host, hash) = match uri.split_once('#') {
        Some((host, hash)) => (host, hash),
        None => (uri, ""),
    };
    let hash_path = hash.split('?').next().unwrap_or_default();

    let mut params = hash_params(uri);
    params.insert("ipc-mode".to_string(), ParamValue::Flag);

    format!("{host}#{hash_path}?{}", params_to_string(&params))
}
