//! Schemas for the API and security configuration files.

use guard_core::error::Result;
use guard_formats::{FormatRegistry, RequestValidator};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

/// Schema for the security configuration (`security.yaml`).
pub static SECURITY_CONFIG_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "auth_token_exp_timeout": {"type": "integer"},
            "rbac_mode": {"type": "string", "enum": ["white", "black"]}
        }
    })
});

/// Schema for the API configuration (`api.yaml`).
pub static API_CONFIG_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let file_name = json!({"type": "string", "pattern": r"^[\w\-.]+$"});
    let headers = json!({
        "oneOf": [
            {"type": "string"},
            {"type": "array", "items": {"type": "string"}}
        ]
    });
    let remote_command = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "enabled": {"type": "boolean"},
            "exceptions": {"type": "array", "items": {"type": "string"}}
        }
    });

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "host": {"type": "string"},
            "port": {"type": "number"},
            "use_only_authd": {"type": "boolean"},
            "drop_privileges": {"type": "boolean"},
            "experimental_features": {"type": "boolean"},
            "max_upload_size": {"type": "integer", "minimum": 0},
            "intervals": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "request_timeout": {"type": "number", "minimum": 0}
                }
            },
            "https": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "enabled": {"type": "boolean"},
                    "key": file_name,
                    "cert": file_name,
                    "use_ca": {"type": "boolean"},
                    "ca": file_name,
                    "ssl_protocol": {
                        "type": "string",
                        "enum": ["tls", "tlsv1", "tlsv1.1", "tlsv1.2",
                                 "TLS", "TLSv1", "TLSv1.1", "TLSv1.2"]
                    },
                    "ssl_ciphers": {"type": "string"}
                }
            },
            "logs": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "level": {"type": "string"},
                    "path": {"type": "string"},
                    "format": {"type": "string", "enum": ["plain", "json", "plain,json", "json,plain"]}
                }
            },
            "cors": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "enabled": {"type": "boolean"},
                    "source_route": {"type": "string"},
                    "expose_headers": headers,
                    "allow_headers": headers,
                    "allow_credentials": {"type": "boolean"}
                }
            },
            "cache": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "enabled": {"type": "boolean"},
                    "time": {"type": "number"}
                }
            },
            "access": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "max_login_attempts": {"type": "integer"},
                    "block_time": {"type": "integer"},
                    "max_request_per_minute": {"type": "integer"}
                }
            },
            "remote_commands": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "localfile": remote_command,
                    "wodle_command": remote_command
                }
            }
        }
    })
});

// Neither schema uses a named format.
static EMPTY_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::new);

pub fn validate_api_config(config: &Value) -> Result<()> {
    RequestValidator::new(&EMPTY_REGISTRY, API_CONFIG_SCHEMA.clone())?.validate(config)
}

pub fn validate_security_config(config: &Value) -> Result<()> {
    RequestValidator::new(&EMPTY_REGISTRY, SECURITY_CONFIG_SCHEMA.clone())?.validate(config)
}

/// Parse a YAML configuration document into a JSON value for validation.
pub fn parse_config_yaml(content: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_yaml_ng::from_str(content)?)
}

/// Field names a filter map allows.
pub fn allowed_fields(filters: &Map<String, Value>) -> Vec<String> {
    filters.keys().cloned().collect()
}
