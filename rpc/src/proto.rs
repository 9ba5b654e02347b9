//! Wire protocol: JSON-RPC 2.0 request/response shapes for the two
//! service methods, and the mapping from pipeline errors to error
//! payloads. Field names are camelCase — the contract existing clients
//! already speak.

use feedback_analysis::AnalysisError;
use feedback_types::Diagnostic;
use serde::{Deserialize, Serialize};

pub const METHOD_GET_COMPILE_ERRORS: &str = "GetCompileErrors";
pub const METHOD_HAS_SYNTAX_ERRORS: &str = "HasSyntaxErrors";

/// JSON-RPC error codes used by this service.
pub mod code {
    /// Standard: the method is not part of the service surface.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Standard: malformed params (empty/missing solution path).
    pub const INVALID_PARAMS: i64 = -32602;
    /// The external restore command exited non-zero.
    pub const RESTORE_FAILED: i64 = -32000;
    /// The workspace could not open the solution.
    pub const SOLUTION_LOAD_FAILED: i64 = -32002;
}

/// An inbound call, already parsed from a frame.
///
/// A missing `id` makes it a notification; the service has none, so
/// those are dropped without a reply.
#[derive(Debug, Deserialize)]
pub struct IncomingRequest {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// Params shared by both methods: the solution path, plus an optional
/// `refresh` that discards the memoized session before analyzing.
#[derive(Debug, Deserialize)]
pub struct SolutionParams {
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct CompileErrorsResult {
    pub errors: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct SyntaxCheckResult {
    #[serde(rename = "hasSyntaxErrors")]
    pub has_syntax_errors: bool,
}

pub fn success(id: &serde_json::Value, result: impl Serialize) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

pub fn error(
    id: &serde_json::Value,
    code: i64,
    message: impl Into<String>,
    data: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut payload = serde_json::json!({
        "code": code,
        "message": message.into(),
    });
    if let (Some(obj), Some(data)) = (payload.as_object_mut(), data) {
        obj.insert("data".to_string(), data);
    }
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": payload,
    })
}

/// Map a request-scoped pipeline failure onto the wire.
pub fn pipeline_error(id: &serde_json::Value, err: &AnalysisError) -> serde_json::Value {
    match err {
        AnalysisError::RestoreFailed { code: exit, output } => error(
            id,
            code::RESTORE_FAILED,
            err.to_string(),
            Some(serde_json::json!({ "exitCode": exit, "output": output })),
        ),
        AnalysisError::SolutionLoadFailed(_) => {
            error(id, code::SOLUTION_LOAD_FAILED, err.to_string(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_types::Span;

    #[test]
    fn params_accept_camel_case_and_default_refresh() {
        let params: SolutionParams =
            serde_json::from_value(serde_json::json!({ "filePath": "/sln/app.sln" })).unwrap();
        assert_eq!(params.file_path, "/sln/app.sln");
        assert!(!params.refresh);

        let params: SolutionParams = serde_json::from_value(
            serde_json::json!({ "filePath": "/sln/app.sln", "refresh": true }),
        )
        .unwrap();
        assert!(params.refresh);
    }

    #[test]
    fn compile_errors_result_matches_the_client_contract() {
        let result = CompileErrorsResult {
            errors: vec![Diagnostic::new(
                "; expected".to_string(),
                "Project1".to_string(),
                "/sln/Project1/Program.cs".to_string(),
                Span::from_zero_indexed(9, 4, 9, 5),
            )],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "errors": [{
                    "errorText": "; expected",
                    "projectName": "Project1",
                    "filePath": "/sln/Project1/Program.cs",
                    "position": [10, 5, 10, 6]
                }]
            })
        );
    }

    #[test]
    fn syntax_result_uses_camel_case_flag() {
        let json = serde_json::to_value(SyntaxCheckResult {
            has_syntax_errors: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "hasSyntaxErrors": true }));
    }

    #[test]
    fn restore_failure_carries_captured_output_in_data() {
        let err = AnalysisError::RestoreFailed {
            code: Some(1),
            output: "error NU1101: unable to find package".to_string(),
        };
        let reply = pipeline_error(&serde_json::json!(4), &err);
        assert_eq!(reply["error"]["code"], code::RESTORE_FAILED);
        assert_eq!(reply["error"]["data"]["exitCode"], 1);
        assert!(
            reply["error"]["data"]["output"]
                .as_str()
                .unwrap()
                .contains("NU1101")
        );
    }

    #[test]
    fn load_failure_maps_to_its_own_code() {
        let err = AnalysisError::SolutionLoadFailed(
            feedback_analysis::SolutionLoadError::new("app.sln is malformed"),
        );
        let reply = pipeline_error(&serde_json::json!("req-1"), &err);
        assert_eq!(reply["error"]["code"], code::SOLUTION_LOAD_FAILED);
        assert!(
            reply["error"]["message"]
                .as_str()
                .unwrap()
                .contains("app.sln is malformed")
        );
        assert!(reply["error"].get("data").is_none());
    }

    #[test]
    fn notification_parses_without_id() {
        let req: IncomingRequest = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "HasSyntaxErrors",
            "params": { "filePath": "/sln/app.sln" }
        }))
        .unwrap();
        assert!(req.id.is_none());
    }
}
