// Output formatting utilities: colored status lines, exit codes, JSON envelopes

use is_terminal::IsTerminal;

// Colors for terminal output (when supported)
pub const RED: &str = "\x1b[0;31m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const CYAN: &str = "\x1b[0;36m";
pub const MAGENTA: &str = "\x1b[0;35m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m"; // No Color

/// Check if stdout is a terminal (for color output)
#[inline]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

fn paint(color: &'static str) -> (&'static str, &'static str) {
    if is_terminal() {
        (color, NC)
    } else {
        ("", "")
    }
}

/// Print warning message
pub fn warn(msg: &str) {
    let (color, reset) = paint(YELLOW);
    eprintln!("{}[WARN]{} {}", color, reset, msg);
}

/// Print error message
pub fn error(msg: &str) {
    let (color, reset) = paint(RED);
    eprintln!("{}[ERROR]{} {}", color, reset, msg);
}

/// Print success message
pub fn success(msg: &str) {
    let (color, reset) = paint(MAGENTA);
    println!("{}[OK]{} {}", color, reset, msg);
}

/// Print section header
pub fn header(msg: &str) {
    let (bold, reset) = paint(BOLD);
    println!("{}===>{} {}", bold, reset, msg);
    println!();
}

/// Highlight text that belongs to a predicted path
pub fn highlight(text: &str) -> String {
    let (color, reset) = paint(CYAN);
    format!("{}{}{}", color, text, reset)
}

/// Exit codes
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_FILE_NOT_FOUND: i32 = 4;
pub const EXIT_VALIDATION: i32 = 5;
pub const EXIT_NOT_FOUND: i32 = 6;

// ============================================================================
// Error Codes and Remediation
// ============================================================================

/// Error codes for JSON error responses
pub const E_SOURCE_NOT_FOUND: &str = "E001";
pub const E_FUNCTION_NOT_FOUND: &str = "E002";
pub const E_CASE_NOT_FOUND: &str = "E003";
pub const E_INVALID_SOURCE: &str = "E004";
pub const E_INVALID_INPUT: &str = "E006";
pub const E_CFG_ERROR: &str = "E007";

/// Common remediation messages
pub const R_HINT_SOURCE: &str = "Pass --source FILE or set PATHCAST_SOURCE to a parsed function unit";
pub const R_HINT_LIST_FUNCTIONS: &str = "Run 'pathcast cfg' without --function to see available functions";
pub const R_HINT_LIST_CASES: &str = "Run 'pathcast tests --function NAME' to see available test cases";
pub const R_HINT_ASSIGNMENT: &str = "Use --input name=value with an integer value";

/// JSON output wrapper
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    pub execution_id: String,
    pub tool: String,
    pub timestamp: String,
    pub data: T,
}

impl<T: serde::Serialize> JsonResponse<T> {
    pub fn new(data: T) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = chrono::Utc::now().to_rfc3339();
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let exec_id = format!("{:x}-{}", secs, std::process::id());

        JsonResponse {
            schema_version: "1.0.0".to_string(),
            execution_id: exec_id,
            tool: "pathcast".to_string(),
            timestamp,
            data,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Error response format for JSON mode
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl JsonError {
    pub fn new(category: &str, message: &str, code: &str) -> Self {
        JsonError {
            error: category.to_string(),
            message: message.to_string(),
            code: code.to_string(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    /// Source unit could not be read
    pub fn source_not_found(message: &str) -> Self {
        Self::new("SourceNotFound", message, E_SOURCE_NOT_FOUND).with_remediation(R_HINT_SOURCE)
    }

    /// Source unit could not be parsed or validated
    pub fn invalid_source(message: &str) -> Self {
        Self::new("InvalidSource", message, E_INVALID_SOURCE)
    }

    /// Function not found error with remediation
    pub fn function_not_found(name: &str) -> Self {
        Self::new(
            "FunctionNotFound",
            &format!("Function '{}' not found in source unit", name),
            E_FUNCTION_NOT_FOUND,
        )
        .with_remediation(R_HINT_LIST_FUNCTIONS)
    }

    /// Test case index out of range
    pub fn case_not_found(message: &str) -> Self {
        Self::new("CaseNotFound", message, E_CASE_NOT_FOUND).with_remediation(R_HINT_LIST_CASES)
    }

    /// Malformed `--input` assignment
    pub fn invalid_input(message: &str) -> Self {
        Self::new("InvalidInput", message, E_INVALID_INPUT).with_remediation(R_HINT_ASSIGNMENT)
    }

    /// Flow graph failed its structural check
    pub fn cfg_error(message: &str) -> Self {
        Self::new("CfgError", message, E_CFG_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response() {
        let data = vec!["item1", "item2"];
        let response = JsonResponse::new(data);
        let json = response.to_json();
        assert!(json.contains("\"tool\":\"pathcast\""));
        assert!(json.contains("\"data\":[\"item1\",\"item2\"]"));
    }

    #[test]
    fn test_json_error_remediation() {
        let err = JsonError::function_not_found("foo");
        assert_eq!(err.code, E_FUNCTION_NOT_FOUND);
        assert!(err.message.contains("'foo'"));
        assert!(err.remediation.is_some());

        let json = serde_json::to_string(&JsonError::invalid_source("bad")).unwrap();
        assert!(!json.contains("remediation"));
    }
}
