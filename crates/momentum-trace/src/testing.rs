/// Convenience helper for snapshotting a parsed trace as pretty JSON.
pub fn snapshot_from_str(input: &str) -> String {
    match crate::parse(input) {
        Ok(trace) => serde_json::to_string_pretty(&trace)
            .unwrap_or_else(|err| format!("failed to render JSON: {err}")),
        Err(err) => format!("parse error: {err}"),
    }
}
