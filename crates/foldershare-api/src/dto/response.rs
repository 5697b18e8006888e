//! Response DTOs and envelope helpers.

use serde::Serialize;

use foldershare_core::error::ItemFailure;
use foldershare_engine::BulkReport;

/// One failed item inside a bulk operation response.
#[derive(Debug, Clone, Serialize)]
pub struct FailureDto {
    /// The item that could not be processed.
    pub item_id: i64,
    /// Its name at the time of the failure.
    pub name: String,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&ItemFailure> for FailureDto {
    fn from(failure: &ItemFailure) -> Self {
        Self {
            item_id: failure.item_id.0,
            name: failure.name.clone(),
            error: failure.error.kind.to_string(),
            message: failure.error.message.clone(),
        }
    }
}

/// The standard `{"success": true, "data": ...}` envelope.
pub fn ok_json<T: Serialize>(data: T) -> serde_json::Value {
    serde_json::json!({ "success": true, "data": data })
}

/// Envelope for a bulk operation that may have partial failures.
///
/// `success` is true only when every attempted item went through; the
/// failure list tells the caller exactly what was skipped.
pub fn bulk_json<T: Serialize>(report: &BulkReport<T>) -> serde_json::Value {
    let failures: Vec<FailureDto> = report.failures.iter().map(FailureDto::from).collect();
    serde_json::json!({
        "success": report.is_complete(),
        "data": report.value,
        "attempted": report.attempted,
        "failures": failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldershare_core::error::AppError;
    use foldershare_core::types::ItemId;

    #[test]
    fn test_bulk_json_reports_failures() {
        let mut report = BulkReport::new(vec![1, 2]);
        report.attempt();
        report.attempt();
        report.attempt();
        report.fail(ItemId(9), "broken.txt", AppError::lock("entity is locked"));

        let body = bulk_json(&report);
        assert_eq!(body["success"], false);
        assert_eq!(body["attempted"], 3);
        assert_eq!(body["failures"][0]["error"], "LOCKED");
        assert_eq!(body["failures"][0]["item_id"], 9);
    }
}
