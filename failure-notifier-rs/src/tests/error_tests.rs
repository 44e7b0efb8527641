//! Tests for error handling functionality

#[cfg(test)]
mod tests {
    use aws_sdk_codepipeline::error::BuildError;

    use crate::error::{mapping, NotifierError};

    #[test]
    fn test_error_display() {
        let malformed = NotifierError::malformed_event("pipeline name", "no entry at position 1");
        assert_eq!(
            malformed.to_string(),
            "Malformed event: missing pipeline name: no entry at position 1"
        );

        let rejected = NotifierError::orchestration_call(
            "StopPipelineExecution",
            Some("PipelineNotFoundException".to_string()),
            "pipeline-A not found",
        );
        assert_eq!(
            rejected.to_string(),
            "StopPipelineExecution failed (PipelineNotFoundException): pipeline-A not found"
        );

        let transport = NotifierError::orchestration_call("PutJobFailureResult", None, "dispatch failure");
        assert_eq!(transport.to_string(), "PutJobFailureResult failed: dispatch failure");
    }

    #[test]
    fn test_error_classification() {
        let malformed = NotifierError::malformed_event("job token", "variable list is missing");
        assert!(malformed.is_malformed_event());
        assert!(!malformed.is_orchestration_call());
        assert_eq!(malformed.missing_field(), Some("job token"));
        assert_eq!(malformed.error_code(), None);

        let rejected = NotifierError::orchestration_call(
            "PutJobFailureResult",
            Some("InvalidJobException".to_string()),
            "bad token",
        );
        assert!(rejected.is_orchestration_call());
        assert_eq!(rejected.error_code(), Some("InvalidJobException"));
        assert_eq!(rejected.missing_field(), None);
    }

    #[test]
    fn test_json_error_is_malformed_event() {
        let err: NotifierError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();

        assert!(err.is_malformed_event());
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_build_error_mapping() {
        let err = mapping::map_build_error(
            "PutJobFailureResult",
            BuildError::missing_field("message", "a failure message is required"),
        );

        assert!(err.is_orchestration_call());
        assert_eq!(err.error_code(), None);
        assert!(err.to_string().starts_with("PutJobFailureResult failed: Invalid request"));
    }
}
