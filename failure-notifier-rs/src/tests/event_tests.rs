//! Tests for inbound event parsing and variable lookup

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::VariableNames;
    use crate::event::{FailureEvent, Variable};

    #[test]
    fn test_flat_event_wire_names() {
        let event = FailureEvent::from_value(json!({
            "loglink": "https://logs/1",
            "environment-variables": [
                {"name": "executionid", "type": "PLAINTEXT", "value": "exec-1"},
                {"name": "pipelinename", "type": "PLAINTEXT", "value": "pipeline-A"}
            ],
            "exported-environment-variables": [{"name": "jobid", "value": "job-1"}]
        }))
        .unwrap();

        let names = VariableNames::default();
        assert_eq!(event.job_token(&names).unwrap(), "job-1");
        assert_eq!(event.execution_id(&names).unwrap(), "exec-1");
        assert_eq!(event.pipeline_name(&names).unwrap(), "pipeline-A");
        assert_eq!(event.log_link().unwrap(), "https://logs/1");
        assert!(event.is_failed_build());
    }

    #[test]
    fn test_flat_event_camel_case_aliases() {
        let event = FailureEvent::from_value(json!({
            "logLink": "https://logs/1",
            "environmentVariables": [{"value": "exec-9"}, {"value": "pipeline-A"}],
            "exportedVariables": [{"value": ""}]
        }))
        .unwrap();

        assert_eq!(event.exported_variables, Some(vec![Variable::positional("")]));
        assert_eq!(
            event.environment_variables,
            Some(vec![Variable::positional("exec-9"), Variable::positional("pipeline-A")])
        );
        assert_eq!(event.log_link.as_deref(), Some("https://logs/1"));
    }

    #[test]
    fn test_raw_build_state_change() {
        let event = FailureEvent::from_value(json!({
            "version": "0",
            "source": "aws.codebuild",
            "detail-type": "CodeBuild Build State Change",
            "detail": {
                "build-status": "FAILED",
                "project-name": "TPGA",
                "additional-information": {
                    "logs": {"deep-link": "https://console/logs"},
                    "environment": {
                        "image": "aws/codebuild/standard:5.0",
                        "environment-variables": [
                            {"name": "GitUrl", "type": "PLAINTEXT", "value": "git@example.com:repo.git"},
                            {"name": "executionid", "type": "PLAINTEXT", "value": "exec-7"},
                            {"name": "pipelinename", "type": "PLAINTEXT", "value": "pipeline-C"}
                        ]
                    },
                    "exported-environment-variables": [{"name": "jobid", "value": ""}]
                }
            }
        }))
        .unwrap();

        let names = VariableNames::default();
        assert_eq!(event.build_status.as_deref(), Some("FAILED"));
        assert_eq!(event.job_token(&names).unwrap(), "");
        assert_eq!(event.execution_id(&names).unwrap(), "exec-7");
        assert_eq!(event.pipeline_name(&names).unwrap(), "pipeline-C");
        assert_eq!(event.log_link().unwrap(), "https://console/logs");
    }

    #[test]
    fn test_raw_event_without_additional_information() {
        let event = FailureEvent::from_value(json!({
            "detail": {"build-status": "FAILED"}
        }))
        .unwrap();

        let err = event.job_token(&VariableNames::default()).unwrap_err();
        assert_eq!(err.missing_field(), Some("job token"));
        assert!(event.log_link().is_err());
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let err = FailureEvent::from_value(json!("job-123")).unwrap_err();

        assert!(err.is_malformed_event());
        assert_eq!(err.missing_field(), Some("event"));
    }

    #[test]
    fn test_wrongly_typed_field_is_malformed() {
        let err = FailureEvent::from_value(json!({"environment-variables": {"value": "x"}}))
            .unwrap_err();

        assert!(err.is_malformed_event());
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let event = FailureEvent {
            environment_variables: Some(vec![
                Variable::named("PipelineName", "pipeline-D"),
                Variable::named("ExecutionId", "exec-4"),
            ]),
            ..FailureEvent::default()
        };

        let names = VariableNames::default();
        assert_eq!(event.execution_id(&names).unwrap(), "exec-4");
        assert_eq!(event.pipeline_name(&names).unwrap(), "pipeline-D");
    }

    #[test]
    fn test_unnamed_entries_resolve_by_position() {
        let event = FailureEvent {
            exported_variables: Some(vec![Variable::positional("job-5")]),
            environment_variables: Some(vec![
                Variable::positional("exec-5"),
                Variable::positional("pipeline-E"),
            ]),
            ..FailureEvent::default()
        };

        let names = VariableNames::default();
        assert_eq!(event.job_token(&names).unwrap(), "job-5");
        assert_eq!(event.execution_id(&names).unwrap(), "exec-5");
        assert_eq!(event.pipeline_name(&names).unwrap(), "pipeline-E");
    }

    #[test]
    fn test_named_entries_never_resolve_by_position() {
        let event = FailureEvent {
            exported_variables: Some(vec![Variable::named("COMMIT_ID", "abc123")]),
            environment_variables: Some(vec![
                Variable::named("SSHSecretKeyName", "SSHKeyGithub"),
                Variable::named("Branch", "main"),
            ]),
            ..FailureEvent::default()
        };

        let names = VariableNames::default();
        assert_eq!(event.job_token(&names).unwrap_err().missing_field(), Some("job token"));
        assert_eq!(event.execution_id(&names).unwrap_err().missing_field(), Some("execution id"));
        assert_eq!(event.pipeline_name(&names).unwrap_err().missing_field(), Some("pipeline name"));
    }

    #[test]
    fn test_named_entry_without_value_is_missing() {
        let event = FailureEvent {
            exported_variables: Some(vec![
                Variable::positional("ignored"),
                Variable {
                    name: Some("jobid".to_string()),
                    kind: None,
                    value: None,
                },
            ]),
            ..FailureEvent::default()
        };

        let err = event.job_token(&VariableNames::default()).unwrap_err();
        assert!(err.to_string().contains("has no value"));
    }

    #[test]
    fn test_missing_lists_are_reported_by_field() {
        let event = FailureEvent::default();
        let names = VariableNames::default();

        assert_eq!(event.job_token(&names).unwrap_err().missing_field(), Some("job token"));
        assert_eq!(event.execution_id(&names).unwrap_err().missing_field(), Some("execution id"));
        assert_eq!(event.pipeline_name(&names).unwrap_err().missing_field(), Some("pipeline name"));
    }

    #[test]
    fn test_build_status_filter() {
        let mut event = FailureEvent::default();
        assert!(event.is_failed_build());

        event.build_status = Some("failed".to_string());
        assert!(event.is_failed_build());

        event.build_status = Some("STOPPED".to_string());
        assert!(!event.is_failed_build());
    }
}
