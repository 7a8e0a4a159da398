//! Unit tests for VirtualMachineInstance reconciler

#[cfg(test)]
mod tests {
    use crate::error::{ProviderError, WaitOperation};
    use crate::identity::ResourceId;
    use crate::test_utils::*;
    use condition_waiter::WaitError;
    use kubevirt_client::{MockKubeVirtClient, MockRead};
    use kubevirt_crds::{VirtualMachineInstance, VirtualMachineInstancePhase};
    use std::time::Duration;
    use tokio::time::Instant;

    fn vmi(phase: &str) -> MockRead<VirtualMachineInstance> {
        MockRead::Object(create_test_virtual_machine_instance("testvmi", "default", phase))
    }

    fn id() -> ResourceId {
        ResourceId::new("default", "testvmi")
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_waits_through_scheduling_phases() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance(
            "default",
            "testvmi",
            vec![vmi(""), vmi("Pending"), vmi("Scheduling"), vmi("Scheduled"), vmi("Running")],
        );
        let reconciler = create_test_reconciler(&mock, test_config());

        let (_, vmi) = reconciler
            .create_virtual_machine_instance(&create_test_virtual_machine_instance("testvmi", "default", ""))
            .await
            .unwrap();

        assert_eq!(vmi.phase(), VirtualMachineInstancePhase::Running);
        assert_eq!(mock.read_count(), 5);
        assert_eq!(mock.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_accepts_succeeded_instance() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance("default", "testvmi", vec![vmi("Pending"), vmi("Succeeded")]);
        let reconciler = create_test_reconciler(&mock, test_config());

        let vmi = reconciler
            .await_virtual_machine_instance_created(&id(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(vmi.phase(), VirtualMachineInstancePhase::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_fails_fast_on_failed_phase() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance("default", "testvmi", vec![vmi("Scheduling"), vmi("Failed"), vmi("Running")]);
        let reconciler = create_test_reconciler(&mock, test_config());

        let err = reconciler
            .await_virtual_machine_instance_created(&id(), Duration::from_secs(60))
            .await
            .unwrap_err();

        match err {
            ProviderError::Wait {
                operation: WaitOperation::Create,
                source: WaitError::UnexpectedState { state, .. },
                ..
            } => assert_eq!(state, "Failed"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(mock.read_count(), 2, "no probe after the failure");
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_wait_starts_after_delay() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance("default", "testvmi", vec![vmi("Running")]);
        let reconciler = create_test_reconciler(&mock, test_config());
        let started = Instant::now();

        reconciler
            .await_virtual_machine_instance_running(&id(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert_eq!(mock.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_wait_tolerates_three_missing_reads() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance(
            "default",
            "testvmi",
            vec![
                MockRead::NotFound,
                MockRead::NotFound,
                MockRead::NotFound,
                vmi("Scheduled"),
                vmi("Running"),
            ],
        );
        let reconciler = create_test_reconciler(&mock, test_config());

        let vmi = reconciler
            .await_virtual_machine_instance_running(&id(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(vmi.phase(), VirtualMachineInstancePhase::Running);
        assert_eq!(mock.read_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_wait_gives_up_after_fourth_missing_read() {
        let mock = MockKubeVirtClient::new();
        let reconciler = create_test_reconciler(&mock, test_config());

        let err = reconciler
            .await_virtual_machine_instance_running(&id(), Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(
            matches!(
                err,
                ProviderError::Wait {
                    operation: WaitOperation::Start,
                    source: WaitError::NotFound { checks: 4 },
                    ..
                }
            ),
            "{err}"
        );
        assert_eq!(mock.read_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_wait_rejects_terminal_phase() {
        let mock = MockKubeVirtClient::new();
        mock.script_virtual_machine_instance("default", "testvmi", vec![vmi("Pending"), vmi("Succeeded")]);
        let reconciler = create_test_reconciler(&mock, test_config());

        let err = reconciler
            .await_virtual_machine_instance_running(&id(), Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(!err.is_timeout());
        assert!(err.to_string().contains("Succeeded"), "{err}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_without_wait() {
        let mock = MockKubeVirtClient::new();
        mock.add_virtual_machine_instance(create_test_virtual_machine_instance("testvmi", "default", "Running"));
        let mut config = test_config();
        config.wait = false;
        let reconciler = create_test_reconciler(&mock, config);

        reconciler.delete_virtual_machine_instance(&id()).await.unwrap();

        assert_eq!(mock.read_count(), 0);
        assert!(!reconciler.virtual_machine_instance_exists(&id()).await.unwrap());
    }
}
