//! Integration tests for KubeVirt client
//!
//! These tests require a cluster with KubeVirt and CDI installed, reachable
//! through the local kubeconfig. Set KUBEVIRT_TEST_NAMESPACE to choose the
//! namespace (defaults to "default").

use kubevirt_client::{KubeVirtClient, KubeVirtClientTrait};
use kubevirt_crds::{DataVolume, DataVolumeSpec};

fn namespace() -> String {
    std::env::var("KUBEVIRT_TEST_NAMESPACE").unwrap_or_else(|_| "default".to_string())
}

#[tokio::test]
#[ignore] // Requires running cluster
async fn test_client_creation() {
    let client = KubeVirtClient::try_default()
        .await
        .expect("Failed to create client");

    let vm = client.get_virtual_machine(&namespace(), "does-not-exist").await;
    assert!(vm.is_ok(), "Failed to query virtual machines");
    assert!(vm.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_missing_objects_read_as_none() {
    let client = KubeVirtClient::try_default()
        .await
        .expect("Failed to create client");
    let ns = namespace();

    assert!(client.get_virtual_machine_instance(&ns, "does-not-exist").await.unwrap().is_none());
    assert!(client.get_replica_set(&ns, "does-not-exist").await.unwrap().is_none());
    assert!(client.get_data_volume(&ns, "does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_create_patch_and_delete_data_volume() {
    let client = KubeVirtClient::try_default()
        .await
        .expect("Failed to create client");
    let ns = namespace();

    let mut dv = DataVolume::new(
        "kubevirt-client-it",
        DataVolumeSpec {
            source: Some(serde_json::json!({"blank": {}})),
            storage: Some(serde_json::json!({"resources": {"requests": {"storage": "64Mi"}}})),
            ..Default::default()
        },
    );
    dv.metadata.namespace = Some(ns.clone());

    let created = client.create_data_volume(&dv).await.expect("Failed to create data volume");
    println!("Created data volume {:?}", created.metadata.name);

    let patched = client
        .update_data_volume(
            &ns,
            "kubevirt-client-it",
            &serde_json::json!({"metadata": {"labels": {"test": "integration"}}}),
        )
        .await
        .expect("Failed to patch data volume");
    assert_eq!(
        patched.metadata.labels.unwrap_or_default().get("test").map(String::as_str),
        Some("integration")
    );

    client
        .delete_data_volume(&ns, "kubevirt-client-it")
        .await
        .expect("Failed to delete data volume");
}
