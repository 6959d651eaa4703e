// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! InstallAppGroups / UninstallAppGroups batch behaviour: request-order results,
//! per-entry skips, identity reuse and the LMA auxiliary failure policies.

mod common;

use cluster_lcm_core::application::AppGroupLifecycleService;
use cluster_lcm_core::domain::app_group::{AppGroupStatus, AppGroupType};
use cluster_lcm_core::domain::cluster::ClusterStatus;
use cluster_lcm_core::domain::errors::{LifecycleError, ResultCode};
use cluster_lcm_core::domain::identifiers::ClusterId;
use cluster_lcm_core::domain::lcm_config::AuxiliaryFailurePolicy;
use cluster_lcm_core::domain::requests::{
    AppGroupInstallRequest, InstallAppGroupsRequest, UninstallAppGroupsRequest,
};
use cluster_lcm_core::domain::workflow::{
    ParameterKey, LMA_FEDERATION_TEMPLATE, REMOVE_LMA_FEDERATION_TEMPLATE,
    REMOVE_SERVICE_MESH_TEMPLATE, SERVICE_MESH_TEMPLATE,
};

use common::Harness;

fn entry(cluster_id: ClusterId, name: &str, group_type: AppGroupType) -> AppGroupInstallRequest {
    AppGroupInstallRequest {
        cluster_id: cluster_id.to_string(),
        name: name.to_string(),
        group_type,
        external_label: "prod".to_string(),
    }
}

fn install(entries: Vec<AppGroupInstallRequest>) -> InstallAppGroupsRequest {
    InstallAppGroupsRequest { app_groups: entries }
}

fn with_auxiliaries(harness: &mut Harness, policy: AuxiliaryFailurePolicy) {
    harness.settings.catalog.lma_auxiliary_templates =
        vec!["tks-lma-aux-a".to_string(), "tks-lma-aux-b".to_string()];
    harness.settings.auxiliary_failure_policy = policy;
}

async fn assert_lma_installing(harness: &Harness, workflow_id: &str) {
    let lma = harness
        .app_groups
        .list_all()
        .await
        .into_iter()
        .find(|g| g.name == "lma")
        .unwrap();
    assert_eq!(lma.status, AppGroupStatus::Installing);
    assert_eq!(lma.workflow_id.as_deref(), Some(workflow_id));
}

// ============================================================================
// InstallAppGroups
// ============================================================================

#[tokio::test]
async fn test_install_lma_submits_federation_with_loki() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![entry(cluster_id, "lma", AppGroupType::Lma)]))
        .await
        .unwrap();

    assert_eq!(outcome.ids.len(), 1);
    assert!(outcome.aborted.is_none());

    let submissions = harness.engine.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].template, LMA_FEDERATION_TEMPLATE);
    let params = &submissions[0].parameters;
    assert_eq!(params.get(ParameterKey::LoggingComponent), Some("loki"));
    assert_eq!(params.get(ParameterKey::AppGroupId), Some(outcome.ids[0].to_string().as_str()));
    assert_eq!(params.get(ParameterKey::GithubAccount), Some("tks-management"));
    assert_eq!(params.get(ParameterKey::Revision), Some("main"));

    let app_group = harness.app_group(outcome.ids[0]).await.unwrap();
    assert_eq!(app_group.status, AppGroupStatus::Installing);
    assert_eq!(app_group.workflow_id.as_deref(), Some("tks-lma-federation-0"));
}

#[tokio::test]
async fn test_install_lma_efk_and_service_mesh_templates() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "efk", AppGroupType::LmaEfk),
            entry(cluster_id, "mesh", AppGroupType::ServiceMesh),
        ]))
        .await
        .unwrap();

    let submissions = harness.engine.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].template, LMA_FEDERATION_TEMPLATE);
    assert_eq!(submissions[0].parameters.get(ParameterKey::LoggingComponent), Some("efk"));
    assert_eq!(submissions[1].template, SERVICE_MESH_TEMPLATE);
    assert_eq!(submissions[1].parameters.get(ParameterKey::LoggingComponent), None);
}

#[tokio::test]
async fn test_install_skips_failed_entries_and_keeps_request_order() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    harness.engine.fail_template(SERVICE_MESH_TEMPLATE);

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "first", AppGroupType::Lma),
            entry(ClusterId::new(), "orphan", AppGroupType::Lma),
            entry(cluster_id, "mesh", AppGroupType::ServiceMesh),
            entry(cluster_id, "unknown", AppGroupType::Unspecified),
            entry(cluster_id, "last", AppGroupType::LmaEfk),
        ]))
        .await
        .unwrap();

    assert!(outcome.aborted.is_none());
    assert_eq!(outcome.ids.len(), 2);

    let first = harness.app_group(outcome.ids[0]).await.unwrap();
    let last = harness.app_group(outcome.ids[1]).await.unwrap();
    assert_eq!(first.name, "first");
    assert_eq!(last.name, "last");

    // The mesh entry was registered before its submission failed
    let mesh = harness
        .app_groups
        .list_all()
        .await
        .into_iter()
        .find(|g| g.name == "mesh")
        .unwrap();
    assert_eq!(mesh.status, AppGroupStatus::Unspecified);
}

#[tokio::test]
async fn test_install_reuses_app_group_with_same_identity() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    let existing = harness
        .seed_app_group(cluster_id, "lma", AppGroupType::Lma, AppGroupStatus::Running)
        .await;

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![entry(cluster_id, "lma", AppGroupType::Lma)]))
        .await
        .unwrap();

    assert_eq!(outcome.ids, vec![existing]);
    assert_eq!(harness.app_groups.list_all().await.len(), 1);
    assert_eq!(harness.engine.submissions().len(), 1);
}

#[tokio::test]
async fn test_install_registers_new_app_group_when_label_differs() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    let existing = harness
        .seed_app_group(cluster_id, "lma", AppGroupType::Lma, AppGroupStatus::Running)
        .await;

    let mut request = entry(cluster_id, "lma", AppGroupType::Lma);
    request.external_label = "staging".to_string();

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![request]))
        .await
        .unwrap();

    assert_eq!(outcome.ids.len(), 1);
    assert_ne!(outcome.ids[0], existing);
    assert_eq!(harness.app_groups.list_all().await.len(), 2);
}

#[tokio::test]
async fn test_install_with_invalid_entry_rejects_whole_batch() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    let err = harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "lma", AppGroupType::Lma),
            entry(cluster_id, "", AppGroupType::ServiceMesh),
        ]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResultCode::InvalidArgument);
    assert!(harness.app_groups.list_all().await.is_empty());
    assert!(harness.engine.submissions().is_empty());
}

#[tokio::test]
async fn test_install_submits_lma_auxiliaries_in_order() {
    let mut harness = Harness::new();
    with_auxiliaries(&mut harness, AuxiliaryFailurePolicy::SkipEntry);
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "lma", AppGroupType::Lma),
            entry(cluster_id, "efk", AppGroupType::LmaEfk),
        ]))
        .await
        .unwrap();

    assert_eq!(
        harness.engine.templates(),
        vec![
            LMA_FEDERATION_TEMPLATE.to_string(),
            "tks-lma-aux-a".to_string(),
            "tks-lma-aux-b".to_string(),
            LMA_FEDERATION_TEMPLATE.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_auxiliary_failure_skips_entry_by_default() {
    let mut harness = Harness::new();
    with_auxiliaries(&mut harness, AuxiliaryFailurePolicy::SkipEntry);
    harness.engine.fail_template("tks-lma-aux-b");
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "lma", AppGroupType::Lma),
            entry(cluster_id, "mesh", AppGroupType::ServiceMesh),
        ]))
        .await
        .unwrap();

    assert!(outcome.aborted.is_none());
    assert_eq!(outcome.ids.len(), 1);
    assert_eq!(harness.app_group(outcome.ids[0]).await.unwrap().name, "mesh");

    // The federation workflow was submitted, so the record points at it
    assert_lma_installing(&harness, "tks-lma-federation-0").await;
    assert_eq!(
        harness.engine.templates(),
        vec![
            LMA_FEDERATION_TEMPLATE.to_string(),
            "tks-lma-aux-a".to_string(),
            SERVICE_MESH_TEMPLATE.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_auxiliary_failure_aborts_batch_when_configured() {
    let mut harness = Harness::new();
    with_auxiliaries(&mut harness, AuxiliaryFailurePolicy::AbortBatch);
    harness.engine.fail_template("tks-lma-aux-a");
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;

    let outcome = harness
        .app_group_service()
        .install_app_groups(install(vec![
            entry(cluster_id, "mesh", AppGroupType::ServiceMesh),
            entry(cluster_id, "lma", AppGroupType::Lma),
            entry(cluster_id, "efk", AppGroupType::LmaEfk),
        ]))
        .await
        .unwrap();

    assert_eq!(outcome.ids.len(), 1);
    assert_eq!(harness.app_group(outcome.ids[0]).await.unwrap().name, "mesh");

    let aborted = outcome.aborted.unwrap();
    assert!(matches!(aborted, LifecycleError::Upstream(_)));
    assert_eq!(aborted.code(), ResultCode::Internal);
    assert!(aborted.to_string().contains("tks-lma-aux-a"));
    assert_lma_installing(&harness, "tks-lma-federation-1").await;

    // Nothing after the failing entry was submitted
    assert_eq!(
        harness.engine.templates(),
        vec![SERVICE_MESH_TEMPLATE.to_string(), LMA_FEDERATION_TEMPLATE.to_string()]
    );
}

// ============================================================================
// UninstallAppGroups
// ============================================================================

#[tokio::test]
async fn test_uninstall_skips_missing_app_groups() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    let lma = harness
        .seed_app_group(cluster_id, "lma", AppGroupType::LmaEfk, AppGroupStatus::Running)
        .await;

    let outcome = harness
        .app_group_service()
        .uninstall_app_groups(UninstallAppGroupsRequest {
            app_group_ids: vec![
                lma.to_string(),
                "9a1f2e3d-4c5b-4a69-8877-665544332211".to_string(),
            ],
        })
        .await
        .unwrap();

    assert_eq!(outcome.ids, vec![lma]);
    assert!(outcome.aborted.is_none());

    let submissions = harness.engine.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].template, REMOVE_LMA_FEDERATION_TEMPLATE);
    assert_eq!(
        submissions[0].parameters.to_wire(),
        vec![
            "app_group=lma".to_string(),
            "github_account=tks-management".to_string(),
            "tks_info_host=tks-info.tks.svc".to_string(),
            format!("cluster_id={}", cluster_id),
            format!("app_group_id={}", lma),
        ]
    );

    let app_group = harness.app_group(lma).await.unwrap();
    assert_eq!(app_group.status, AppGroupStatus::Deleting);
    assert_eq!(app_group.workflow_id.as_deref(), Some("tks-remove-lma-federation-0"));
}

#[tokio::test]
async fn test_uninstall_service_mesh_and_unknown_type() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    let mesh = harness
        .seed_app_group(cluster_id, "mesh", AppGroupType::ServiceMesh, AppGroupStatus::Running)
        .await;
    let unknown = harness
        .seed_app_group(cluster_id, "unknown", AppGroupType::Unspecified, AppGroupStatus::Running)
        .await;

    let outcome = harness
        .app_group_service()
        .uninstall_app_groups(UninstallAppGroupsRequest {
            app_group_ids: vec![unknown.to_string(), mesh.to_string()],
        })
        .await
        .unwrap();

    assert_eq!(outcome.ids, vec![mesh]);
    assert_eq!(harness.engine.templates(), vec![REMOVE_SERVICE_MESH_TEMPLATE.to_string()]);
    assert_eq!(
        harness.engine.submissions()[0].parameters.get(ParameterKey::AppGroup),
        Some("service-mesh")
    );
    assert_eq!(harness.app_group(unknown).await.unwrap().status, AppGroupStatus::Running);
}

#[tokio::test]
async fn test_uninstall_with_malformed_id_rejects_whole_batch() {
    let harness = Harness::new();
    let cluster_id = harness.seed_cluster(ClusterStatus::Running).await;
    let lma = harness
        .seed_app_group(cluster_id, "lma", AppGroupType::Lma, AppGroupStatus::Running)
        .await;

    let err = harness
        .app_group_service()
        .uninstall_app_groups(UninstallAppGroupsRequest {
            app_group_ids: vec![lma.to_string(), "not-a-uuid".to_string()],
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), ResultCode::InvalidArgument);
    assert!(harness.engine.submissions().is_empty());
}
