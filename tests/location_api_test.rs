// ==========================================
// LocationApi 集成测试
// ==========================================
// 测试目标: 命名模式预览、按模式逐层创建库位（SQLite 后端）
// ==========================================

mod helpers;
mod test_helpers;

use helpers::mock_config::MockConfig;
use std::sync::Arc;
use test_helpers::{create_test_db, insert_test_zone, open_shared_connection};
use tokio_util::sync::CancellationToken;
use warehouse_location_config::api::{ApiError, LocationApi};
use warehouse_location_config::domain::LocationType;
use warehouse_location_config::engine::FailureReason;
use warehouse_location_config::logging;
use warehouse_location_config::repository::LocationRepository;

struct Fixture {
    _temp_file: tempfile::NamedTempFile,
    api: LocationApi,
    repo: Arc<LocationRepository>,
    zone_id: String,
}

fn setup(config: MockConfig) -> Fixture {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_shared_connection(&db_path).expect("Failed to open db");
    let (_wh, zone_id) = {
        let guard = conn.lock().unwrap();
        insert_test_zone(&guard, "WH1", "A").expect("Failed to insert zone")
    };
    let repo = Arc::new(LocationRepository::from_connection(conn));
    let api = LocationApi::new(repo.clone(), Arc::new(config));
    Fixture {
        _temp_file: temp_file,
        api,
        repo,
        zone_id,
    }
}

#[tokio::test]
async fn test_preview_pattern() {
    let f = setup(MockConfig::default());

    let preview = f.api.preview_pattern("R{3}*(+-[2])").await.unwrap();
    assert_eq!(preview.root_count, 3);
    assert_eq!(preview.total_nodes, 9);
    assert_eq!(preview.leaf_count, 6);
    assert_eq!(
        preview.sample_names,
        vec!["R1-A", "R1-B", "R2-A", "R2-B", "R3-A"]
    );

    // 预览不落库
    assert!(f.repo.find_children(Some(&f.zone_id)).unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_rejects_invalid_pattern() {
    let f = setup(MockConfig::default());

    match f.api.preview_pattern("AB{3").await {
        Err(ApiError::PatternSyntax { position, .. }) => assert_eq!(position, 2),
        other => panic!("Expected PatternSyntax, got {:?}", other),
    }
    assert!(matches!(
        f.api.preview_pattern("L[27]").await,
        Err(ApiError::CapacityExceeded(_))
    ));
    assert!(matches!(
        f.api.preview_pattern("  ").await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_oversized_pattern_rejected_without_creating() {
    let f = setup(MockConfig::default());

    assert!(matches!(
        f.api.preview_pattern("A{300000000}").await,
        Err(ApiError::CapacityExceeded(_))
    ));
    let cancel = CancellationToken::new();
    assert!(matches!(
        f.api
            .create_from_pattern("A{300000000}", Some(&f.zone_id), &cancel)
            .await,
        Err(ApiError::CapacityExceeded(_))
    ));
    assert!(f.repo.find_children(Some(&f.zone_id)).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_from_pattern_under_zone() {
    let f = setup(MockConfig::with_batch_size(2));
    let cancel = CancellationToken::new();

    let result = f
        .api
        .create_from_pattern("A{2}*(+-{3})", Some(&f.zone_id), &cancel)
        .await
        .unwrap();

    assert_eq!(result.total, 8);
    assert_eq!(result.success_count(), 8);
    assert!(result.is_complete_success());

    // 根节点取库区的下一级类型
    let aisles = f.repo.find_children(Some(&f.zone_id)).unwrap();
    let names: Vec<&str> = aisles.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2"]);
    assert!(aisles.iter().all(|l| l.location_type == LocationType::Aisle));

    // 子节点挂在后端分配的父ID之下
    let a1_id = result.location_id_of("A1").unwrap();
    assert_eq!(a1_id, aisles[0].location_id);
    let shelves = f.repo.find_children(Some(a1_id)).unwrap();
    let names: Vec<&str> = shelves.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["A1-1", "A1-2", "A1-3"]);
    assert!(shelves.iter().all(|l| l.location_type == LocationType::Shelf));

    assert_eq!(f.repo.count_subtree(&f.zone_id).unwrap(), 9);
}

#[tokio::test]
async fn test_create_top_level_warehouses() {
    let f = setup(MockConfig::default());
    let cancel = CancellationToken::new();

    let result = f
        .api
        .create_from_pattern("DC{2}", None, &cancel)
        .await
        .unwrap();
    assert_eq!(result.success_count(), 2);
    assert!(result
        .created
        .iter()
        .all(|c| c.location_type == LocationType::Warehouse && c.parent_id.is_none()));

    let roots = f.api.list_children(None).unwrap();
    let names: Vec<&str> = roots.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["DC1", "DC2", "WH1"]);
}

#[tokio::test]
async fn test_duplicate_names_fail_with_subtree() {
    let f = setup(MockConfig::default());
    let cancel = CancellationToken::new();

    f.api
        .create_from_pattern("A{2}*(+-{3})", Some(&f.zone_id), &cancel)
        .await
        .unwrap();

    // 再次创建: 根节点违反同级唯一约束，不重试，子树全部记为失败
    let again = f
        .api
        .create_from_pattern("A{2}*(+-{3})", Some(&f.zone_id), &cancel)
        .await
        .unwrap();
    assert_eq!(again.success_count(), 0);
    assert_eq!(again.failure_count(), 8);

    let root_failures: Vec<_> = again
        .failures
        .iter()
        .filter(|fail| matches!(fail.reason, FailureReason::Backend { .. }))
        .collect();
    assert_eq!(root_failures.len(), 2);
    for fail in root_failures {
        match &fail.reason {
            FailureReason::Backend { attempts, .. } => assert_eq!(*attempts, 1),
            _ => unreachable!(),
        }
    }

    let orphan = again
        .failures
        .iter()
        .find(|fail| fail.path == "A2 / A2-3")
        .unwrap();
    assert_eq!(
        orphan.reason,
        FailureReason::ParentFailed {
            parent_path: "A2".to_string()
        }
    );

    // 库中仍只有第一次创建的 9 个（含库区）
    assert_eq!(f.repo.count_subtree(&f.zone_id).unwrap(), 9);
}

#[tokio::test]
async fn test_unknown_parent_is_not_found() {
    let f = setup(MockConfig::default());
    let cancel = CancellationToken::new();

    assert!(matches!(
        f.api
            .create_from_pattern("A{2}", Some("missing"), &cancel)
            .await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_cancelled_before_start_creates_nothing() {
    let f = setup(MockConfig::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = f
        .api
        .create_from_pattern("R{3}*(+-[2])", Some(&f.zone_id), &cancel)
        .await
        .unwrap();
    assert!(result.was_cancelled);
    assert_eq!(result.success_count(), 0);
    assert_eq!(result.cancelled_count(), 9);
    assert!(f.repo.find_children(Some(&f.zone_id)).unwrap().is_empty());
}
