// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 读取、默认值回退与覆写
// ==========================================

mod test_helpers;

use std::time::Duration;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};
use warehouse_location_config::config::{
    config_keys, ConfigManager, LocationConfigReader, DEFAULT_PREVIEW_SAMPLE_SIZE,
};
use warehouse_location_config::engine::batch_creator::MAX_DELAY;
use warehouse_location_config::engine::BatchCreatorConfig;

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_on_empty_db() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let batch = config_manager.get_batch_creator_config().await.unwrap();
    assert_eq!(batch, BatchCreatorConfig::default());
    assert_eq!(batch.batch_size, 3);
    assert_eq!(batch.item_delay, Duration::from_millis(150));
    assert_eq!(batch.batch_delay, Duration::from_millis(600));

    let sample = config_manager.get_preview_sample_size().await.unwrap();
    assert_eq!(sample, DEFAULT_PREVIEW_SAMPLE_SIZE);
}

#[tokio::test]
async fn test_reads_inserted_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn).expect("Failed to insert config");

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let batch = config_manager.get_batch_creator_config().await.unwrap();
    assert_eq!(batch.batch_size, 4);
    assert_eq!(batch.max_attempts, 2);
    assert!(batch.item_delay.is_zero());
    assert!(batch.batch_delay.is_zero());
    assert!(batch.retry_delay.is_zero());
    assert_eq!(config_manager.get_preview_sample_size().await.unwrap(), 5);
}

#[tokio::test]
async fn test_invalid_values_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_global_config_value(config_keys::BATCH_SIZE, "-1")
        .unwrap();
    config_manager
        .set_global_config_value(config_keys::PREVIEW_SAMPLE_SIZE, "many")
        .unwrap();
    config_manager
        .set_global_config_value(config_keys::RETRY_DELAY_MS, " 25 ")
        .unwrap();

    let batch = config_manager.get_batch_creator_config().await.unwrap();
    assert_eq!(batch.batch_size, 3);
    assert_eq!(batch.retry_delay, Duration::from_millis(25));
    assert_eq!(
        config_manager.get_preview_sample_size().await.unwrap(),
        DEFAULT_PREVIEW_SAMPLE_SIZE
    );
}

#[tokio::test]
async fn test_oversized_delays_are_clamped() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let huge = u64::MAX.to_string();
    for key in [
        config_keys::ITEM_DELAY_MS,
        config_keys::BATCH_DELAY_MS,
        config_keys::RETRY_DELAY_MS,
    ] {
        config_manager.set_global_config_value(key, &huge).unwrap();
    }

    let batch = config_manager.get_batch_creator_config().await.unwrap();
    assert_eq!(batch.item_delay, MAX_DELAY);
    assert_eq!(batch.batch_delay, MAX_DELAY);
    assert_eq!(batch.retry_delay, MAX_DELAY);
}

#[tokio::test]
async fn test_set_global_config_value_persists() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let config_manager = ConfigManager::new(&db_path).unwrap();
        config_manager
            .set_global_config_value(config_keys::PREVIEW_SAMPLE_SIZE, "7")
            .unwrap();
    }

    // 新实例读取同一文件
    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(
        config_manager
            .get_global_config_value(config_keys::PREVIEW_SAMPLE_SIZE)
            .unwrap()
            .as_deref(),
        Some("7")
    );
    assert_eq!(config_manager.get_preview_sample_size().await.unwrap(), 7);
}
