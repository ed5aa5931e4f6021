// ==========================================
// 仓库库位结构配置器 - 命令行入口
// ==========================================
// 用法:
//   warehouse-location-config expand <pattern>
//   warehouse-location-config create <pattern> [parent_id]
//   warehouse-location-config children [parent_id]
//   warehouse-location-config addresses <structure.json> [limit]
//   warehouse-location-config preview <zone_id> <structure.json>
//   warehouse-location-config apply <zone_id> <structure.json> [REJECT|BLOCK|FORCE]
// 数据库: WAREHOUSE_LOCATION_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use warehouse_location_config::app::{get_default_db_path, AppState};
use warehouse_location_config::domain::{OccupiedBinsPolicy, ZoneStructure};
use warehouse_location_config::logging;

const USAGE: &str = "\
用法:
  expand <pattern>                              预览命名模式展开结果
  create <pattern> [parent_id]                  按命名模式创建库位层级
  children [parent_id]                          列出下级库位
  addresses <structure.json> [limit]            计算库区结构的库位编码
  preview <zone_id> <structure.json>            预览库区重配置方案
  apply <zone_id> <structure.json> [policy]     落地库区结构 (REJECT|BLOCK|FORCE)";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!(
        version = warehouse_location_config::VERSION,
        db_path = %db_path,
        command = %command,
        "{}",
        warehouse_location_config::APP_NAME
    );
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "expand" => {
            let preview = state.location_api.preview_pattern(arg(&args, 1, "pattern")?).await?;
            print_json(&preview)?;
        }
        "create" => {
            let pattern = arg(&args, 1, "pattern")?;
            let parent_id = args.get(2).map(String::as_str);

            let cancel = state.shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("收到中断信号，停止派发新的创建批次");
                    cancel.cancel();
                }
            });

            let result = state
                .location_api
                .create_from_pattern(pattern, parent_id, &state.shutdown)
                .await?;
            print_json(&result)?;
            if !result.is_complete_success() {
                bail!(
                    "部分库位未创建: 失败 {}，取消 {}",
                    result.failure_count(),
                    result.cancelled_count()
                );
            }
        }
        "children" => {
            let parent_id = args.get(1).map(String::as_str);
            print_json(&state.location_api.list_children(parent_id)?)?;
        }
        "addresses" => {
            let structure = read_structure(arg(&args, 1, "structure.json")?)?;
            let limit = match args.get(2) {
                Some(s) => Some(s.parse::<usize>().context("limit 必须为非负整数")?),
                None => None,
            };
            let addresses = state
                .zone_structure_api
                .preview_addresses(&structure, limit)?;
            for a in &addresses {
                println!("{}", a.address);
            }
        }
        "preview" => {
            let zone_id = arg(&args, 1, "zone_id")?;
            let structure = read_structure(arg(&args, 2, "structure.json")?)?;
            let preview = state.zone_structure_api.preview(zone_id, &structure).await?;
            print_json(&preview)?;
        }
        "apply" => {
            let zone_id = arg(&args, 1, "zone_id")?;
            let structure = read_structure(arg(&args, 2, "structure.json")?)?;
            let policy = match args.get(3) {
                Some(s) => Some(
                    OccupiedBinsPolicy::from_str(s)
                        .ok_or_else(|| anyhow!("未知的占用库位策略: {}", s))?,
                ),
                None => None,
            };
            let result = state
                .zone_structure_api
                .apply(zone_id, &structure, policy)
                .await?;
            print_json(&result)?;
        }
        other => bail!("未知命令: {}\n\n{}", other, USAGE),
    }

    Ok(())
}

fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("缺少参数 <{}>\n\n{}", name, USAGE))
}

fn read_structure(path: &str) -> Result<ZoneStructure> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("无法读取 {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("无法解析库区结构 {}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
