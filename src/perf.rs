// ==========================================
// 仓库库位结构配置器 - SQL 性能观测
// ==========================================
// SQLite trace/profile 回调: 统计语句数 + 慢 SQL 告警
// 开关:
// - Debug 默认开启；Release 默认关闭
// - WAREHOUSE_LOCATION_PERF_SQL=1 强制开启
// - WAREHOUSE_LOCATION_SLOW_SQL_MS=50 慢 SQL 阈值（毫秒）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static ACTIVE_GUARDS: Cell<u32> = Cell::new(0);
    static STATEMENTS: Cell<u64> = Cell::new(0);
    static SLOW_STATEMENTS: Cell<u64> = Cell::new(0);
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// 为连接安装语句统计与慢 SQL 日志
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = env_flag("WAREHOUSE_LOCATION_PERF_SQL").unwrap_or(cfg!(debug_assertions));
    ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var("WAREHOUSE_LOCATION_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_MS.store(slow_ms, Ordering::Relaxed);

    conn.trace(Some(on_statement));
    conn.profile(Some(on_profile));
}

fn guard_active() -> bool {
    ACTIVE_GUARDS.with(|g| g.get() > 0)
}

fn on_statement(_sql: &str) {
    if ENABLED.load(Ordering::Relaxed) && guard_active() {
        STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn on_profile(sql: &str, duration: Duration) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let ms = duration.as_millis() as u64;
    let threshold = SLOW_MS.load(Ordering::Relaxed);
    if threshold == 0 || ms < threshold {
        return;
    }

    let compact: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let shown: String = compact.chars().take(400).collect();
    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %shown, "slow sql");

    if guard_active() {
        SLOW_STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 操作耗时统计 Guard：drop 时输出耗时、SQL 数、慢 SQL 数
///
/// ```ignore
/// let _perf = warehouse_location_config::perf::PerfGuard::new("api.apply_structure");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            statements_at_start: STATEMENTS.with(|c| c.get()),
            slow_at_start: SLOW_STATEMENTS.with(|c| c.get()),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let sql_count = STATEMENTS.with(|c| c.get()).saturating_sub(self.statements_at_start);
        let slow_sql_count = SLOW_STATEMENTS.with(|c| c.get()).saturating_sub(self.slow_at_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            sql_count,
            slow_sql_count,
            "done"
        );

        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_sub(1)));
    }
}
