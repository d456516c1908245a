/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whether an entry written at `updated_at` has outlived `ttl_millis`
///
/// `None` means entries never go stale.
pub fn is_expired(updated_at: i64, ttl_millis: Option<i64>, now: i64) -> bool {
    match ttl_millis {
        Some(ttl) => now.saturating_sub(updated_at) >= ttl,
        None => false,
    }
}
