//! 只读查询缓存
//!
//! 每种查询请求类型声明自己的缓存键前缀，请求参数序列化后拼接为完整键。
//! 缓存只依赖 TTL 过期，写操作不会主动失效。

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{CacheResult, ObjectCache};
use crate::errors::Result;

/// 可缓存的查询请求
pub trait CachedQuery: Serialize {
    /// 请求类型对应的键前缀
    const CACHE_KEY: &'static str;

    fn cache_key(&self) -> Result<String> {
        Ok(format!(
            "query:{}:{}",
            Self::CACHE_KEY,
            serde_json::to_string(self)?
        ))
    }
}

/// 命中缓存直接返回，否则执行 `loader` 并写回缓存
pub async fn cached_query<Q, T, F, Fut>(
    cache: &Arc<dyn ObjectCache>,
    query: &Q,
    ttl: u64,
    loader: F,
) -> Result<T>
where
    Q: CachedQuery,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let key = query.cache_key()?;

    if let CacheResult::Found(json) = cache.get_raw(&key).await {
        match serde_json::from_str::<T>(&json) {
            Ok(value) => {
                debug!("Query cache hit: {}", key);
                return Ok(value);
            }
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(&key).await;
            }
        }
    }

    let value = loader().await?;
    cache.insert_raw(key, serde_json::to_string(&value)?, ttl).await;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::MokaCacheWrapper;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct YearQuery {
        year: Option<String>,
    }

    impl CachedQuery for YearQuery {
        const CACHE_KEY: &'static str = "years";
    }

    #[test]
    fn test_cache_key_includes_type_and_params() {
        let q = YearQuery {
            year: Some("2025-2026".to_string()),
        };
        assert_eq!(
            q.cache_key().unwrap(),
            r#"query:years:{"year":"2025-2026"}"#
        );
    }

    #[tokio::test]
    async fn test_loader_runs_once_per_key() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(
            100,
            Duration::from_secs(60),
        ));
        let calls = AtomicUsize::new(0);
        let q = YearQuery { year: None };

        for _ in 0..3 {
            let value: Vec<String> = cached_query(&cache, &q, 0, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["2025-2026".to_string()])
            })
            .await
            .unwrap();
            assert_eq!(value, vec!["2025-2026".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
