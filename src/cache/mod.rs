//! 缓存层
//!
//! - `ObjectCache`: 以字符串存取的对象缓存抽象
//! - `register`: 缓存后端插件注册表
//! - `object_cache`: 具体后端实现（Moka）
//! - `query`: 按请求类型缓存只读查询结果

pub mod object_cache;
pub mod query;
pub mod register;

use async_trait::async_trait;

pub use query::{CachedQuery, cached_query};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    /// 获取原始字符串值
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// 写入原始字符串值，`ttl` 为 0 时使用后端默认过期策略
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    /// 删除单个键
    async fn remove(&self, key: &str);
    /// 清空缓存
    async fn invalidate_all(&self);
}

/// 声明缓存插件，在进程启动时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::QuizHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
