pub mod count;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::notifications::requests::NotificationListQuery;
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取通知列表
    pub async fn list_notifications(
        &self,
        query: NotificationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, query, request).await
    }

    // 获取未读数量
    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::get_unread_count(self, request).await
    }

    // 标记单条已读
    pub async fn mark_as_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::mark_as_read(self, notification_id, request).await
    }

    // 全部标记已读
    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_as_read(self, request).await
    }
}
