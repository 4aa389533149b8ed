use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::groups::requests::AddGroupMemberRequest;
use crate::models::users::entities::UserRole;
use crate::services::GroupService;

// 懒加载的全局 GroupService 实例
static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

pub async fn add_member(
    req: HttpRequest,
    group_id: web::Path<i64>,
    member: web::Json<AddGroupMemberRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .add_member(group_id.into_inner(), member.into_inner(), &req)
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (group_id, user_id) = path.into_inner();
    GROUP_SERVICE.remove_member(group_id, user_id, &req).await
}

// 配置路由
pub fn configure_group_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/groups")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/{group_id}/members", web::post().to(add_member))
            .route(
                "/{group_id}/members/{user_id}",
                web::delete().to(remove_member),
            ),
    );
}
