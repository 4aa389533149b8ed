use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student,    // 学生
    Instructor, // 任课教师
    Admin,      // 管理员
    SuperAdmin, // 超级管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const ADMIN: &'static str = "admin";
    pub const SUPER_ADMIN: &'static str = "super_admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::SuperAdmin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Instructor, &Self::Admin, &Self::SuperAdmin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Instructor,
            &Self::Admin,
            &Self::SuperAdmin,
        ]
    }

    /// 教师或管理员
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Student)
    }

    /// 可管理任意课程
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, instructor, admin, super_admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Instructor => write!(f, "{}", UserRole::INSTRUCTOR),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::SuperAdmin => write!(f, "{}", UserRole::SUPER_ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::INSTRUCTOR => Ok(UserRole::Instructor),
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::SUPER_ADMIN => Ok(UserRole::SuperAdmin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Suspended, // 停用
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成访问令牌
    pub fn generate_access_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        crate::utils::jwt::JwtUtils::generate_access_token(self.id, &self.role.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_strings() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_staff_and_admin_sets() {
        assert!(!UserRole::Student.is_staff());
        assert!(UserRole::Instructor.is_staff());
        assert!(!UserRole::Instructor.is_admin());
        assert!(UserRole::SuperAdmin.is_admin());
    }

    #[test]
    fn test_role_json_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        let role: UserRole = serde_json::from_str("\"instructor\"").unwrap();
        assert_eq!(role, UserRole::Instructor);
    }
}
