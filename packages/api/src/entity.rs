pub mod admin_log;
pub mod custom_request;
pub mod custom_request_comment;
pub mod error_report;
pub mod order;
pub mod product;
pub mod sea_orm_active_enums;
pub mod user_profile;
