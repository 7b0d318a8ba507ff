use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admins::model::{
    DemoteDto, PaginatedAdminsResponse, PromoteDto, RoleChangeResponse,
};
use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordDto, LoginDto, RegisterDto, ResendOtpDto, ResetPasswordDto,
    VerifyOtpDto,
};
use crate::modules::channels::model::{
    ChannelMemberResponse, ChannelResponse, CreateChannelDto, CreateMessageDto, MessageResponse,
    PaginatedMessagesResponse,
};
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::modules::events::model::{CreateEventDto, Event, PurgedEventsResponse, UpdateEventDto};
use crate::modules::faculties::model::{
    CreateFacultyDto, Faculty, FacultyWithStats, UpdateFacultyDto,
};
use crate::modules::levels::model::{CreateLevelDto, Level, LevelWithStats, UpdateLevelDto};
use crate::modules::posts::model::{
    CommentResponse, CreateCommentDto, CreatePostDto, PaginatedPostsResponse, PostResponse,
    ToggleResponse, UpdatePostDto,
};
use crate::modules::timetables::model::{CreateTimetableDto, PurgedTimetablesResponse, Timetable};
use crate::modules::users::model::{
    ChangePasswordDto, UpdateAcademicsDto, UpdateProfileDto, UserResponse, UserRole,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::verify_otp,
        crate::modules::auth::controller::resend_otp,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::update_academics,
        crate::modules::users::controller::change_password,
        crate::modules::admins::controller::list_admins,
        crate::modules::admins::controller::promote,
        crate::modules::admins::controller::demote,
        crate::modules::faculties::controller::create_faculty,
        crate::modules::faculties::controller::get_faculties,
        crate::modules::faculties::controller::get_faculty_by_id,
        crate::modules::faculties::controller::update_faculty,
        crate::modules::faculties::controller::delete_faculty,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department_by_id,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::levels::controller::create_level,
        crate::modules::levels::controller::get_levels,
        crate::modules::levels::controller::get_level_by_id,
        crate::modules::levels::controller::update_level,
        crate::modules::levels::controller::delete_level,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::get_feed,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::update_post,
        crate::modules::posts::controller::delete_post,
        crate::modules::posts::controller::toggle_like,
        crate::modules::posts::controller::toggle_repost,
        crate::modules::posts::controller::get_comments,
        crate::modules::posts::controller::create_comment,
        crate::modules::posts::controller::delete_comment,
        crate::modules::posts::controller::toggle_comment_like,
        crate::modules::channels::controller::create_channel,
        crate::modules::channels::controller::get_channels,
        crate::modules::channels::controller::get_channel,
        crate::modules::channels::controller::join_channel,
        crate::modules::channels::controller::leave_channel,
        crate::modules::channels::controller::get_members,
        crate::modules::channels::controller::get_messages,
        crate::modules::channels::controller::send_message,
        crate::modules::channels::controller::delete_channel,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::get_events,
        crate::modules::events::controller::get_event_by_id,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::delete_event,
        crate::modules::events::controller::purge_expired_events,
        crate::modules::timetables::controller::create_timetable,
        crate::modules::timetables::controller::list_timetables,
        crate::modules::timetables::controller::get_timetable,
        crate::modules::timetables::controller::delete_timetable,
        crate::modules::timetables::controller::purge_expired_timetables,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            UpdateProfileDto,
            UpdateAcademicsDto,
            ChangePasswordDto,
            RegisterDto,
            VerifyOtpDto,
            ResendOtpDto,
            LoginDto,
            ForgotPasswordDto,
            ResetPasswordDto,
            AuthResponse,
            PromoteDto,
            DemoteDto,
            RoleChangeResponse,
            PaginatedAdminsResponse,
            Faculty,
            FacultyWithStats,
            CreateFacultyDto,
            UpdateFacultyDto,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Level,
            LevelWithStats,
            CreateLevelDto,
            UpdateLevelDto,
            PostResponse,
            CreatePostDto,
            UpdatePostDto,
            PaginatedPostsResponse,
            ToggleResponse,
            CommentResponse,
            CreateCommentDto,
            ChannelResponse,
            CreateChannelDto,
            ChannelMemberResponse,
            MessageResponse,
            CreateMessageDto,
            PaginatedMessagesResponse,
            Event,
            CreateEventDto,
            UpdateEventDto,
            PurgedEventsResponse,
            Timetable,
            CreateTimetableDto,
            PurgedTimetablesResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, OTP verification and login"),
        (name = "Profile", description = "Account profile and academic placement"),
        (name = "Admins", description = "Role promotion and demotion"),
        (name = "Faculties", description = "Faculty management"),
        (name = "Departments", description = "Department management"),
        (name = "Levels", description = "Level management"),
        (name = "Posts", description = "Scoped posts, comments and reactions"),
        (name = "Channels", description = "Channels and channel messaging"),
        (name = "Events", description = "Campus events"),
        (name = "Timetables", description = "Level timetables")
    ),
    info(
        title = "Campusboard API",
        version = "0.1.0",
        description = "A campus notice board and social feed API built with Rust, Axum, and PostgreSQL with scope-aware role authorization.",
        contact(
            name = "API Support",
            email = "support@campusboard.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
