use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::create_reminder::{APIResponse, RequestBody};
use carelink_domain::{Reminder, ID};
use carelink_infra::CarelinkContext;
use tracing::warn;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        account_id: account.id,
        title: body.title,
        body: body.body,
        hour: body.hour,
        minute: body.minute,
        timezone: body.timezone,
        active: body.active.unwrap_or(true),
        grace_minutes: body.grace_minutes,
    };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub account_id: ID,
    pub title: String,
    pub body: String,
    pub hour: u32,
    pub minute: u32,
    pub timezone: String,
    pub active: bool,
    pub grace_minutes: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
    InvalidTime(u32, u32),
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTime(hour, minute) => Self::BadClientData(format!(
                "Invalid reminder time provided: {}:{:02}",
                hour, minute
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        if !Reminder::valid_time(self.hour, self.minute) {
            return Err(UseCaseError::InvalidTime(self.hour, self.minute));
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            // Stored as given but scheduled as UTC, matching what the
            // dispatcher will do with it later.
            warn!(timezone = %self.timezone, "Unknown timezone on reminder create, scheduling as UTC");
        }

        let reminder = Reminder::new(
            self.account_id.clone(),
            self.title.clone(),
            self.body.clone(),
            self.hour,
            self.minute,
            self.timezone.clone(),
            self.active,
            self.grace_minutes
                .unwrap_or(ctx.config.default_grace_minutes),
            ctx.sys.now(),
        );
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map(|_| reminder)
            .map_err(|_| UseCaseError::StorageError)
    }
}
