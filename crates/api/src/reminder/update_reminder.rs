use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::update_reminder::{APIResponse, PathParams, RequestBody};
use carelink_domain::{Reminder, ID};
use carelink_infra::CarelinkContext;

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateReminderUseCase {
        account_id: account.id,
        reminder_id: path.reminder_id.clone(),
        title: body.title,
        body: body.body,
        hour: body.hour,
        minute: body.minute,
        timezone: body.timezone,
        active: body.active,
        grace_minutes: body.grace_minutes,
    };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub account_id: ID,
    pub reminder_id: ID,
    pub title: Option<String>,
    pub body: Option<String>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub timezone: Option<String>,
    pub active: Option<bool>,
    pub grace_minutes: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTime(u32, u32),
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {} was not found", id))
            }
            UseCaseError::InvalidTime(hour, minute) => Self::BadClientData(format!(
                "Invalid reminder time provided: {}:{:02}",
                hour, minute
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .filter(|r| r.account_id == self.account_id)
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        let hour = self.hour.unwrap_or(reminder.hour);
        let minute = self.minute.unwrap_or(reminder.minute);
        if !Reminder::valid_time(hour, minute) {
            return Err(UseCaseError::InvalidTime(hour, minute));
        }
        let schedule_changed = hour != reminder.hour
            || minute != reminder.minute
            || self
                .timezone
                .as_ref()
                .map(|tz| *tz != reminder.timezone)
                .unwrap_or(false);

        if let Some(title) = self.title.take() {
            reminder.title = title;
        }
        if let Some(body) = self.body.take() {
            reminder.body = body;
        }
        if let Some(timezone) = self.timezone.take() {
            reminder.timezone = timezone;
        }
        if let Some(active) = self.active {
            reminder.active = active;
        }
        if let Some(grace) = self.grace_minutes {
            reminder.grace_minutes = grace;
        }
        reminder.hour = hour;
        reminder.minute = minute;

        let now = ctx.sys.now();
        if schedule_changed {
            // A new rule means a fresh occurrence and a fresh retry budget.
            reminder.advance_to_next_occurrence(now);
        }
        reminder.updated_at = now;

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map(|_| reminder)
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::setup_context;

    fn empty_update(account_id: ID, reminder_id: ID) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            account_id,
            reminder_id,
            title: None,
            body: None,
            hour: None,
            minute: None,
            timezone: None,
            active: None,
            grace_minutes: None,
        }
    }

    async fn seed(ctx: &CarelinkContext, account_id: &ID) -> Reminder {
        let reminder = Reminder::new(
            account_id.clone(),
            "Medication".into(),
            "Dose".into(),
            9,
            0,
            "UTC".into(),
            true,
            20,
            ctx.sys.now(),
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::main]
    #[test]
    async fn changing_the_time_recomputes_the_next_fire() {
        let ctx = setup_context();
        let account_id = ID::new();
        let reminder = seed(&ctx, &account_id).await;

        let mut usecase = empty_update(account_id, reminder.id.clone());
        usecase.hour = Some(21);
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.hour, 21);
        assert_ne!(updated.next_fire_utc, reminder.next_fire_utc);
        assert_eq!(updated.attempts_today, 0);
    }

    #[actix_web::main]
    #[test]
    async fn title_only_update_keeps_the_schedule() {
        let ctx = setup_context();
        let account_id = ID::new();
        let reminder = seed(&ctx, &account_id).await;

        let mut usecase = empty_update(account_id, reminder.id.clone());
        usecase.title = Some("Evening dose".into());
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.title, "Evening dose");
        assert_eq!(updated.next_fire_utc, reminder.next_fire_utc);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_updates_from_other_accounts() {
        let ctx = setup_context();
        let reminder = seed(&ctx, &ID::new()).await;
        let usecase = empty_update(ID::new(), reminder.id);
        assert!(execute(usecase, &ctx).await.is_err());
    }
}
