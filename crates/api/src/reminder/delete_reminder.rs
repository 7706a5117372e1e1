use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::delete_reminder::{APIResponse, PathParams};
use carelink_domain::{Reminder, ID};
use carelink_infra::CarelinkContext;

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    path: web::Path<PathParams>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteReminderUseCase {
        account_id: account.id,
        reminder_id: path.reminder_id.clone(),
    };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
struct DeleteReminderUseCase {
    account_id: ID,
    reminder_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {} was not found", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find(&self.reminder_id)
            .await
            .filter(|r| r.account_id == self.account_id)
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        ctx.repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}
