use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::ack_reminder::{APIResponse, PathParams};
use carelink_api_structs::dtos::ReminderDTO;
use carelink_infra::CarelinkContext;
use carelink_domain::ID;

pub async fn ack_reminder_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    path: web::Path<PathParams>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = AckReminderUseCase {
        account_id: account.id,
        reminder_id: path.reminder_id.clone(),
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// The device confirmed its local notification fired, so the server
/// fallback stands down for the rest of the local calendar day.
#[derive(Debug)]
pub struct AckReminderUseCase {
    pub account_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {} was not found", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for AckReminderUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "AckReminder";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .filter(|r| r.account_id == self.account_id)
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        let local_date = reminder.acknowledge(ctx.sys.now());
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(APIResponse {
            acknowledged: true,
            local_date,
            reminder: ReminderDTO::new(reminder),
        })
    }
}
