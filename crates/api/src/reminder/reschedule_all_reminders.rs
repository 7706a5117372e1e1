use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::reschedule_all_reminders::APIResponse;
use carelink_domain::ID;
use carelink_infra::CarelinkContext;

pub async fn reschedule_all_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = RescheduleAllRemindersUseCase {
        account_id: account.id,
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Recomputes every reminder's next occurrence from the current time.
/// Used after a device timezone change or when stored fire times are
/// suspected stale.
#[derive(Debug)]
pub struct RescheduleAllRemindersUseCase {
    pub account_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleAllRemindersUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleAllReminders";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let reminders = ctx.repos.reminders.find_by_account(&self.account_id).await;

        let mut updated = 0;
        for mut reminder in reminders {
            reminder.advance_to_next_occurrence(now);
            ctx.repos
                .reminders
                .save(&reminder)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            updated += 1;
        }
        Ok(APIResponse { updated })
    }
}
