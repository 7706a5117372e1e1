use crate::{
    error::CarelinkError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use carelink_api_structs::create_account::{APIResponse, RequestBody};
use carelink_domain::{Account, TreatmentEpisode};
use carelink_infra::CarelinkContext;
use chrono_tz::Tz;

pub async fn create_account_controller(
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let usecase = CreateAccountUseCase {
        code: body.0.code,
        name: body.0.name,
        timezone: body.0.timezone,
    };
    execute(usecase, &ctx)
        .await
        .map(|account| HttpResponse::Created().json(APIResponse::new(account)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
struct CreateAccountUseCase {
    code: String,
    name: String,
    timezone: Option<String>,
}

#[derive(Debug)]
enum UseCaseError {
    StorageError,
    InvalidCreateAccountCode,
    InvalidTimezone(String),
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidCreateAccountCode => {
                Self::Unauthorized("Invalid code provided".into())
            }
            UseCaseError::InvalidTimezone(tz) => {
                Self::BadClientData(format!("Invalid timezone provided: {}", tz))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateAccountUseCase {
    type Response = Account;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateAccount";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        if self.code != ctx.config.create_account_secret_code {
            return Err(UseCaseError::InvalidCreateAccountCode);
        }
        let timezone = self.timezone.clone().unwrap_or_else(|| "UTC".into());
        if timezone.parse::<Tz>().is_err() {
            return Err(UseCaseError::InvalidTimezone(timezone));
        }

        let now = ctx.sys.now();
        let mut account = Account::new(self.name.clone(), timezone, now);

        // Every account starts with one open, empty treatment episode.
        let episode = TreatmentEpisode::new(account.id.clone(), now);
        account.mirror_episode(&episode);

        ctx.repos
            .accounts
            .insert(&account)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .episodes
            .insert(&episode)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::setup_context;

    #[actix_web::main]
    #[test]
    async fn rejects_the_wrong_signup_code() {
        let ctx = setup_context();
        let usecase = CreateAccountUseCase {
            code: format!("{}-wrong", ctx.config.create_account_secret_code),
            name: "Pat".into(),
            timezone: None,
        };
        assert!(execute(usecase, &ctx).await.is_err());
    }

    #[actix_web::main]
    #[test]
    async fn creates_an_account_with_an_open_episode() {
        let ctx = setup_context();
        let usecase = CreateAccountUseCase {
            code: ctx.config.create_account_secret_code.clone(),
            name: "Pat".into(),
            timezone: Some("Asia/Kolkata".into()),
        };
        let account = execute(usecase, &ctx).await.unwrap();
        assert_eq!(account.timezone, "Asia/Kolkata");
        assert!(account.secret_api_key.starts_with("sk_"));

        let open = ctx.repos.episodes.find_open_by_account(&account.id).await;
        assert_eq!(open.len(), 1);
        assert!(open[0].is_open());
        assert!(!open[0].procedure_completed);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_an_unknown_timezone() {
        let ctx = setup_context();
        let usecase = CreateAccountUseCase {
            code: ctx.config.create_account_secret_code.clone(),
            name: "Pat".into(),
            timezone: Some("Not/AZone".into()),
        };
        assert!(execute(usecase, &ctx).await.is_err());
    }
}
