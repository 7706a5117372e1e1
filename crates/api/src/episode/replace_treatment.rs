use super::shared::mirror_to_account;
use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dtos::{AccountDTO, EpisodeDTO};
use carelink_api_structs::replace_treatment::{APIResponse, RequestBody};
use carelink_domain::{Account, TreatmentEpisode};
use carelink_infra::CarelinkContext;
use chrono::{NaiveDate, NaiveTime};
use tracing::info;

pub async fn replace_treatment_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = ReplaceTreatmentUseCase {
        account,
        department: body.department,
        doctor: body.doctor,
        treatment: body.treatment,
        subtype: body.subtype,
        procedure_date: body.procedure_date,
        procedure_time: body.procedure_time,
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Corrects a mis-selected treatment mid-course. Destructive, but scoped
/// strictly to the open episode's data: progress records from the open
/// episode's procedure date onward are purged and the open episode(s)
/// dropped, while locked history is never touched.
#[derive(Debug)]
pub struct ReplaceTreatmentUseCase {
    pub account: Account,
    pub department: Option<String>,
    pub doctor: Option<String>,
    pub treatment: Option<String>,
    pub subtype: Option<String>,
    pub procedure_date: Option<NaiveDate>,
    pub procedure_time: Option<NaiveTime>,
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
impl UseCase for ReplaceTreatmentUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "ReplaceTreatment";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let open = ctx
            .repos
            .episodes
            .find_open_by_account(&self.account.id)
            .await;

        // The old procedure date bounds the purge; the replacement's date
        // stands in when the open episode never had one.
        let cutoff = open
            .first()
            .and_then(|e| e.procedure_date)
            .or(self.procedure_date);

        let mut purged_records = 0;
        if let Some(cutoff) = cutoff {
            purged_records = ctx
                .repos
                .treatment_data
                .purge_on_or_after(&self.account.id, cutoff)
                .await
                .deleted_count;
        }
        let dropped = ctx
            .repos
            .episodes
            .delete_open_by_account(&self.account.id)
            .await;

        let mut episode = TreatmentEpisode::new(self.account.id.clone(), now);
        episode.department = self.department.take();
        episode.doctor = self.doctor.take();
        episode.treatment = self.treatment.take();
        episode.subtype = self.subtype.take();
        episode.procedure_date = self.procedure_date;
        episode.procedure_time = self.procedure_time;
        ctx.repos
            .episodes
            .insert(&episode)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        self.account.clear_completion_flag();
        mirror_to_account(ctx, &mut self.account, &episode)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            account_id = %self.account.id,
            episodes_dropped = dropped.deleted_count,
            purged_records,
            "Replaced in-progress treatment"
        );

        Ok(APIResponse {
            account: AccountDTO::new(self.account.clone()),
            episode: EpisodeDTO::new(episode),
            purged_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::{setup_test_context, TreatmentRecord};
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
    }

    async fn seed(ctx: &CarelinkContext) -> (Account, TreatmentEpisode) {
        let now = utc("2025-03-01T00:00:00Z");
        let mut account = Account::new("a".into(), "UTC".into(), now);
        let mut episode = TreatmentEpisode::new(account.id.clone(), now);
        episode.treatment = Some("Wrong plan".into());
        episode.procedure_date = Some(day(10));
        episode.procedure_completed = true;
        account.mirror_episode(&episode);
        account.record_completion(episode.id.clone(), now);
        ctx.repos.accounts.insert(&account).await.unwrap();
        ctx.repos.episodes.insert(&episode).await.unwrap();
        (account, episode)
    }

    fn replacement(account: Account) -> ReplaceTreatmentUseCase {
        ReplaceTreatmentUseCase {
            account,
            department: Some("Oncology".into()),
            doctor: Some("Dr. Iyer".into()),
            treatment: Some("Right plan".into()),
            subtype: None,
            procedure_date: Some(day(20)),
            procedure_time: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn purges_from_the_old_procedure_date_and_replaces_the_episode() {
        let (ctx, _gateway) = setup_test_context();
        let (account, old) = seed(&ctx).await;
        let now = utc("2025-03-12T00:00:00Z");
        for d in [5, 10, 12] {
            let record =
                TreatmentRecord::new(account.id.clone(), day(d), format!("note {}", d), now);
            ctx.repos.treatment_data.insert(&record).await.unwrap();
        }

        let res = execute(replacement(account.clone()), &ctx).await.unwrap();
        // Records on/after Mar 10 go, the Mar 5 one stays.
        assert_eq!(res.purged_records, 2);
        assert_eq!(
            ctx.repos
                .treatment_data
                .find_by_account(&account.id)
                .await
                .len(),
            1
        );

        assert!(ctx.repos.episodes.find(&old.id).await.is_none());
        assert_eq!(res.episode.treatment.as_deref(), Some("Right plan"));
        assert!(!res.episode.locked);
        assert!(!res.account.procedure_completed);
        assert!(res.account.completed_episode_id.is_none());
        // The sticky marker survives replacement.
        assert!(res.account.treatment_ever_completed);

        let open = ctx.repos.episodes.find_open_by_account(&account.id).await;
        assert_eq!(open.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn locked_history_is_never_touched() {
        let (ctx, _gateway) = setup_test_context();
        let (account, _old) = seed(&ctx).await;
        let mut history = TreatmentEpisode::new(account.id.clone(), utc("2025-01-01T00:00:00Z"));
        history.lock();
        ctx.repos.episodes.insert(&history).await.unwrap();

        execute(replacement(account.clone()), &ctx).await.unwrap();
        assert!(ctx.repos.episodes.find(&history.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn without_any_procedure_date_nothing_is_purged() {
        let (ctx, _gateway) = setup_test_context();
        let now = utc("2025-03-01T00:00:00Z");
        let account = Account::new("a".into(), "UTC".into(), now);
        ctx.repos.accounts.insert(&account).await.unwrap();
        let episode = TreatmentEpisode::new(account.id.clone(), now);
        ctx.repos.episodes.insert(&episode).await.unwrap();
        let record = TreatmentRecord::new(account.id.clone(), day(5), "note".into(), now);
        ctx.repos.treatment_data.insert(&record).await.unwrap();

        let usecase = ReplaceTreatmentUseCase {
            account: account.clone(),
            department: None,
            doctor: None,
            treatment: Some("Plan".into()),
            subtype: None,
            procedure_date: None,
            procedure_time: None,
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.purged_records, 0);
        assert_eq!(
            ctx.repos
                .treatment_data
                .find_by_account(&account.id)
                .await
                .len(),
            1
        );
    }
}
