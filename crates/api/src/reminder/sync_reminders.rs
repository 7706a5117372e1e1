use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dtos::ReminderDTO;
use carelink_api_structs::sync_reminders::{APIResponse, RequestBody, SyncReminderItem};
use carelink_domain::{Reminder, ID};
use carelink_infra::CarelinkContext;
use std::collections::HashSet;

pub async fn sync_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = SyncRemindersUseCase {
        account_id: account.id,
        items: body.items,
        prune_missing: body.prune_missing.unwrap_or(true),
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Replaces the server's view of an account's reminders with the client's
/// snapshot. Upserts by id and writes only rows that differ, so re-posting
/// the same snapshot is a no-op.
#[derive(Debug)]
pub struct SyncRemindersUseCase {
    pub account_id: ID,
    pub items: Vec<SyncReminderItem>,
    pub prune_missing: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTime(u32, u32),
    StorageError,
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
impl UseCase for SyncRemindersUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncReminders";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        for item in &self.items {
            if !Reminder::valid_time(item.hour, item.minute) {
                return Err(UseCaseError::InvalidTime(item.hour, item.minute));
            }
        }

        let now = ctx.sys.now();
        let existing = ctx.repos.reminders.find_by_account(&self.account_id).await;

        let mut created = 0;
        let mut updated = 0;
        let mut seen_ids: HashSet<ID> = HashSet::new();

        for item in &self.items {
            let known = item
                .id
                .as_ref()
                .and_then(|id| existing.iter().find(|r| r.id == *id));

            match known {
                Some(current) => {
                    seen_ids.insert(current.id.clone());
                    let schedule_changed = current.hour != item.hour
                        || current.minute != item.minute
                        || current.timezone != item.timezone;
                    let grace_changed = item
                        .grace_minutes
                        .is_some_and(|grace| current.grace_minutes != grace);
                    let changed = schedule_changed
                        || grace_changed
                        || current.title != item.title
                        || current.body != item.body
                        || current.active != item.active;
                    // An unchanged row is left untouched, so re-posting the
                    // same snapshot reports zero updates.
                    if !changed {
                        continue;
                    }
                    let mut reminder = current.clone();
                    reminder.title = item.title.clone();
                    reminder.body = item.body.clone();
                    reminder.hour = item.hour;
                    reminder.minute = item.minute;
                    reminder.timezone = item.timezone.clone();
                    reminder.active = item.active;
                    if let Some(grace) = item.grace_minutes {
                        reminder.grace_minutes = grace;
                    }
                    if schedule_changed {
                        reminder.advance_to_next_occurrence(now);
                    }
                    reminder.updated_at = now;
                    ctx.repos
                        .reminders
                        .save(&reminder)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                    updated += 1;
                }
                None => {
                    let reminder = Reminder::new(
                        self.account_id.clone(),
                        item.title.clone(),
                        item.body.clone(),
                        item.hour,
                        item.minute,
                        item.timezone.clone(),
                        item.active,
                        item.grace_minutes
                            .unwrap_or(ctx.config.default_grace_minutes),
                        now,
                    );
                    ctx.repos
                        .reminders
                        .insert(&reminder)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                    seen_ids.insert(reminder.id);
                    created += 1;
                }
            }
        }

        let mut deactivated = 0;
        if self.prune_missing {
            for reminder in &existing {
                if seen_ids.contains(&reminder.id) || !reminder.active {
                    continue;
                }
                let mut pruned = reminder.clone();
                pruned.active = false;
                pruned.updated_at = now;
                ctx.repos
                    .reminders
                    .save(&pruned)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                deactivated += 1;
            }
        }

        let synced = ctx.repos.reminders.find_by_account(&self.account_id).await;
        let total_active = synced.iter().filter(|r| r.active).count();
        Ok(APIResponse {
            created,
            updated,
            deactivated,
            total_active,
            synced: synced.into_iter().map(ReminderDTO::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::setup_context;

    fn item(title: &str, hour: u32) -> SyncReminderItem {
        SyncReminderItem {
            id: None,
            title: title.into(),
            body: "Dose".into(),
            hour,
            minute: 0,
            timezone: "UTC".into(),
            active: true,
            grace_minutes: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn resyncing_the_same_snapshot_is_idempotent() {
        let ctx = setup_context();
        let account_id = ID::new();

        let first = SyncRemindersUseCase {
            account_id: account_id.clone(),
            items: vec![item("Morning", 8), item("Evening", 20)],
            prune_missing: true,
        };
        let res = execute(first, &ctx).await.unwrap();
        assert_eq!(res.created, 2);
        assert_eq!(res.total_active, 2);

        // Echo the server ids back, as a client would on the next sync.
        let items: Vec<SyncReminderItem> = res
            .synced
            .iter()
            .map(|dto| SyncReminderItem {
                id: Some(dto.id.clone()),
                title: dto.title.clone(),
                body: dto.body.clone(),
                hour: dto.hour,
                minute: dto.minute,
                timezone: dto.timezone.clone(),
                active: dto.active,
                grace_minutes: Some(dto.grace_minutes),
            })
            .collect();
        let second = SyncRemindersUseCase {
            account_id: account_id.clone(),
            items: items.clone(),
            prune_missing: true,
        };
        let res = execute(second, &ctx).await.unwrap();
        assert_eq!(res.created, 0);
        assert_eq!(res.updated, 0);
        assert_eq!(res.deactivated, 0);
        assert_eq!(res.total_active, 2);
        assert_eq!(
            ctx.repos.reminders.find_by_account(&account_id).await.len(),
            2
        );

        // Only a row that actually differs counts as an update.
        let mut items = items;
        items[0].title = "Morning dose".into();
        let third = SyncRemindersUseCase {
            account_id: account_id.clone(),
            items,
            prune_missing: true,
        };
        let res = execute(third, &ctx).await.unwrap();
        assert_eq!(res.created, 0);
        assert_eq!(res.updated, 1);
    }

    #[actix_web::main]
    #[test]
    async fn pruning_deactivates_reminders_missing_from_the_snapshot() {
        let ctx = setup_context();
        let account_id = ID::new();
        let seeded = SyncRemindersUseCase {
            account_id: account_id.clone(),
            items: vec![item("Morning", 8), item("Evening", 20)],
            prune_missing: true,
        };
        let res = execute(seeded, &ctx).await.unwrap();
        let keep = res.synced[0].clone();

        let next = SyncRemindersUseCase {
            account_id: account_id.clone(),
            items: vec![SyncReminderItem {
                id: Some(keep.id.clone()),
                title: keep.title,
                body: keep.body,
                hour: keep.hour,
                minute: keep.minute,
                timezone: keep.timezone,
                active: true,
                grace_minutes: None,
            }],
            prune_missing: true,
        };
        let res = execute(next, &ctx).await.unwrap();
        assert_eq!(res.deactivated, 1);
        assert_eq!(res.total_active, 1);
    }

    #[actix_web::main]
    #[test]
    async fn best_effort_sync_leaves_missing_rows_alone() {
        let ctx = setup_context();
        let account_id = ID::new();
        execute(
            SyncRemindersUseCase {
                account_id: account_id.clone(),
                items: vec![item("Morning", 8)],
                prune_missing: true,
            },
            &ctx,
        )
        .await
        .unwrap();

        let res = execute(
            SyncRemindersUseCase {
                account_id,
                items: vec![item("Evening", 20)],
                prune_missing: false,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.created, 1);
        assert_eq!(res.deactivated, 0);
        assert_eq!(res.total_active, 2);
    }
}
