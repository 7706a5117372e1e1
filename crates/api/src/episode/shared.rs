use carelink_domain::{Account, TreatmentEpisode};
use carelink_infra::CarelinkContext;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Returns the account's single open episode, repairing state on the way:
/// extra unlocked episodes are locked (keeping the newest), a completed
/// episode whose recovery window has lapsed is locked and replaced by its
/// successor, and a missing open episode is recreated empty. A completed
/// episode still inside the recovery window stays open. Ends by mirroring
/// onto the account, like every open-episode mutation.
pub async fn get_or_create_open_episode(
    ctx: &CarelinkContext,
    account: &mut Account,
    now: DateTime<Utc>,
) -> anyhow::Result<TreatmentEpisode> {
    let mut open = ctx.repos.episodes.find_open_by_account(&account.id).await;

    if open.len() > 1 {
        warn!(
            account_id = %account.id,
            count = open.len(),
            "Multiple unlocked episodes found, locking all but the newest"
        );
        for mut stale in open.split_off(1) {
            stale.lock();
            ctx.repos.episodes.save(&stale).await?;
        }
    }

    let current = match open.pop() {
        Some(mut episode) => {
            if episode.rotation_due(now) {
                episode.lock();
                ctx.repos.episodes.save(&episode).await?;
                let next = episode.successor(now);
                ctx.repos.episodes.insert(&next).await?;
                next
            } else {
                episode
            }
        }
        None => {
            let fresh = TreatmentEpisode::new(account.id.clone(), now);
            ctx.repos.episodes.insert(&fresh).await?;
            fresh
        }
    };

    mirror_to_account(ctx, account, &current).await?;
    Ok(current)
}

/// Copies the episode's treatment fields onto the account record and stores
/// it, so account reads never need an episode join.
pub async fn mirror_to_account(
    ctx: &CarelinkContext,
    account: &mut Account,
    episode: &TreatmentEpisode,
) -> anyhow::Result<()> {
    account.mirror_episode(episode);
    ctx.repos.accounts.save(account).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_domain::ID;
    use carelink_infra::setup_test_context;
    use chrono::NaiveDate;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    async fn seed_account(ctx: &CarelinkContext) -> Account {
        let account = Account::new("a".into(), "UTC".into(), utc("2025-01-01T00:00:00Z"));
        ctx.repos.accounts.insert(&account).await.unwrap();
        account
    }

    #[actix_web::main]
    #[test]
    async fn missing_open_episode_is_recreated() {
        let (ctx, _gateway) = setup_test_context();
        let mut account = seed_account(&ctx).await;
        let episode = get_or_create_open_episode(&ctx, &mut account, utc("2025-02-01T00:00:00Z"))
            .await
            .unwrap();
        assert!(episode.is_open());
        assert_eq!(
            ctx.repos
                .episodes
                .find_open_by_account(&account.id)
                .await
                .len(),
            1
        );
    }

    #[actix_web::main]
    #[test]
    async fn duplicate_unlocked_episodes_collapse_to_the_newest() {
        let (ctx, _gateway) = setup_test_context();
        let mut account = seed_account(&ctx).await;
        let older = TreatmentEpisode::new(account.id.clone(), utc("2025-01-01T00:00:00Z"));
        let newer = TreatmentEpisode::new(account.id.clone(), utc("2025-02-01T00:00:00Z"));
        ctx.repos.episodes.insert(&older).await.unwrap();
        ctx.repos.episodes.insert(&newer).await.unwrap();

        let current = get_or_create_open_episode(&ctx, &mut account, utc("2025-03-01T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(current.id, newer.id);
        let open = ctx.repos.episodes.find_open_by_account(&account.id).await;
        assert_eq!(open.len(), 1);
        assert!(ctx.repos.episodes.find(&older.id).await.unwrap().locked);
    }

    #[actix_web::main]
    #[test]
    async fn lapsed_completed_episode_is_rotated_out() {
        let (ctx, _gateway) = setup_test_context();
        let mut account = seed_account(&ctx).await;
        let mut done = TreatmentEpisode::new(account.id.clone(), utc("2025-01-01T00:00:00Z"));
        done.department = Some("Ortho".into());
        done.complete(
            NaiveDate::from_ymd_opt(2025, 1, 10),
            None,
            utc("2025-01-10T10:00:00Z"),
        );
        ctx.repos.episodes.insert(&done).await.unwrap();

        let current = get_or_create_open_episode(&ctx, &mut account, utc("2025-02-01T00:00:00Z"))
            .await
            .unwrap();
        assert_ne!(current.id, done.id);
        assert_eq!(current.department.as_deref(), Some("Ortho"));
        assert!(!current.procedure_completed);
        assert!(ctx.repos.episodes.find(&done.id).await.unwrap().locked);

        // The mirror followed the fresh episode.
        let stored = ctx.repos.accounts.find(&account.id).await.unwrap();
        assert!(!stored.procedure_completed);
        assert_eq!(stored.department.as_deref(), Some("Ortho"));
    }

    #[actix_web::main]
    #[test]
    async fn completed_episode_inside_the_recovery_window_stays_open() {
        let (ctx, _gateway) = setup_test_context();
        let mut account = seed_account(&ctx).await;
        let mut done = TreatmentEpisode::new(account.id.clone(), utc("2025-01-01T00:00:00Z"));
        done.complete(
            NaiveDate::from_ymd_opt(2025, 1, 10),
            None,
            utc("2025-01-10T10:00:00Z"),
        );
        ctx.repos.episodes.insert(&done).await.unwrap();

        let current = get_or_create_open_episode(&ctx, &mut account, utc("2025-01-15T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(current.id, done.id);
        assert!(current.procedure_completed);

        let stored = ctx.repos.accounts.find(&account.id).await.unwrap();
        assert!(stored.procedure_completed);
    }

    #[actix_web::main]
    #[test]
    async fn heal_is_scoped_to_one_account() {
        let (ctx, _gateway) = setup_test_context();
        let mut account = seed_account(&ctx).await;
        let foreign = TreatmentEpisode::new(ID::new(), utc("2025-01-01T00:00:00Z"));
        ctx.repos.episodes.insert(&foreign).await.unwrap();

        get_or_create_open_episode(&ctx, &mut account, utc("2025-02-01T00:00:00Z"))
            .await
            .unwrap();
        assert!(ctx.repos.episodes.find(&foreign.id).await.unwrap().is_open());
    }
}
