use crate::error::CarelinkError;
use actix_web::HttpRequest;
use carelink_domain::Account;
use carelink_infra::CarelinkContext;

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ")
}

/// Resolves the calling account from the bearer api key.
pub async fn protect_route(
    req: &HttpRequest,
    ctx: &CarelinkContext,
) -> Result<Account, CarelinkError> {
    let api_key = bearer_token(req).ok_or_else(|| {
        CarelinkError::Unauthorized("Unable to find api key in the Authorization header".into())
    })?;

    ctx.repos
        .accounts
        .find_by_apikey(api_key)
        .await
        .ok_or_else(|| CarelinkError::Unauthorized("Invalid api key provided".into()))
}

/// Guards the externally triggerable dispatch endpoint with the shared cron
/// secret, passed either as a bearer token or an `x-cron-key` header.
pub fn protect_cron_route(req: &HttpRequest, ctx: &CarelinkContext) -> Result<(), CarelinkError> {
    let presented = bearer_token(req)
        .or_else(|| req.headers().get("x-cron-key").and_then(|v| v.to_str().ok()));

    match presented {
        Some(key) if key == ctx.config.cron_secret => Ok(()),
        _ => Err(CarelinkError::Unauthorized("Invalid cron key".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use carelink_infra::setup_context;
    use chrono::Utc;

    #[actix_web::main]
    #[test]
    async fn rejects_missing_and_bogus_api_keys() {
        let ctx = setup_context();
        let req = TestRequest::default().to_http_request();
        assert!(protect_route(&req, &ctx).await.is_err());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer sk_bogus"))
            .to_http_request();
        assert!(protect_route(&req, &ctx).await.is_err());
    }

    #[actix_web::main]
    #[test]
    async fn accepts_a_valid_api_key() {
        let ctx = setup_context();
        let account = Account::new("a".into(), "UTC".into(), Utc::now());
        ctx.repos.accounts.insert(&account).await.unwrap();

        let req = TestRequest::default()
            .insert_header((
                "Authorization",
                format!("Bearer {}", account.secret_api_key),
            ))
            .to_http_request();
        let found = protect_route(&req, &ctx).await.unwrap();
        assert_eq!(found.id, account.id);
    }

    #[actix_web::main]
    #[test]
    async fn cron_guard_accepts_either_header() {
        let ctx = setup_context();
        let req = TestRequest::default()
            .insert_header(("x-cron-key", ctx.config.cron_secret.clone()))
            .to_http_request();
        assert!(protect_cron_route(&req, &ctx).is_ok());

        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", ctx.config.cron_secret)))
            .to_http_request();
        assert!(protect_cron_route(&req, &ctx).is_ok());

        let req = TestRequest::default().to_http_request();
        assert!(protect_cron_route(&req, &ctx).is_err());
    }
}
