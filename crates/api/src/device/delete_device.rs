use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::delete_device::{APIResponse, PathParams};
use carelink_domain::{DeviceToken, ID};
use carelink_infra::CarelinkContext;

pub async fn delete_device_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    path: web::Path<PathParams>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteDeviceUseCase {
        account_id: account.id,
        device_id: path.device_id.clone(),
    };
    execute(usecase, &ctx)
        .await
        .map(|device| HttpResponse::Ok().json(APIResponse::new(device)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
struct DeleteDeviceUseCase {
    account_id: ID,
    device_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The device with id: {} was not found", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteDeviceUseCase {
    type Response = DeviceToken;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteDevice";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .device_tokens
            .find(&self.device_id)
            .await
            .filter(|d| d.account_id == self.account_id)
            .ok_or_else(|| UseCaseError::NotFound(self.device_id.clone()))?;

        ctx.repos
            .device_tokens
            .delete(&self.device_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.device_id.clone()))
    }
}
