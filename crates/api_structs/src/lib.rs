mod account;
mod device;
mod dispatch;
mod episode;
mod push;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::account::dtos::*;
    pub use crate::device::dtos::*;
    pub use crate::dispatch::dtos::*;
    pub use crate::episode::dtos::*;
    pub use crate::push::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::account::api::*;
pub use crate::device::api::*;
pub use crate::dispatch::api::*;
pub use crate::episode::api::*;
pub use crate::push::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
