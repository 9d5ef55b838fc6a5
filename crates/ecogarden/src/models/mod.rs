mod advice;
mod user;
mod weather;

pub use advice::UpdateAdviceResponse;
pub(crate) use user::required;
pub use user::{RegisterUser, UpdateUser};
pub use weather::WeatherResponse;
