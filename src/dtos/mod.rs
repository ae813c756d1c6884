pub mod birthday_dtos;
// alias so callers can use `crate::dtos::birthday`
pub use birthday_dtos as birthday;
