pub mod birthday_handlers;
