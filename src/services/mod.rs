pub mod birthday_services;
