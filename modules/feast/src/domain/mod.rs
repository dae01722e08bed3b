pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod gate;
pub mod lifecycle;
pub mod panels;
pub mod ports;
pub mod reservation;
pub mod resource;
