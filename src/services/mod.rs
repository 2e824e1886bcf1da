pub mod codec;
pub mod delivery_service;
pub mod mapper;
pub mod receiver_service;
pub mod transport;
pub mod validator;
