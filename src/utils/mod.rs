pub mod email;
pub mod errors;
pub mod jwt;
pub mod otp;
pub mod pagination;
pub mod password;
