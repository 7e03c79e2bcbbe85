pub mod age;
pub mod datetime;
pub mod password;
