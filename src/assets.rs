pub mod decode;
pub mod fetch;
pub mod naming;
pub mod store;
