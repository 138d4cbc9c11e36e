// Identity: password login, bearer sessions in the KV store, role-claim authorization.

pub mod credentials;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod session;
pub mod store;
