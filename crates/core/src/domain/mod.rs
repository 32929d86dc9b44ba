pub mod form;
pub mod recommendation;
pub mod user;

/// Random identifier for locally fabricated records (users, history items).
pub fn new_opaque_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
