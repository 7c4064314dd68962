use uuid::Uuid;

/// A fresh thread identifier for a responder that has to assign one.
pub fn new_thread_id() -> String {
    Uuid::new_v4().to_string()
}
