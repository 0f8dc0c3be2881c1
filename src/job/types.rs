//! The unit of work routed by tube.

use std::fmt;
use uuid::Uuid;

/// A unit of work tagged with the tube it belongs to.
///
/// The tube is fixed at construction. The body is opaque to the router.
#[derive(Clone, PartialEq, Eq)]
pub struct Job {
    /// Identifier used for log correlation only.
    pub id: Uuid,
    tube: String,
    /// Payload handed to the handler untouched.
    pub body: Vec<u8>,
}

impl Job {
    /// Create a job for `tube` with a fresh id.
    pub fn new(tube: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tube: tube.into(),
            body: body.into(),
        }
    }

    /// The tube this job is routed by.
    pub fn tube(&self) -> &str {
        &self.tube
    }

    /// Body interpreted as UTF-8, if it is.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

// Bodies can be large; only print the length.
impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("tube", &self.tube)
            .field("body_len", &self.body.len())
            .finish()
    }
}
