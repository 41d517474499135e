pub(crate) mod accounts;
pub(crate) mod answers;
pub(crate) mod assignments;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod instructors;
pub(crate) mod learners;
pub(crate) mod questions;
pub(crate) mod submissions;
