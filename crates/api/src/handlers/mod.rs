pub mod comments;
pub mod dashboard;
pub mod documents;
pub mod entries;
pub mod invitations;
pub mod settings;
pub mod uploads;
