//! Database entities.

pub mod complaint;
pub mod complaint_note;
pub mod complaint_reply;
pub mod complaint_status_history;
pub mod officer;
pub mod password_reset_token;
pub mod pending_officer;
pub mod user;

pub use complaint::Entity as Complaint;
pub use complaint_note::Entity as ComplaintNote;
pub use complaint_reply::Entity as ComplaintReply;
pub use complaint_status_history::Entity as ComplaintStatusHistory;
pub use officer::Entity as Officer;
pub use password_reset_token::Entity as PasswordResetToken;
pub use pending_officer::Entity as PendingOfficer;
pub use user::Entity as User;
