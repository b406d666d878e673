//! Repository layer wrapping entity queries.

pub mod complaint;
pub mod complaint_note;
pub mod complaint_reply;
pub mod complaint_status_history;
pub mod officer;
pub mod password_reset_token;
pub mod pending_officer;
pub mod user;

pub use complaint::ComplaintRepository;
pub use complaint_note::ComplaintNoteRepository;
pub use complaint_reply::ComplaintReplyRepository;
pub use complaint_status_history::ComplaintStatusHistoryRepository;
pub use officer::OfficerRepository;
pub use password_reset_token::PasswordResetTokenRepository;
pub use pending_officer::PendingOfficerRepository;
pub use user::UserRepository;
