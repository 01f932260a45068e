//! Domain layer - Core entities and the pure rules of moderation.
//!
//! Nothing here performs I/O. Language detection, masking, prompt
//! construction, classification verdicts and blood-region math live
//! here so services can compose them around external calls.

pub mod blood;
pub mod classification;
pub mod content;
pub mod language;
pub mod masking;
pub mod password;
pub mod prompt;
pub mod user;

pub use classification::{Classification, LabelScore, ModerationLabel};
pub use content::{GeneratedContent, NewContent};
pub use language::{detect_language, Language};
pub use masking::mask_sensitive_terms;
pub use password::Password;
pub use user::{NewUser, User, UserResponse};
