//! Fixed-layout directory submission questionnaire.

pub mod format;
pub mod model;

pub use format::{
    format_currency, format_opposing_counsel, format_referee_contact, position_label,
    practice_area_label, status_label,
};
pub use model::{
    Confirmation, DealValue, FIXED_ROWS, FirmDetails, LawyerEntry, LogoImage, OpposingCounsel,
    RefereeEntry, SubmissionExport, SubmissionMatter,
};
