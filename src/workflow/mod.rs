pub mod intake;

pub use intake::{
    Delivery, Intake, IntakeStatus, Submission, ValidSubmission, ValidationError, register,
    send_sticker_email,
};
