pub mod event;
pub mod service;

pub use event::{
    ErrorResponse, EventFieldError, EventSubmission, RawEvent, SubmitEventResponse,
};
pub use service::ServiceInfo;
